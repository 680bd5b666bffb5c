//! 配置服务
//!
//! 配置文件为 YAML，默认位于 `~/.config/ewctl/config.yaml`。
//! 加载顺序：文件 → 环境变量 → `--profile` 覆盖 → 钥匙串中的 API token。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ewctl_store::utils::log_sanitizer::mask_secret;
use serde::{Deserialize, Serialize};

use super::TokenStore;
use crate::error::AppError;
use crate::view::theme::Theme;

/// 默认的 worker 地址
pub const DEFAULT_WORKER_URL: &str = "https://elementor-whatsapp.workers.dev";

const APP_DIR: &str = "ewctl";
const CONFIG_FILE: &str = "config.yaml";

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cloudflare: CloudflareConfig,
    pub zapi: ZapiConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Profile>,
}

/// Cloudflare D1 与 worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudflareConfig {
    pub account_id: String,
    pub api_token: String,
    pub database_id: String,
    pub worker_url: String,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            api_token: String::new(),
            database_id: String::new(),
            worker_url: DEFAULT_WORKER_URL.to_string(),
        }
    }
}

/// Z-API 凭证（仅在设置页展示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZapiConfig {
    pub instance_id: String,
    pub instance_token: String,
    pub client_token: String,
}

/// 界面偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub mouse: bool,
    pub animations: bool,
    pub confirm_destructive: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            mouse: true,
            animations: true,
            confirm_destructive: true,
        }
    }
}

/// 命名的覆盖项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub worker_url: String,
}

impl AppConfig {
    /// 用进程环境变量覆盖
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// 用给定的变量来源覆盖，空值不生效
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut String); 7] = [
            ("CLOUDFLARE_ACCOUNT_ID", &mut self.cloudflare.account_id),
            ("CLOUDFLARE_API_TOKEN", &mut self.cloudflare.api_token),
            ("DATABASE_ID", &mut self.cloudflare.database_id),
            ("WORKER_URL", &mut self.cloudflare.worker_url),
            ("ZAPI_INSTANCE_ID", &mut self.zapi.instance_id),
            ("ZAPI_INSTANCE_TOKEN", &mut self.zapi.instance_token),
            ("ZAPI_CLIENT_TOKEN", &mut self.zapi.client_token),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }

    /// 应用命名 profile
    pub fn apply_profile(&mut self, name: &str) -> Result<(), AppError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| AppError::ConfigInvalid(format!("unknown profile '{name}'")))?;
        if !profile.worker_url.is_empty() {
            self.cloudflare.worker_url = profile.worker_url.clone();
        }
        Ok(())
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), AppError> {
        let cf = &self.cloudflare;
        let missing: Vec<&str> = [
            ("cloudflare.account_id", &cf.account_id),
            ("cloudflare.api_token", &cf.api_token),
            ("cloudflare.database_id", &cf.database_id),
            ("cloudflare.worker_url", &cf.worker_url),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ConfigInvalid(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// 遮蔽所有密钥后的副本，用于展示
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.cloudflare.api_token,
            &mut copy.zapi.instance_token,
            &mut copy.zapi.client_token,
        ] {
            if !secret.is_empty() {
                *secret = mask_secret(secret);
            }
        }
        copy
    }
}

impl AppConfig {
    /// 生效配置：在文件配置上依次叠加环境变量、profile 和钥匙串中的 token
    ///
    /// 钥匙串读取失败只记录日志，之后由 `validate` 报告缺失的 token。
    pub fn resolve(
        &self,
        profile: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
        tokens: &dyn TokenStore,
    ) -> Result<Self, AppError> {
        let mut config = self.clone();
        config.apply_env_from(env);
        if let Some(name) = profile {
            config.apply_profile(name)?;
        }
        if config.cloudflare.api_token.is_empty() {
            match tokens.get() {
                Ok(token) => config.cloudflare.api_token = token,
                Err(e) => log::warn!("keyring lookup failed: {e:#}"),
            }
        }
        Ok(config)
    }
}

/// 配置服务 trait
pub trait ConfigService: Send + Sync {
    /// 加载配置
    fn load(&self) -> Result<AppConfig>;

    /// 保存配置，返回写入的路径
    fn save(&self, config: &AppConfig) -> Result<PathBuf>;
}

/// 基于 YAML 文件的配置服务
#[derive(Debug, Clone)]
pub struct FileConfigService {
    path: PathBuf,
}

impl FileConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 默认配置目录 `<config dir>/ewctl`
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        Self::default_dir().join(CONFIG_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigService for FileConfigService {
    fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            log::info!("no config at {}, using defaults", self.path.display());
            return Ok(AppConfig::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&self, config: &AppConfig) -> Result<PathBuf> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let text = serde_yaml::to_string(config).context("failed to serialize config")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::info!("config saved to {}", self.path.display());
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: AppConfig = serde_yaml::from_str(
            "cloudflare:\n  account_id: acc\nui:\n  theme: light\n",
        )
        .unwrap();
        assert_eq!(cfg.cloudflare.account_id, "acc");
        assert_eq!(cfg.cloudflare.worker_url, DEFAULT_WORKER_URL);
        assert_eq!(cfg.ui.theme, Theme::Light);
        assert!(cfg.ui.confirm_destructive);
    }

    #[test]
    fn env_overrides_non_empty_values_only() {
        let mut cfg = AppConfig::default();
        cfg.cloudflare.database_id = "from-file".into();
        cfg.apply_env_from(|k| match k {
            "CLOUDFLARE_API_TOKEN" => Some("tok".into()),
            "DATABASE_ID" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.cloudflare.api_token, "tok");
        assert_eq!(cfg.cloudflare.database_id, "from-file");
    }

    #[test]
    fn validate_lists_missing_fields() {
        let err = AppConfig::default().validate().unwrap_err();
        assert_eq!(
            err,
            AppError::ConfigInvalid(
                "missing cloudflare.account_id, cloudflare.api_token, cloudflare.database_id"
                    .into()
            )
        );
    }

    #[test]
    fn profile_overrides_worker_url() {
        let mut cfg = AppConfig::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                worker_url: "https://staging.example.dev".into(),
            },
        );
        cfg.apply_profile("staging").unwrap();
        assert_eq!(cfg.cloudflare.worker_url, "https://staging.example.dev");
        assert!(cfg.apply_profile("prod").is_err());
    }

    #[test]
    fn masked_hides_secrets() {
        let mut cfg = AppConfig::default();
        cfg.cloudflare.api_token = "abcdefghijkl".into();
        cfg.zapi.client_token = "short".into();
        let m = cfg.masked();
        assert_eq!(m.cloudflare.api_token, "abcd****ijkl");
        assert_eq!(m.zapi.client_token, "****");
        assert_eq!(m.zapi.instance_token, "");
    }

    struct FixedToken(&'static str);

    impl TokenStore for FixedToken {
        fn get(&self) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn set(&self, _token: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn keyring_token_fills_only_missing_token() {
        let stored = AppConfig::default();
        let resolved = stored.resolve(None, |_| None, &FixedToken("from-keyring")).unwrap();
        assert_eq!(resolved.cloudflare.api_token, "from-keyring");
        assert_eq!(stored.cloudflare.api_token, "");

        let resolved = stored
            .resolve(
                None,
                |k| (k == "CLOUDFLARE_API_TOKEN").then(|| "from-env".to_string()),
                &FixedToken("from-keyring"),
            )
            .unwrap();
        assert_eq!(resolved.cloudflare.api_token, "from-env");
    }

    #[test]
    fn unknown_profile_is_config_error() {
        let err = AppConfig::default()
            .resolve(Some("nope"), |_| None, &FixedToken(""))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigInvalid(_)));
    }
}
