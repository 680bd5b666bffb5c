//! 凭证存储服务
//!
//! 使用系统钥匙串保存 Cloudflare API token，配置文件和环境变量都没有提供时回退到这里。

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "ewctl";
const TOKEN_KEY: &str = "cloudflare_api_token";

/// token 存储
pub trait TokenStore: Send + Sync {
    /// 读取 token，不存在时返回空字符串
    fn get(&self) -> Result<String>;

    /// 保存 token
    fn set(&self, token: &str) -> Result<()>;
}

/// 基于系统钥匙串的 token 存储
///
/// 使用 keyring crate 将凭证安全存储到：
/// - Windows: Credential Manager
/// - macOS: Keychain
/// - Linux: Secret Service (GNOME Keyring / KWallet)
#[derive(Debug, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).context("failed to open keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<String> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(token),
            Err(keyring::Error::NoEntry) => Ok(String::new()),
            Err(e) => Err(e).context("failed to read API token from keyring"),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        Self::entry()?
            .set_password(token)
            .context("failed to store API token in keyring")
    }
}
