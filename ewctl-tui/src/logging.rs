//! 日志初始化
//!
//! 终端被界面占用，日志写入配置目录下的 `ewctl.log`。
//! 库代码通过 `log` 门面记录，由 tracing-subscriber 统一输出。

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志文件名
pub const LOG_FILE: &str = "ewctl.log";

/// 默认级别；`RUST_LOG` 存在时以其为准
pub fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// 日志文件路径
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}

/// 安装全局订阅者，返回日志文件路径
pub fn init(dir: &Path, debug: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = log_path(dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(debug)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .context("failed to install log subscriber")?;

    tracing::info!("ewctl {} starting", env!("CARGO_PKG_VERSION"));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "info");
        assert_eq!(
            log_path(Path::new("/tmp/ewctl")),
            PathBuf::from("/tmp/ewctl/ewctl.log")
        );
    }
}
