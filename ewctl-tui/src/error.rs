//! 应用错误类型

use ewctl_store::StoreError;
use thiserror::Error;

/// 界面层错误
///
/// 所有错误最终都落在某个视图的 `error` 字段或控制器的顶层错误槽里，
/// 不会终止事件循环。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// 配置无效（启动时致命，不会进入控制器）
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// 加载失败，可通过刷新键重试
    #[error("{0}")]
    LoadFailed(String),

    /// 提交失败，草稿保留
    #[error("{0}")]
    SubmitFailed(String),

    /// 依赖的协作者未构建，不可重试
    #[error("{0} is not initialized")]
    NotInitialized(&'static str),

    /// 无法归属到具体视图的错误（例如路由到不存在的视图）
    #[error("{0}")]
    Navigation(String),
}

impl AppError {
    /// 加载失败
    pub fn load(context: &str, error: &StoreError) -> Self {
        Self::LoadFailed(format!("failed to {context}: {error}"))
    }

    /// 提交失败
    pub fn submit(context: &str, error: &StoreError) -> Self {
        Self::SubmitFailed(format!("failed to {context}: {error}"))
    }

    /// 是否允许用户手动重试
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotInitialized(_) | Self::ConfigInvalid(_))
    }
}
