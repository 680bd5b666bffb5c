//! Elementor WhatsApp Manager TUI
//!
//! ## 架构
//!
//! 采用 Elm Architecture (TEA) 模式：
//! - **Model**: 根控制器状态 (`model/`)
//! - **Message**: 事件消息与命令 (`message/`)
//! - **Update**: 状态更新 (`update/`)
//! - **View**: UI 渲染 (`view/`)
//! - **Pages**: 各子视图的状态机 (`pages/`)
//! - **Event**: 输入处理 (`event/`)
//! - **Backend**: 配置、凭证与命令执行 (`backend/`)
//!
//! 视图只返回命令，不直接做 I/O；异步命令由 `backend::CommandExecutor`
//! 在 tokio 运行时上执行，结果经通道回到同步主循环。

pub mod app;
pub mod backend;
pub mod cli;
pub mod error;
pub mod event;
pub mod logging;
pub mod message;
pub mod model;
pub mod pages;
pub mod update;
pub mod util;
pub mod view;
