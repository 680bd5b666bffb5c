//! Event 层：终端事件到消息的翻译
//!
//! ```text
//! handler.rs      轮询与翻译（按键、尺寸变化、滚轮）
//! keymap.rs       控制器拦截的全局快捷键
//! ```
//!
//! 轮询超时由主循环转换为 `Message::Tick`。

mod handler;
pub mod keymap;

pub use handler::{handle_event, poll_event};
