//！┌────────────────────────────────────────────────────────────────────────────┐
//！│                              主循环 (app.rs)                               │
//！│                                                                            │
//！│   ┌─────────┐   Key/Resize/Tick   ┌────────────┐   Command   ┌──────────┐  │
//！│   │  Event  │ ──────────────────▶ │   Update   │ ──────────▶ │ Executor │  │
//！│   │   层    │                     │ (控制器)    │             │ (tokio)  │  │
//！│   └─────────┘                     └─────┬──────┘             └────┬─────┘  │
//！│                                         │ 转发                    │        │
//！│                                         ▼                        │ 结果   │
//！│                                   ┌────────────┐                 │ 消息   │
//！│                                   │  子视图     │ ◀───────────────┘        │
//！│                                   │ (pages/)   │   Loaded / Created ...   │
//！│                                   └────────────┘                          │
//！└────────────────────────────────────────────────────────────────────────────┘

//!
//! src/message/mod.rs
//! Message 层：消息定义
//!
//!
//! 有模块结构：
//!     src/message/mod.rs
//!         mod app;            // Message：事件循环中的全部消息
//!         mod command;        // Command / Ticket：异步命令
//!         mod navigation;     // NavigationMessage：导航
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 消息与命令
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! 子视图的 handle 返回 Vec<Command>：
//!
//!     fn handle(&mut self, msg: Message) -> Vec<Command>
//!
//! Command 分两类：
//!     · 需要执行的任务（LoadForms、CreateContact ...），交给执行器
//!       在 tokio 运行时上跑，完成后恰好发回一条结果消息
//!     · Command::Emit(msg)，不需要执行，直接回到事件循环
//!       （例如新建成功后发出 BackToList）
//!
//! 每条任务命令都带一个 Ticket { id, origin }：
//!     · origin 决定结果投递给哪个视图
//!     · id 让视图识别过期结果（例如刷新后才到达的旧结果）
//!
//! 没有取消操作。被放弃的视图收到迟到的结果时，直接丢弃即可。
//! ```
//!

mod app;
mod command;
mod navigation;

pub use app::{EntityId, LoadedData, Message};
pub use command::{Command, Ticket};
pub use navigation::{EntityKind, NavPayload, NavigationMessage};
