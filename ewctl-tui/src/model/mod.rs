//！┌─────────────────────────────────────────────────────────────────────────────┐
//！│                              主循环 (app.rs)                               │
//！│                                                                            │
//！│  ┌────────────────────────────── UI 层 ───────────────────────────────┐   │
//！│  │                                                                     │   │
//！│  │   ┌─────────┐          ┌───────────┐          ┌──────────┐         │   │
//！│  │   │  Event  │ ───────▶ │  Message  │ ───────▶ │  Update  │         │   │
//！│  │   │   层    │   翻译    │    层     │   消费    │    层    │         │   │
//！│  │   └─────────┘          │  Message  │          └────┬─────┘         │   │
//！│  │        ▲               │  Command  │               │ 修改          │   │
//！│  │        │               │  NavMsg   │               ▼               │   │
//！│  │   ┌─────────┐          │           │          ┌──────────┐         │   │
//！│  │   │  View   │          │           │   ┌───── │  Model   │         │   │
//！│  │   │   层    │          └───────────┘   │      │    层    │         │   │
//！│  │   └────┬────┘ ◀──────── 读取 ──────────┘      └────┬─────┘         │   │
//！│  │        │                                           │ Command       │   │
//！│  └────────│───────────────────────────────────────────│───────────────┘   │
//！│           │                                           │ 异步执行          │
//！│           ▼                                           ▼                   │
//！│      ┌─────────┐                                ┌──────────┐              │
//！│      │  终端   │                                │ Backend  │              │
//！│      │ (Util)  │                                │    层    │              │
//！│      └─────────┘                                └────┬─────┘              │
//！│                                                      │                    │
//！│                                                      ▼                    │
//！│                                           ┌───────────────────┐           │
//！│                                           │    ewctl-store    │           │
//！│                                           │  (D1 / Webhook)   │           │
//！│                                           └───────────────────┘           │
//！└─────────────────────────────────────────────────────────────────────────────┘


//!
//! src/model/mod.rs
//! Model 层：应用状态定义
//!
//! Model 层是应用状态的 “唯一真相来源”。
//! 所有状态变更都通过 Update 层来触发。
//!
//!
//! 有模块结构：
//!     src/model/mod.rs
//!         mod app;            // 根控制器状态
//!         mod navigation;     // 当前视图与面包屑
//!         mod page;           // 视图标识
//!
//! ```text
//!     pub mod state;      // 视图共用的状态片段
//!
//! 与 page.rs 不同，各视图自身的数据放在 src/pages/ 下的视图结构体中，
//! state/ 只提供它们共用的积木（加载状态、提交状态、输入表单、列表光标）。
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 一、根控制器（App）
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! 在 src/model/app.rs 中定义：
//!
//!     pub struct App {
//!         pub should_quit: bool,                      // 退出标志
//!         pub navigation: NavigationState,            // 当前视图与面包屑
//!         pub pages: [Page; 7],                       // 常驻视图
//!         pub form_edit: Option<FormEditView>,        // 编辑表单槽位
//!         pub contact_edit: Option<ContactEditView>,  // 编辑联系人槽位
//!         pub error: Option<AppError>,                // 顶层错误
//!         ...
//!     }
//!
//! 常驻视图在启动时创建一次，离开后数据保留，只在强制刷新时被替换。
//! 编辑视图在导航时按 ID 新建，离开时槽位清空，旧实例随之释放。
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 二、导航状态（NavigationState）
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! NavigationState {
//!     active: ViewId,             // 当前视图
//!     breadcrumbs: Vec<String>,   // ["Dashboard"] 或 ["Dashboard", 标题]
//! }
//!
//! 面包屑只有一级或两级：离开任何非仪表盘视图都回到仪表盘，
//! 不存在中间层级的返回。
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 三、视图状态片段（state/）
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! Loadable<T>     Idle → Loading → {Ready, Failed}，带待决票据
//! Submission      新建/编辑/发送的提交流程，成功后锁定
//! InputForm       文本、开关、多选字段的焦点与按键处理
//! ListCursor      列表选中项
//!
//! 渲染模式互斥，按 错误 > 加载中 > 完成 > 正常 的优先级选择。
//! ```
//!

mod app;
mod navigation;
mod page;

pub mod state;

pub use app::{App, AppOptions};
pub use navigation::{NavigationState, ROOT_CRUMB};
pub use page::ViewId;
