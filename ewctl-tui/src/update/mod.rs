//!
//! src/update/mod.rs
//! Update 层：状态更新逻辑
//!
//! Update 层负责处理 Message，更新 Model 状态，返回需要执行的命令。
//! 是唯一可以修改 `NavigationState` 的地方。
//!
//!
//! 有模块结构：
//!     src/update/mod.rs
//!         mod navigation;         // 导航消息、视图切换、Esc 策略
//!
//! ```text
//!     pub fn init(app: &mut App) -> Vec<Command>
//!     pub fn update(app: &mut App, msg: Message) -> Vec<Command>
//!     pub fn process(app: &mut App, msg: Message) -> Vec<Command>
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 一、消息分发
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! Resize          扇出给所有视图（常驻视图和已存在的编辑视图）
//! Key             全局拦截后转发给当前视图（见下）
//! Tick            开启动画时只发给当前视图
//! Navigation      交给 navigation.rs
//! Loaded/Created/Updated/Deleted/WebhookSent/ConfigSaved
//!                 按票据的 origin 路由：常驻视图总能收到；
//!                 编辑视图只在槽位有实例时收到，否则丢弃
//! Preferences     广播给所有常驻视图，并立即切换主题
//! Error           写入顶层错误
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 二、按键拦截顺序
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! 1. 只处理按下事件
//! 2. Ctrl+C 总是退出
//! 3. 存在顶层错误时，任意键清除它并被消费
//! 4. 仪表盘：q 退出，1-5 直达对应视图，其余转发
//! 5. 其他视图：转发给视图；Esc 在视图处理后再交给 escape_policy
//! ```
//!
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! 三、Emit
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! ```text
//! 视图通过 `Command::Emit(msg)` 发出导航等同步消息。`process` 在同一轮内
//! 按顺序消化这些消息，只把真正的异步命令返回给主循环。
//! ```
//!

mod navigation;

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::event::keymap::DefaultKeymap;
use crate::message::{Command, Message};
use crate::model::{App, ViewId};
use crate::pages::SubView;
use crate::view::theme::set_theme;

pub use navigation::{escape_policy, switch_view};

/// 启动时调用一次：应用偏好并执行所有常驻视图的 `init`
pub fn init(app: &mut App) -> Vec<Command> {
    let ui = app.ui;
    let mut cmds = broadcast(app, &Message::Preferences(ui));
    for page in &mut app.pages {
        cmds.extend(page.init());
    }
    set_theme(ui.theme);
    cmds
}

/// 处理一条消息，并同步消化返回的 `Emit`，只返回异步命令
pub fn process(app: &mut App, msg: Message) -> Vec<Command> {
    let mut queue = VecDeque::from([msg]);
    let mut pending = Vec::new();
    while let Some(msg) = queue.pop_front() {
        for cmd in update(app, msg) {
            match cmd {
                Command::Emit(next) => queue.push_back(next),
                other => pending.push(other),
            }
        }
    }
    pending
}

/// 处理应用消息，更新状态
pub fn update(app: &mut App, msg: Message) -> Vec<Command> {
    match msg {
        Message::Quit => {
            app.should_quit = true;
            Vec::new()
        }

        Message::Resize { width, height } => {
            app.size = (width, height);
            fan_out(app, &msg)
        }

        Message::Key(key) => handle_key(app, key),

        Message::Tick => {
            if app.ui.animations {
                forward(app, msg)
            } else {
                Vec::new()
            }
        }

        Message::Navigation(nav) => navigation::update(app, nav),

        Message::Preferences(ui) => {
            app.ui = ui;
            set_theme(ui.theme);
            broadcast(app, &msg)
        }

        Message::Error(e) => {
            app.set_error(e);
            Vec::new()
        }

        Message::Activated(_) => forward(app, msg),

        Message::Loaded { ticket, .. }
        | Message::Created { ticket, .. }
        | Message::Updated { ticket, .. }
        | Message::Deleted { ticket, .. }
        | Message::WebhookSent { ticket, .. }
        | Message::ConfigSaved { ticket, .. } => route_result(app, ticket.origin, msg),
    }
}

/// 全局按键拦截
fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Command> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }

    if DefaultKeymap::FORCE_QUIT.matches(&key) {
        app.should_quit = true;
        return Vec::new();
    }

    if app.error.take().is_some() {
        return Vec::new();
    }

    if app.active() == ViewId::Dashboard {
        if DefaultKeymap::QUIT.matches(&key) {
            app.should_quit = true;
            return Vec::new();
        }
        if let KeyCode::Char(c) = key.code {
            if let Some(view) = ViewId::from_digit(c) {
                return switch_view(app, view, None, None);
            }
        }
        return forward(app, Message::Key(key));
    }

    let mut cmds = forward(app, Message::Key(key));
    if DefaultKeymap::BACK.matches(&key) {
        cmds.extend(escape_policy(app));
    }
    cmds
}

/// 发给当前视图
pub(crate) fn forward(app: &mut App, msg: Message) -> Vec<Command> {
    let active = app.active();
    match app.view_mut(active) {
        Some(view) => view.handle(msg),
        None => {
            log::debug!("no instance for active view {active:?}, dropping message");
            Vec::new()
        }
    }
}

/// 按 origin 路由异步结果，与当前激活的视图无关
fn route_result(app: &mut App, origin: ViewId, msg: Message) -> Vec<Command> {
    match app.view_mut(origin) {
        Some(view) => view.handle(msg),
        None => {
            log::debug!("{origin:?} no longer exists, dropping result");
            Vec::new()
        }
    }
}

/// 发给所有常驻视图
fn broadcast(app: &mut App, msg: &Message) -> Vec<Command> {
    app.pages
        .iter_mut()
        .flat_map(|page| page.handle(msg.clone()))
        .collect()
}

/// 发给所有常驻视图和已存在的编辑视图
fn fan_out(app: &mut App, msg: &Message) -> Vec<Command> {
    let mut cmds = broadcast(app, msg);
    if let Some(view) = app.form_edit.as_mut() {
        cmds.extend(view.handle(msg.clone()));
    }
    if let Some(view) = app.contact_edit.as_mut() {
        cmds.extend(view.handle(msg.clone()));
    }
    cmds
}
