//! 子视图
//!
//! 每个屏幕都是一个独立的状态机，实现同一组能力：
//!
//! ```text
//! init          创建后调用一次，可返回初始命令
//! handle        处理一条消息，返回零或多条命令；不得阻塞
//! render        纯函数，只读当前状态
//! desired_size  希望占用的尺寸，None 表示铺满
//! ```
//!
//! 视图之间不互相引用，也不引用控制器；一切跨视图的动作都通过
//! 返回 `Command::Emit(Message::Navigation(..))` 完成。
//!
//! 七个常驻视图放在 `Page` 枚举里，由控制器按 `ViewId` 存放；
//! 两个编辑视图各占控制器上的一个可空槽位。

pub mod contacts;
pub mod dashboard;
pub mod forms;
pub mod settings;
pub mod webhook;

use ratatui::{layout::Rect, Frame};

use crate::error::AppError;
use crate::message::{Command, LoadedData, Message, NavigationMessage};
use crate::model::ViewId;

pub use contacts::{ContactCreateView, ContactEditView, ContactsListView};
pub use dashboard::DashboardView;
pub use forms::{FormCreateView, FormEditView, FormsListView};
pub use settings::SettingsView;
pub use webhook::WebhookView;

/// 子视图能力
pub trait SubView {
    /// 初始命令
    fn init(&mut self) -> Vec<Command> {
        Vec::new()
    }

    /// 处理消息
    fn handle(&mut self, msg: Message) -> Vec<Command>;

    /// 渲染
    fn render(&self, frame: &mut Frame, area: Rect);

    /// 希望占用的尺寸 (宽, 高)
    fn desired_size(&self) -> Option<(u16, u16)> {
        None
    }
}

/// 常驻视图
pub enum Page {
    Dashboard(DashboardView),
    FormsList(FormsListView),
    FormCreate(FormCreateView),
    ContactsList(ContactsListView),
    ContactCreate(ContactCreateView),
    WebhookTest(WebhookView),
    Settings(SettingsView),
}

impl Page {
    pub fn id(&self) -> ViewId {
        match self {
            Page::Dashboard(_) => ViewId::Dashboard,
            Page::FormsList(_) => ViewId::FormsList,
            Page::FormCreate(_) => ViewId::FormCreate,
            Page::ContactsList(_) => ViewId::ContactsList,
            Page::ContactCreate(_) => ViewId::ContactCreate,
            Page::WebhookTest(_) => ViewId::WebhookTest,
            Page::Settings(_) => ViewId::Settings,
        }
    }

    /// 列表视图的强制刷新，其他视图返回 None
    pub fn force_reload(&mut self) -> Option<Command> {
        match self {
            Page::FormsList(v) => Some(v.force_reload()),
            Page::ContactsList(v) => Some(v.force_reload()),
            _ => None,
        }
    }
}

impl SubView for Page {
    fn init(&mut self) -> Vec<Command> {
        match self {
            Page::Dashboard(v) => v.init(),
            Page::FormsList(v) => v.init(),
            Page::FormCreate(v) => v.init(),
            Page::ContactsList(v) => v.init(),
            Page::ContactCreate(v) => v.init(),
            Page::WebhookTest(v) => v.init(),
            Page::Settings(v) => v.init(),
        }
    }

    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match self {
            Page::Dashboard(v) => v.handle(msg),
            Page::FormsList(v) => v.handle(msg),
            Page::FormCreate(v) => v.handle(msg),
            Page::ContactsList(v) => v.handle(msg),
            Page::ContactCreate(v) => v.handle(msg),
            Page::WebhookTest(v) => v.handle(msg),
            Page::Settings(v) => v.handle(msg),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Page::Dashboard(v) => v.render(frame, area),
            Page::FormsList(v) => v.render(frame, area),
            Page::FormCreate(v) => v.render(frame, area),
            Page::ContactsList(v) => v.render(frame, area),
            Page::ContactCreate(v) => v.render(frame, area),
            Page::WebhookTest(v) => v.render(frame, area),
            Page::Settings(v) => v.render(frame, area),
        }
    }

    fn desired_size(&self) -> Option<(u16, u16)> {
        match self {
            Page::Dashboard(v) => v.desired_size(),
            Page::FormsList(v) => v.desired_size(),
            Page::FormCreate(v) => v.desired_size(),
            Page::ContactsList(v) => v.desired_size(),
            Page::ContactCreate(v) => v.desired_size(),
            Page::WebhookTest(v) => v.desired_size(),
            Page::Settings(v) => v.desired_size(),
        }
    }
}

/// 从加载结果中取出期望的数据，类型不符视为加载失败
pub(crate) fn expect_data<T>(
    result: Result<LoadedData, AppError>,
    pick: impl FnOnce(LoadedData) -> Option<T>,
) -> Result<T, AppError> {
    result.and_then(|data| {
        pick(data).ok_or_else(|| AppError::LoadFailed("unexpected response".to_string()))
    })
}

/// 包装一条导航消息
pub(crate) fn emit(msg: NavigationMessage) -> Command {
    Command::Emit(Message::Navigation(msg))
}
