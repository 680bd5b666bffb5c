//! 应用消息

use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ewctl_store::{Contact, ContactSummary, Form, FormSummary, Stats, WebhookResponse};

use crate::backend::UiConfig;
use crate::error::AppError;
use crate::message::{NavPayload, NavigationMessage, Ticket};

/// 事件循环中流动的全部消息
///
/// 每个子视图只处理自己关心的子集，其余消息一律忽略，不视为错误。
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ============ 环境事件 ============
    /// 终端尺寸变化，广播给所有视图
    Resize { width: u16, height: u16 },
    /// 按键
    Key(KeyEvent),
    /// 动画时钟
    Tick,
    /// 请求退出
    Quit,

    // ============ 生命周期 ============
    /// 视图成为当前视图时收到一次，附带导航参数
    Activated(Option<NavPayload>),

    // ============ 导航 ============
    Navigation(NavigationMessage),

    // ============ 命令结果 ============
    Loaded {
        ticket: Ticket,
        result: Result<LoadedData, AppError>,
    },
    Created {
        ticket: Ticket,
        result: Result<EntityId, AppError>,
    },
    Updated {
        ticket: Ticket,
        result: Result<EntityId, AppError>,
    },
    Deleted {
        ticket: Ticket,
        result: Result<EntityId, AppError>,
    },
    WebhookSent {
        ticket: Ticket,
        result: Result<WebhookResponse, AppError>,
    },
    ConfigSaved {
        ticket: Ticket,
        result: Result<PathBuf, AppError>,
    },

    // ============ 其他 ============
    /// 设置页修改了界面偏好，立即生效
    Preferences(UiConfig),
    /// 无法归属到具体视图的错误
    Error(AppError),
}

impl Message {
    /// 命令结果消息的票据
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::Loaded { ticket, .. }
            | Self::Created { ticket, .. }
            | Self::Updated { ticket, .. }
            | Self::Deleted { ticket, .. }
            | Self::WebhookSent { ticket, .. }
            | Self::ConfigSaved { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// 导航消息的便捷构造
    pub fn navigate(msg: NavigationMessage) -> Self {
        Self::Navigation(msg)
    }
}

/// 加载结果
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedData {
    Stats(Stats),
    Forms(Vec<FormSummary>),
    /// 编辑表单需要的表单本体和可选联系人
    FormForEdit {
        form: Form,
        contacts: Vec<Contact>,
    },
    Contacts(Vec<ContactSummary>),
    /// 新建表单时可选的接收人
    Recipients(Vec<Contact>),
    Contact(Contact),
}

/// 写入操作涉及的实体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityId {
    Form(String),
    Contact(i64),
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(id) => write!(f, "{id}"),
            Self::Contact(id) => write!(f, "#{id}"),
        }
    }
}
