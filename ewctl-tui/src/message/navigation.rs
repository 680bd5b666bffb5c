//! 导航相关消息

use crate::model::ViewId;

/// 导航消息
///
/// 只有控制器会消费这些消息，子视图通过返回 `Command::Emit` 发出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationMessage {
    /// 切换到指定视图
    ///
    /// `title` 为空时使用视图默认标题；编辑视图必须携带 `payload`。
    Navigate {
        view: ViewId,
        title: Option<String>,
        payload: Option<NavPayload>,
    },

    /// 从新建/编辑视图返回列表，并强制刷新列表
    BackToList(EntityKind),

    /// 回到仪表盘
    Home,
}

impl NavigationMessage {
    /// 不带标题和参数的导航
    pub fn to(view: ViewId) -> Self {
        Self::Navigate {
            view,
            title: None,
            payload: None,
        }
    }

    /// 携带参数的导航
    pub fn with_payload(view: ViewId, payload: NavPayload) -> Self {
        Self::Navigate {
            view,
            title: None,
            payload: Some(payload),
        }
    }
}

/// 导航时携带的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavPayload {
    /// 表单 ID（编辑表单、webhook 测试预填）
    FormId(String),
    /// 联系人 ID
    ContactId(i64),
}

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Form,
    Contact,
}

impl EntityKind {
    /// 对应的列表视图
    pub fn list_view(self) -> ViewId {
        match self {
            Self::Form => ViewId::FormsList,
            Self::Contact => ViewId::ContactsList,
        }
    }

    /// 对应的编辑视图
    pub fn edit_view(self) -> ViewId {
        match self {
            Self::Form => ViewId::FormEdit,
            Self::Contact => ViewId::ContactEdit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Contact => "contact",
        }
    }
}
