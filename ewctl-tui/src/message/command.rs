//! 异步命令
//!
//! 命令是一次性的延迟任务描述。视图在 `handle` 中只负责返回命令，
//! 由控制器交给执行器在事件循环之外运行；每条命令恰好产生一条结果消息，
//! 失败时同样以消息携带错误返回，而不是抛出。

use std::sync::atomic::{AtomicU64, Ordering};

use ewctl_store::{Contact, Form, WebhookRequest};

use crate::backend::AppConfig;
use crate::message::Message;
use crate::model::ViewId;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// 命令票据
///
/// 由发起命令的视图持有，结果消息原样带回。视图用它判断结果是否过期，
/// 控制器用 `origin` 决定结果投递给谁。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub id: u64,
    pub origin: ViewId,
}

impl Ticket {
    /// 签发新票据，进程内单调递增
    pub fn issue(origin: ViewId) -> Self {
        Self {
            id: NEXT_TICKET.fetch_add(1, Ordering::Relaxed),
            origin,
        }
    }
}

/// 命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ============ 加载 ============
    /// 仪表盘统计
    LoadStats { ticket: Ticket },
    /// 表单列表
    LoadForms { ticket: Ticket },
    /// 编辑表单：表单本体 + 可选联系人
    LoadFormForEdit { ticket: Ticket, id: String },
    /// 联系人列表（含表单统计）
    LoadContacts { ticket: Ticket },
    /// 新建表单时可选的接收人
    LoadRecipients { ticket: Ticket },
    /// 单个联系人
    LoadContact { ticket: Ticket, id: i64 },

    // ============ 写入 ============
    CreateForm { ticket: Ticket, form: Form },
    UpdateForm { ticket: Ticket, form: Form },
    DeleteForm { ticket: Ticket, id: String },
    CreateContact { ticket: Ticket, contact: Contact },
    UpdateContact { ticket: Ticket, contact: Contact },
    DeleteContact { ticket: Ticket, id: i64 },

    // ============ 其他 ============
    SendWebhook {
        ticket: Ticket,
        request: WebhookRequest,
    },
    SaveConfig {
        ticket: Ticket,
        config: Box<AppConfig>,
    },

    /// 不需要执行，直接作为消息重新进入事件循环
    Emit(Message),
}

impl Command {
    /// 命令的票据，`Emit` 没有票据
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::LoadStats { ticket }
            | Self::LoadForms { ticket }
            | Self::LoadFormForEdit { ticket, .. }
            | Self::LoadContacts { ticket }
            | Self::LoadRecipients { ticket }
            | Self::LoadContact { ticket, .. }
            | Self::CreateForm { ticket, .. }
            | Self::UpdateForm { ticket, .. }
            | Self::DeleteForm { ticket, .. }
            | Self::CreateContact { ticket, .. }
            | Self::UpdateContact { ticket, .. }
            | Self::DeleteContact { ticket, .. }
            | Self::SendWebhook { ticket, .. }
            | Self::SaveConfig { ticket, .. } => Some(*ticket),
            Self::Emit(_) => None,
        }
    }

    /// 是否为加载类命令
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            Self::LoadStats { .. }
                | Self::LoadForms { .. }
                | Self::LoadFormForEdit { .. }
                | Self::LoadContacts { .. }
                | Self::LoadRecipients { .. }
                | Self::LoadContact { .. }
        )
    }

    /// 日志用的简短名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadStats { .. } => "load_stats",
            Self::LoadForms { .. } => "load_forms",
            Self::LoadFormForEdit { .. } => "load_form_for_edit",
            Self::LoadContacts { .. } => "load_contacts",
            Self::LoadRecipients { .. } => "load_recipients",
            Self::LoadContact { .. } => "load_contact",
            Self::CreateForm { .. } => "create_form",
            Self::UpdateForm { .. } => "update_form",
            Self::DeleteForm { .. } => "delete_form",
            Self::CreateContact { .. } => "create_contact",
            Self::UpdateContact { .. } => "update_contact",
            Self::DeleteContact { .. } => "delete_contact",
            Self::SendWebhook { .. } => "send_webhook",
            Self::SaveConfig { .. } => "save_config",
            Self::Emit(_) => "emit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_unique_and_keep_origin() {
        let a = Ticket::issue(ViewId::FormsList);
        let b = Ticket::issue(ViewId::FormsList);
        assert_ne!(a.id, b.id);
        assert_eq!(b.origin, ViewId::FormsList);
    }

    #[test]
    fn emit_has_no_ticket() {
        assert_eq!(Command::Emit(Message::Quit).ticket(), None);
        let t = Ticket::issue(ViewId::Dashboard);
        assert_eq!(Command::LoadStats { ticket: t }.ticket(), Some(t));
        assert!(Command::LoadStats { ticket: t }.is_load());
        assert!(!Command::DeleteContact { ticket: t, id: 1 }.is_load());
    }
}
