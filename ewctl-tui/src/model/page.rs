//! 视图标识

/// 视图标识
///
/// 任意时刻恰好一个视图处于激活状态。`FormEdit` / `ContactEdit` 是参数化视图，
/// 每次导航按实体 ID 新建实例；其余七个在启动时创建，常驻整个进程。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewId {
    /// 仪表盘
    #[default]
    Dashboard,
    /// 表单列表
    FormsList,
    /// 新建表单
    FormCreate,
    /// 编辑表单（参数化）
    FormEdit,
    /// 联系人列表
    ContactsList,
    /// 新建联系人
    ContactCreate,
    /// 编辑联系人（参数化）
    ContactEdit,
    /// Webhook 测试
    WebhookTest,
    /// 设置
    Settings,
}

impl ViewId {
    /// 常驻视图，顺序即控制器中的存放顺序
    pub const STATIC: [ViewId; 7] = [
        ViewId::Dashboard,
        ViewId::FormsList,
        ViewId::FormCreate,
        ViewId::ContactsList,
        ViewId::ContactCreate,
        ViewId::WebhookTest,
        ViewId::Settings,
    ];

    /// 获取视图标题
    pub fn title(self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::FormsList => "Forms",
            ViewId::FormCreate => "Create Form",
            ViewId::FormEdit => "Edit Form",
            ViewId::ContactsList => "Contacts",
            ViewId::ContactCreate => "Add Contact",
            ViewId::ContactEdit => "Edit Contact",
            ViewId::WebhookTest => "Test Webhook",
            ViewId::Settings => "Settings",
        }
    }

    /// 是否为参数化视图
    pub fn is_parametric(self) -> bool {
        matches!(self, ViewId::FormEdit | ViewId::ContactEdit)
    }

    /// 常驻视图在注册表中的下标，参数化视图返回 None
    pub fn slot(self) -> Option<usize> {
        Self::STATIC.iter().position(|v| *v == self)
    }

    /// 仪表盘上的数字快捷键
    pub fn from_digit(c: char) -> Option<ViewId> {
        match c {
            '1' => Some(ViewId::Dashboard),
            '2' => Some(ViewId::FormsList),
            '3' => Some(ViewId::ContactsList),
            '4' => Some(ViewId::WebhookTest),
            '5' => Some(ViewId::Settings),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_slots_cover_non_parametric_views() {
        for (i, view) in ViewId::STATIC.iter().enumerate() {
            assert_eq!(view.slot(), Some(i));
            assert!(!view.is_parametric());
        }
        assert_eq!(ViewId::FormEdit.slot(), None);
        assert_eq!(ViewId::ContactEdit.slot(), None);
    }

    #[test]
    fn digits_map_to_menu() {
        assert_eq!(ViewId::from_digit('2'), Some(ViewId::FormsList));
        assert_eq!(ViewId::from_digit('3'), Some(ViewId::ContactsList));
        assert_eq!(ViewId::from_digit('6'), None);
    }
}
