//! 设置项

/// 可编辑的设置项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    Theme,
    Mouse,
    Animations,
    ConfirmDestructive,
}

impl SettingItem {
    /// 获取所有设置项
    pub fn all() -> &'static [SettingItem] {
        &[
            SettingItem::Theme,
            SettingItem::Mouse,
            SettingItem::Animations,
            SettingItem::ConfirmDestructive,
        ]
    }

    /// 从索引获取设置项
    pub fn from_index(index: usize) -> Option<SettingItem> {
        Self::all().get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingItem::Theme => "Theme",
            SettingItem::Mouse => "Mouse support",
            SettingItem::Animations => "Animations",
            SettingItem::ConfirmDestructive => "Confirm destructive actions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for (i, item) in SettingItem::all().iter().enumerate() {
            assert_eq!(SettingItem::from_index(i), Some(*item));
        }
        assert_eq!(SettingItem::from_index(4), None);
    }
}
