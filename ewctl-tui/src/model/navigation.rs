//! 导航状态

use super::ViewId;

/// 根面包屑
pub const ROOT_CRUMB: &str = "Dashboard";

/// 导航状态
///
/// 只有控制器可以修改。面包屑最多两级：在仪表盘时只有根，
/// 其他视图为 `[根, 当前标题]`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    active: ViewId,
    breadcrumbs: Vec<String>,
}

impl NavigationState {
    /// 创建新的导航状态（停在仪表盘）
    pub fn new() -> Self {
        Self {
            active: ViewId::Dashboard,
            breadcrumbs: vec![ROOT_CRUMB.to_string()],
        }
    }

    /// 当前视图
    pub fn active(&self) -> ViewId {
        self.active
    }

    /// 面包屑
    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    /// 切换视图，面包屑重置为根再追加标题
    pub fn go_to(&mut self, view: ViewId, title: Option<&str>) {
        self.active = view;
        self.breadcrumbs.truncate(1);
        if view != ViewId::Dashboard {
            self.breadcrumbs
                .push(title.unwrap_or_else(|| view.title()).to_string());
        }
    }

    /// 回到仪表盘
    pub fn go_home(&mut self) {
        self.go_to(ViewId::Dashboard, None);
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumbs_never_nest() {
        let mut nav = NavigationState::new();
        nav.go_to(ViewId::FormsList, None);
        nav.go_to(ViewId::FormEdit, Some("Edit Form: contact-us"));
        assert_eq!(nav.breadcrumbs(), ["Dashboard", "Edit Form: contact-us"]);
        nav.go_home();
        assert_eq!(nav.breadcrumbs(), ["Dashboard"]);
        assert_eq!(nav.active(), ViewId::Dashboard);
    }

    #[test]
    fn dashboard_ignores_title() {
        let mut nav = NavigationState::new();
        nav.go_to(ViewId::Dashboard, Some("Home"));
        assert_eq!(nav.breadcrumbs().len(), 1);
    }
}
