//! 应用主状态结构

use crate::backend::{AppConfig, UiConfig};
use crate::error::AppError;
use crate::pages::{
    ContactCreateView, ContactEditView, ContactsListView, DashboardView, FormCreateView,
    FormEditView, FormsListView, Page, SettingsView, SubView, WebhookView,
};

use super::{NavigationState, ViewId};

/// 构建控制器所需的启动参数
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// 生效配置（文件 + 环境变量 + 密钥链）
    pub config: AppConfig,
    /// 磁盘上的配置，设置页保存时以此为底
    pub stored: AppConfig,
    /// 当前 profile 名称
    pub profile: String,
}

/// 应用主状态（根控制器）
///
/// 控制器独占所有视图实例，视图不持有控制器的引用。
/// 七个常驻视图按 `ViewId::STATIC` 的顺序存放；两个编辑视图各占一个可空槽位，
/// 离开时清空，再次进入时以新实例覆盖。
pub struct App {
    /// 是否应该退出
    pub should_quit: bool,

    /// 导航状态
    pub navigation: NavigationState,

    /// 常驻视图
    pub pages: [Page; 7],

    /// 编辑表单槽位
    pub form_edit: Option<FormEditView>,
    /// 编辑联系人槽位
    pub contact_edit: Option<ContactEditView>,

    /// 顶层错误：存在时覆盖全部渲染，任意键清除
    pub error: Option<AppError>,

    /// 终端尺寸 (宽, 高)
    pub size: (u16, u16),

    /// 页眉显示的 profile
    pub profile: String,

    /// 当前界面偏好
    pub ui: UiConfig,
}

impl App {
    /// 创建应用实例，所有常驻视图在此一次性构建
    pub fn new(options: AppOptions) -> Self {
        let AppOptions {
            config,
            stored,
            profile,
        } = options;
        let profile = if profile.is_empty() {
            "default".to_string()
        } else {
            profile
        };

        Self {
            should_quit: false,
            navigation: NavigationState::new(),
            pages: [
                Page::Dashboard(DashboardView::new()),
                Page::FormsList(FormsListView::new()),
                Page::FormCreate(FormCreateView::new(config.cloudflare.worker_url.clone())),
                Page::ContactsList(ContactsListView::new()),
                Page::ContactCreate(ContactCreateView::new()),
                Page::WebhookTest(WebhookView::new()),
                Page::Settings(SettingsView::new(stored, &config)),
            ],
            form_edit: None,
            contact_edit: None,
            error: None,
            size: (0, 0),
            profile,
            ui: config.ui,
        }
    }

    /// 当前视图
    pub fn active(&self) -> ViewId {
        self.navigation.active()
    }

    /// 常驻视图
    pub fn page(&self, view: ViewId) -> Option<&Page> {
        view.slot().and_then(|i| self.pages.get(i))
    }

    pub fn page_mut(&mut self, view: ViewId) -> Option<&mut Page> {
        view.slot().and_then(|i| self.pages.get_mut(i))
    }

    /// 按标识取视图，参数化视图取其槽位中的实例
    pub fn view(&self, view: ViewId) -> Option<&dyn SubView> {
        match view {
            ViewId::FormEdit => self.form_edit.as_ref().map(|v| v as &dyn SubView),
            ViewId::ContactEdit => self.contact_edit.as_ref().map(|v| v as &dyn SubView),
            _ => self.page(view).map(|p| p as &dyn SubView),
        }
    }

    pub fn view_mut(&mut self, view: ViewId) -> Option<&mut dyn SubView> {
        match view {
            ViewId::FormEdit => self.form_edit.as_mut().map(|v| v as &mut dyn SubView),
            ViewId::ContactEdit => self.contact_edit.as_mut().map(|v| v as &mut dyn SubView),
            _ => self.page_mut(view).map(|p| p as &mut dyn SubView),
        }
    }

    /// 当前激活的视图
    pub fn active_view(&self) -> Option<&dyn SubView> {
        self.view(self.active())
    }

    /// 设置顶层错误
    pub fn set_error(&mut self, error: AppError) {
        log::warn!("{error}");
        self.error = Some(error);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppOptions::default())
    }
}
