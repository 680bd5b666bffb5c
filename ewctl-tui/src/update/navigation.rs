//! 导航更新逻辑

use crate::error::AppError;
use crate::message::{Command, EntityKind, Message, NavPayload, NavigationMessage};
use crate::model::{App, ViewId};
use crate::pages::{ContactEditView, FormEditView, SubView};

use super::forward;

/// 处理导航消息
pub fn update(app: &mut App, msg: NavigationMessage) -> Vec<Command> {
    match msg {
        NavigationMessage::Navigate {
            view,
            title,
            payload,
        } => {
            if view.is_parametric() {
                open_editor(app, view, title.as_deref(), payload)
            } else {
                switch_view(app, view, title.as_deref(), payload)
            }
        }

        NavigationMessage::BackToList(kind) => back_to_list(app, kind),

        NavigationMessage::Home => switch_view(app, ViewId::Dashboard, None, None),
    }
}

/// 切换到常驻视图，并向其发送激活通知
pub fn switch_view(
    app: &mut App,
    view: ViewId,
    title: Option<&str>,
    payload: Option<NavPayload>,
) -> Vec<Command> {
    leave(app, view);
    app.navigation.go_to(view, title);
    log::debug!("navigated to {view:?}");
    forward(app, Message::Activated(payload))
}

/// Esc 的全局处理：视图处理完 Esc 之后，控制器总是回到仪表盘。
///
/// 新建/编辑视图在处理 Esc 时会发出 `BackToList`，该消息在本函数之后才被消化，
/// 因此从这些视图按 Esc 的最终结果是回到对应列表。
pub fn escape_policy(app: &mut App) -> Vec<Command> {
    switch_view(app, ViewId::Dashboard, None, None)
}

/// 返回列表并强制刷新
fn back_to_list(app: &mut App, kind: EntityKind) -> Vec<Command> {
    let list = kind.list_view();
    let mut cmds: Vec<Command> = app
        .page_mut(list)
        .and_then(|page| page.force_reload())
        .into_iter()
        .collect();
    cmds.extend(switch_view(app, list, None, None));
    cmds
}

/// 新建编辑视图实例放入槽位，并执行其 `init`
fn open_editor(
    app: &mut App,
    view: ViewId,
    title: Option<&str>,
    payload: Option<NavPayload>,
) -> Vec<Command> {
    let cmds = match (view, payload) {
        (ViewId::FormEdit, Some(NavPayload::FormId(id))) => {
            let mut editor = FormEditView::new(id);
            let cmds = editor.init();
            leave(app, view);
            app.form_edit = Some(editor);
            cmds
        }
        (ViewId::ContactEdit, Some(NavPayload::ContactId(id))) => {
            let mut editor = ContactEditView::new(id);
            let cmds = editor.init();
            leave(app, view);
            app.contact_edit = Some(editor);
            cmds
        }
        (view, payload) => {
            app.set_error(AppError::Navigation(format!(
                "cannot open {} without a matching id (got {payload:?})",
                view.title()
            )));
            return Vec::new();
        }
    };
    app.navigation.go_to(view, title);
    log::debug!("navigated to {view:?}");
    cmds
}

/// 离开当前视图：目标不同且当前为编辑视图时释放其槽位
fn leave(app: &mut App, next: ViewId) {
    let current = app.active();
    if current == next {
        return;
    }
    match current {
        ViewId::FormEdit => app.form_edit = None,
        ViewId::ContactEdit => app.contact_edit = None,
        _ => {}
    }
}
