#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{form_summary, press, single_ticket, started};
use crossterm::event::KeyCode;
use ewctl_store::Contact;
use ewctl_tui::error::AppError;
use ewctl_tui::message::{
    Command, EntityKind, LoadedData, Message, NavPayload, NavigationMessage,
};
use ewctl_tui::model::{App, ViewId};
use ewctl_tui::pages::Page;
use ewctl_tui::update;

fn assert_breadcrumbs(app: &App) {
    let crumbs = app.navigation.breadcrumbs();
    if app.active() == ViewId::Dashboard {
        assert_eq!(crumbs.len(), 1, "{crumbs:?}");
    } else {
        assert_eq!(crumbs.len(), 2, "{crumbs:?}");
    }
    assert_eq!(crumbs[0], "Dashboard");
}

fn forms_list(app: &App) -> &ewctl_tui::pages::FormsListView {
    match app.page(ViewId::FormsList) {
        Some(Page::FormsList(view)) => view,
        _ => panic!("forms list missing"),
    }
}

#[test]
fn scenario_a_digit_opens_forms_list_with_one_load() {
    let (mut app, _) = started();
    let cmds = press(&mut app, KeyCode::Char('2'));

    assert_eq!(app.active(), ViewId::FormsList);
    assert_eq!(app.navigation.breadcrumbs(), ["Dashboard", "Forms"]);
    assert!(matches!(cmds.as_slice(), [Command::LoadForms { .. }]));
}

#[test]
fn breadcrumbs_stay_one_or_two_deep() {
    let (mut app, _) = started();
    let script = [
        KeyCode::Char('2'),
        KeyCode::Char('n'),
        KeyCode::Esc,
        KeyCode::Esc,
        KeyCode::Char('3'),
        KeyCode::Char('a'),
        KeyCode::Esc,
        KeyCode::Esc,
        KeyCode::Char('4'),
        KeyCode::Esc,
        KeyCode::Char('5'),
        KeyCode::Char('q'),
        KeyCode::Char('1'),
    ];
    for code in script {
        press(&mut app, code);
        assert_breadcrumbs(&app);
    }
    assert!(!app.should_quit);
    assert_eq!(app.active(), ViewId::Dashboard);
}

#[test]
fn revisiting_a_list_does_not_reload() {
    let (mut app, _) = started();
    let ticket = single_ticket(&press(&mut app, KeyCode::Char('2')));
    update::process(
        &mut app,
        Message::Loaded {
            ticket,
            result: Ok(LoadedData::Forms(vec![form_summary("leads", "Leads")])),
        },
    );
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.active(), ViewId::Dashboard);

    assert!(press(&mut app, KeyCode::Char('2')).is_empty());
    assert_eq!(forms_list(&app).forms().data().map(Vec::len), Some(1));
}

#[test]
fn escape_from_create_lands_on_refreshed_list() {
    let (mut app, _) = started();
    let ticket = single_ticket(&press(&mut app, KeyCode::Char('2')));
    update::process(
        &mut app,
        Message::Loaded {
            ticket,
            result: Ok(LoadedData::Forms(Vec::new())),
        },
    );

    let cmds = press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.active(), ViewId::FormCreate);
    assert!(matches!(cmds.as_slice(), [Command::LoadRecipients { .. }]));

    let cmds = press(&mut app, KeyCode::Esc);
    assert_eq!(app.active(), ViewId::FormsList);
    assert!(matches!(cmds.as_slice(), [Command::LoadForms { .. }]));
}

#[test]
fn escape_from_list_goes_home() {
    let (mut app, _) = started();
    press(&mut app, KeyCode::Char('3'));
    let cmds = press(&mut app, KeyCode::Esc);
    assert!(cmds.is_empty());
    assert_eq!(app.active(), ViewId::Dashboard);
    assert_eq!(app.navigation.breadcrumbs(), ["Dashboard"]);
}

#[test]
fn edit_navigation_builds_instance_and_loads_once() {
    let (mut app, _) = started();
    let cmds = update::process(
        &mut app,
        Message::Navigation(NavigationMessage::Navigate {
            view: ViewId::FormEdit,
            title: Some("Edit Form: Leads".into()),
            payload: Some(NavPayload::FormId("leads".into())),
        }),
    );
    assert!(matches!(
        cmds.as_slice(),
        [Command::LoadFormForEdit { id, .. }] if id == "leads"
    ));
    assert_eq!(app.form_edit.as_ref().map(|v| v.id()), Some("leads"));
    assert_eq!(app.navigation.breadcrumbs(), ["Dashboard", "Edit Form: Leads"]);
}

#[test]
fn stale_result_after_leaving_editor_is_dropped() {
    let (mut app, _) = started();
    let cmds = update::process(
        &mut app,
        Message::Navigation(NavigationMessage::with_payload(
            ViewId::ContactEdit,
            NavPayload::ContactId(7),
        )),
    );
    let ticket = single_ticket(&cmds);

    // 加载期间离开，槽位被释放
    press(&mut app, KeyCode::Esc);
    assert!(app.contact_edit.is_none());

    let cmds = update::process(
        &mut app,
        Message::Loaded {
            ticket,
            result: Ok(LoadedData::Contact(Contact {
                id: 7,
                name: "Ana".into(),
                ..Contact::default()
            })),
        },
    );
    assert!(cmds.is_empty());
    assert!(app.contact_edit.is_none());
    assert!(app.error.is_none());
}

#[test]
fn old_editor_result_does_not_reach_new_instance() {
    let (mut app, _) = started();
    let open = |app: &mut App, id: i64| {
        update::process(
            app,
            Message::Navigation(NavigationMessage::with_payload(
                ViewId::ContactEdit,
                NavPayload::ContactId(id),
            )),
        )
    };
    let first = single_ticket(&open(&mut app, 1));
    press(&mut app, KeyCode::Esc);
    let second = single_ticket(&open(&mut app, 2));
    assert_ne!(first, second);

    update::process(
        &mut app,
        Message::Loaded {
            ticket: first,
            result: Err(AppError::LoadFailed("late failure".into())),
        },
    );
    let view = app.contact_edit.as_ref().unwrap();
    assert_eq!(view.id(), 2);
    assert!(view.load().error().is_none());
    assert!(view.load().is_loading());
}

#[test]
fn back_to_list_reloads_even_after_failure() {
    let (mut app, _) = started();
    let ticket = single_ticket(&press(&mut app, KeyCode::Char('3')));
    update::process(
        &mut app,
        Message::Loaded {
            ticket,
            result: Err(AppError::LoadFailed("offline".into())),
        },
    );

    let cmds = update::process(
        &mut app,
        Message::Navigation(NavigationMessage::BackToList(EntityKind::Contact)),
    );
    assert!(matches!(cmds.as_slice(), [Command::LoadContacts { .. }]));
    assert_eq!(app.active(), ViewId::ContactsList);
}

#[test]
fn editor_without_id_shows_top_level_error_until_key() {
    let (mut app, _) = started();
    update::process(
        &mut app,
        Message::Navigation(NavigationMessage::to(ViewId::ContactEdit)),
    );
    assert!(matches!(app.error, Some(AppError::Navigation(_))));
    assert_eq!(app.active(), ViewId::Dashboard);

    // 清除错误的按键不会被转发
    assert!(press(&mut app, KeyCode::Char('2')).is_empty());
    assert!(app.error.is_none());
    assert_eq!(app.active(), ViewId::Dashboard);
}

#[test]
fn webhook_test_from_list_prefills_form() {
    let (mut app, _) = started();
    let ticket = single_ticket(&press(&mut app, KeyCode::Char('2')));
    update::process(
        &mut app,
        Message::Loaded {
            ticket,
            result: Ok(LoadedData::Forms(vec![form_summary("leads", "Leads")])),
        },
    );
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.active(), ViewId::WebhookTest);
    let Some(Page::WebhookTest(view)) = app.page(ViewId::WebhookTest) else {
        panic!("webhook view missing");
    };
    assert_eq!(view.input().value("form_id"), "leads");
}
