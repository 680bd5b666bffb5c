#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockExecutor;
use ewctl_store::StoreError;
use ewctl_tui::backend::{
    AppConfig, CommandExecutor, ConfigService, FileConfigService, Services,
};
use ewctl_tui::error::AppError;
use ewctl_tui::message::{Command, LoadedData, Message, Ticket};
use ewctl_tui::model::ViewId;
use ewctl_tui::view::theme::Theme;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

#[tokio::test]
async fn load_forms_maps_rows() {
    let db = MockExecutor::new();
    db.respond(
        "FROM forms f",
        vec![json!({"id": "leads", "name": "Leads", "field_count": 3, "number_count": 2})],
    );
    let services = Services::from_executor(db.clone());

    let ticket = Ticket::issue(ViewId::FormsList);
    let msg = services.execute(Command::LoadForms { ticket }).await;
    let (got, forms) = match msg {
        Message::Loaded {
            ticket,
            result: Ok(LoadedData::Forms(forms)),
        } => (ticket, forms),
        other => panic!("unexpected message: {other:?}"),
    };
    assert_eq!(got, ticket);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].id, "leads");
    assert_eq!(forms[0].number_count, 2);
    assert_eq!(db.calls().len(), 1);
}

#[tokio::test]
async fn store_failure_becomes_load_error() {
    let db = MockExecutor::new();
    db.fail(
        "FROM forms f",
        StoreError::Network {
            detail: "connection refused".into(),
        },
    );
    let services = Services::from_executor(db);

    let msg = services
        .execute(Command::LoadForms {
            ticket: Ticket::issue(ViewId::FormsList),
        })
        .await;
    let text = match msg {
        Message::Loaded {
            result: Err(AppError::LoadFailed(text)),
            ..
        } => text,
        other => panic!("unexpected message: {other:?}"),
    };
    assert!(text.contains("connection refused"), "{text}");
}

#[tokio::test]
async fn missing_contact_reports_not_found() {
    let services = Services::from_executor(MockExecutor::new());
    let msg = services
        .execute(Command::LoadContact {
            ticket: Ticket::issue(ViewId::ContactEdit),
            id: 7,
        })
        .await;
    let e = match msg {
        Message::Loaded { result: Err(e), .. } => e,
        other => panic!("unexpected message: {other:?}"),
    };
    assert!(e.to_string().contains("contact not found"), "{e}");
}

#[tokio::test]
async fn empty_services_report_not_initialized() {
    let services = Services::empty();
    let msg = services
        .execute(Command::DeleteContact {
            ticket: Ticket::issue(ViewId::ContactsList),
            id: 3,
        })
        .await;
    assert!(matches!(
        msg,
        Message::Deleted {
            result: Err(AppError::NotInitialized(_)),
            ..
        }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn executor_sends_exactly_one_result() {
    let db = MockExecutor::new();
    db.respond("FROM forms f", Vec::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = CommandExecutor::new(
        Handle::current(),
        Arc::new(Services::from_executor(db)),
        tx,
    );

    let ticket = Ticket::issue(ViewId::FormsList);
    executor.spawn(Command::LoadForms { ticket });

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("result within timeout")
        .expect("channel open");
    assert_eq!(msg.ticket(), Some(ticket));

    drop(executor);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn emit_goes_straight_to_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = CommandExecutor::new(Handle::current(), Arc::new(Services::empty()), tx);
    executor.spawn(Command::Emit(Message::Quit));
    assert_eq!(rx.recv().await, Some(Message::Quit));
}

#[tokio::test]
async fn save_config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let service = Arc::new(FileConfigService::new(&path));
    let services = Services::empty().with_config(service.clone());

    let mut config = AppConfig::default();
    config.cloudflare.account_id = "acc".into();
    config.ui.theme = Theme::Light;
    config.ui.mouse = false;

    let msg = services
        .execute(Command::SaveConfig {
            ticket: Ticket::issue(ViewId::Settings),
            config: Box::new(config.clone()),
        })
        .await;
    let saved = match msg {
        Message::ConfigSaved { result: Ok(saved), .. } => saved,
        other => panic!("unexpected message: {other:?}"),
    };
    assert_eq!(saved, path);
    assert_eq!(service.load().unwrap(), config);
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let service = FileConfigService::new(dir.path().join("absent.yaml"));
    assert_eq!(service.load().unwrap(), AppConfig::default());
}
