#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{MockExecutor, api_error};
use ewctl_store::{Contact, ContactRepository, QueryMeta, StoreError};
use serde_json::json;

fn contact(name: &str, phone: &str) -> Contact {
    Contact {
        name: name.to_string(),
        phone_number: phone.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_returns_last_row_id() {
    let db = MockExecutor::new();
    db.respond_meta(
        "INSERT INTO contacts",
        QueryMeta {
            last_row_id: 42,
            ..Default::default()
        },
    );
    let repo = ContactRepository::new(db);

    let id = require_ok!(repo.create(&contact("Ana", "+5511999998888")).await);
    assert_eq!(id, 42);
}

#[tokio::test]
async fn create_validates_before_querying() {
    let db = MockExecutor::new();
    let repo = ContactRepository::new(db.clone());

    let no_name = repo.create(&contact(" ", "+5511999998888")).await;
    assert!(matches!(no_name, Err(StoreError::InvalidInput { field: "name", .. })));

    let bad_phone = repo.create(&contact("Ana", "12-34")).await;
    assert!(matches!(bad_phone, Err(StoreError::InvalidInput { field: "phone", .. })));

    assert!(db.calls().is_empty());
}

#[tokio::test]
async fn get_missing_contact_message() {
    let db = MockExecutor::new();
    let repo = ContactRepository::new(db);

    let err = repo.get(7).await.unwrap_err();
    assert_eq!(err.to_string(), "contact not found");
}

#[tokio::test]
async fn list_with_stats_splits_form_ids() {
    let db = MockExecutor::new();
    db.respond(
        "GROUP_CONCAT",
        vec![
            json!({"id": 1.0, "name": "Ana", "phone_number": "+5511", "form_count": 2, "form_ids": "contact,quote"}),
            json!({"id": 2, "name": "Bo", "phone_number": "+5512", "form_count": 0, "form_ids": null}),
        ],
    );
    let repo = ContactRepository::new(db);

    let contacts = require_ok!(repo.list_with_stats().await);
    assert_eq!(contacts[0].contact.id, 1);
    assert_eq!(contacts[0].form_ids, vec!["contact", "quote"]);
    assert!(contacts[1].form_ids.is_empty());
}

#[tokio::test]
async fn delete_clears_references_first_and_tolerates_failure() {
    let db = MockExecutor::new();
    db.fail("UPDATE form_numbers", api_error("locked"));
    let repo = ContactRepository::new(db.clone());

    require_ok!(repo.delete(9).await);

    let calls = db.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].sql.contains("UPDATE form_numbers"));
    assert!(calls[1].sql.contains("DELETE FROM contacts"));
    assert_eq!(calls[1].params, vec![json!(9)]);
}

#[tokio::test]
async fn delete_failure_propagates() {
    let db = MockExecutor::new();
    db.fail("DELETE FROM contacts", api_error("constraint"));
    let repo = ContactRepository::new(db);

    assert!(repo.delete(9).await.is_err());
}
