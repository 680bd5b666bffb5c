//! # ewctl-store
//!
//! Data access for the Elementor WhatsApp manager.
//!
//! - [`D1Client`] runs SQL against a Cloudflare D1 database over its REST API
//!   (bearer token, one statement per request, no retries).
//! - [`FormRepository`], [`ContactRepository`] and [`StatsRepository`] turn
//!   loosely typed D1 rows into the models in [`types`]; missing or
//!   wrong-typed columns degrade to zero values.
//! - [`WebhookClient`] posts test submissions to the worker, either as JSON
//!   or in Elementor's `fields[<key>][value]` form encoding.
//!
//! Repositories only see the [`SqlExecutor`] trait, so tests can swap the
//! HTTP client for an in-memory double.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ewctl_store::{D1Client, FormRepository};
//!
//! # async fn demo() -> ewctl_store::Result<()> {
//! let db = Arc::new(D1Client::new("account", "database", "token")?);
//! let forms = FormRepository::new(db).list().await?;
//! for form in forms {
//!     println!("{} ({} fields)", form.name, form.field_count);
//! }
//! # Ok(())
//! # }
//! ```

mod contacts;
mod d1;
mod error;
mod forms;
mod http_client;
pub mod schema;
mod stats;
mod traits;
pub mod types;
pub mod utils;
pub mod webhook;

pub use contacts::ContactRepository;
pub use d1::D1Client;
pub use error::{Result, StoreError};
pub use forms::FormRepository;
pub use stats::StatsRepository;
pub use traits::SqlExecutor;
pub use types::{
    ConnectionStatus, Contact, ContactSummary, Form, FormField, FormNumber, FormSummary,
    QueryMeta, QueryResult, Stats,
};
pub use webhook::{Encoding, WebhookClient, WebhookRequest, WebhookResponse};
