//! # Cookie-addressed SQL session store for Sea-ORM
//!
//! A durable session store that keeps per-client key/value state in one
//! relational table and addresses it through a tamper-checked cookie.
//! Instead of shipping session contents to the browser, only the row
//! identifier travels in the cookie, wrapped in an HMAC-authenticated
//! token; the values live server-side as an encoded blob.
//!
//! ## Features
//!
//! - Persistent sessions in SQLite or PostgreSQL via [Sea-ORM](https://crates.io/crates/sea-orm)
//! - Opaque, name-bound HMAC-SHA256 cookie tokens
//! - MessagePack serialization of session values for compact storage
//! - Monotonic expiry renewal: a save never shrinks a session's lifetime
//! - Readers-writer serialization of row access, framework-agnostic
//!   `http::HeaderMap` glue
//!
//! ## Quick Start
//!
//! ```no_run
//! use sea_orm::Database;
//! use sea_orm_migration::MigratorTrait;
//! use seaorm_session_store::{migration::Migrator, HmacCodec, SeaOrmStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect and bootstrap the schema (idempotent).
//! let conn = Database::connect("sqlite://sessions.db?mode=rwc").await?;
//! Migrator::up(&conn, None).await?;
//!
//! // Create the store with a signing key.
//! let store = SeaOrmStore::new(conn, &HmacCodec::generate_key());
//!
//! // Per request: resolve the inbound cookie into a session. This never
//! // fails; a missing, forged, or stale cookie yields a fresh session.
//! let request_headers = http::HeaderMap::new();
//! let mut session = store.lookup(&request_headers, "sid").await;
//! assert!(session.is_new());
//!
//! // Mutate state and save; the emitted Set-Cookie carries the row id.
//! session.insert("user_id", 123i64);
//! let mut response_headers = http::HeaderMap::new();
//! store.save(&mut response_headers, &mut session).await?;
//! assert!(!session.id().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Session Values
//!
//! Session state is a typed map of [`Value`]s:
//!
//! ```
//! use seaorm_session_store::{Value, ValueMap};
//!
//! let mut values = ValueMap::new();
//! values.insert("user".into(), Value::from("ada"));
//! values.insert("visits".into(), Value::from(3i64));
//! assert_eq!(values["visits"].as_int(), Some(3));
//! ```
//!
//! Three keys (`created_on`, `modified_on`, `expires_on`) are reserved:
//! the store reinjects the row timestamps under them after every load and
//! strips them before persisting, so they never land in the stored blob.
//! Setting `created_on` or `expires_on` before a save overrides the
//! computed timestamps (the expiry override is clamped so renewal never
//! shrinks the configured window).

pub mod codec;
pub mod entity;
mod error;
#[cfg(feature = "migration")]
pub mod migration;
mod session;
mod store;
mod value;

pub use codec::{Codec, HmacCodec};
pub use error::{Error, Result};
pub use session::{CookieOptions, Session, CREATED_ON, EXPIRES_ON, MODIFIED_ON, RESERVED_KEYS};
pub use store::SeaOrmStore;
pub use value::{Value, ValueMap};
