//! Database entity models.
//!
//! Sea-ORM entity definitions for the one table the store owns. The
//! [`session`] entity is the persisted form of a session; it is used
//! internally by [`SeaOrmStore`](crate::SeaOrmStore) and exported for
//! deployments that want to inspect or prune rows directly.

pub mod session;
