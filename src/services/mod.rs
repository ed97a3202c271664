//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `identity` and `profile_store` define the two backend capabilities;
//! `firebase`, `pg_store` and `memory` implement them. `session` holds the
//! per-browser controller built on top, and `registry` maps browser cookies
//! to controllers.

pub mod firebase;
pub mod identity;
pub mod memory;
pub mod pg_store;
pub mod profile_store;
pub mod registry;
pub mod session;
