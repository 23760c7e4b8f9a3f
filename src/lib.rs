//! SavePass: a local credential store.
//!
//! Credentials are kept as one JSON array under a single key of a
//! [`backend::KeyValueBackend`]. [`store::RecordStore`] owns that blob and
//! [`query::filter`] searches an already loaded collection.
//!
//! Passwords are stored in plaintext.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod query;
pub mod store;
