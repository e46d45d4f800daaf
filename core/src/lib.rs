//! Local data layer for the liftbook workout tracker: validated record
//! schemas, a SQLite store with change notification, and the live queries
//! and record bookkeeping built on top of it.

pub mod backup;
pub mod collation;
pub mod db;
pub mod error;
pub mod live;
pub mod logger;
pub mod models;
pub mod schema;
pub mod service;
pub mod settings;

pub use error::{Error, Result, ValidationError};
