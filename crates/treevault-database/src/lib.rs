//! # treevault-database
//!
//! SQLite connection management, embedded migrations, and the raw-SQL
//! repositories behind the folder tree and file catalog.
//!
//! Repositories are stateless: every query runs on a caller-supplied
//! connection so one use case can span several repositories inside a single
//! transaction.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
