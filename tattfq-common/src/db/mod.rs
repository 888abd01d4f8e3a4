//! Response store: models, SQLite initialization, and queries

pub mod init;
pub mod models;
pub mod store;

pub use init::init_database;
pub use models::{RatingKind, ResponseMeta, StoredResponse};
pub use store::{ResponseStore, DEFAULT_LOAD_LIMIT};
