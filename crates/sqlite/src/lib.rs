mod affinity;
mod connection;
mod provider;
mod queries;

pub use affinity::type_tag_for_declared_type;
pub use connection::SqliteConnection;
pub use provider::{FOREIGN_KEYS_KEY, SqliteProvider};
