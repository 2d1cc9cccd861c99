mod assertion;
mod column;
mod config;
mod connection;
mod cursor;
mod dataset;
mod error;
pub mod fixture;
pub mod literal;
mod normalize;
mod projection;
mod render;
mod session;
mod table;
mod value;

pub use assertion::assert_equal;
pub use column::{Column, TableMetadata, TypeTag};
pub use config::ConnectionConfig;
pub use connection::{Connection, ConnectionProvider, DatabaseOperation, Query, with_connection};
pub use cursor::{EntityFactory, ResultCursor, table_to_entities};
pub use dataset::DataSet;
pub use error::{
    AssertionError, BoxedSourceError, ConnectionError, CursorError, DataSetError, Error,
    FormatError, Result,
};
pub use fixture::{DataSetBuilder, TableBuilder};
pub use literal::LiteralFormat;
pub use normalize::sort_by;
pub use projection::{project, project_names};
pub use render::{
    DEFAULT_MIN_COLUMN_WIDTH, RenderOptions, TableRenderer, render_data_set, render_table,
};
pub use session::{Exporter, Loader, assert_tables};
pub use table::Table;
pub use value::{Number, Value};
