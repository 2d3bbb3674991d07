//! A tiny table definition layer over SQLite.
//!
//! Tables are declared as types implementing [`Table`], most conveniently with the
//! [`table!`] macro, and created in a [`Database`]:
//!
//! ```
//! use sprout_orm::{Database, table};
//!
//! table! {
//!     pub Author {
//!         name: column(String),
//!         age: column(i64),
//!     }
//! }
//!
//! # fn main() -> Result<(), sprout_orm::OrmError> {
//! let db = Database::open_in_memory()?;
//! db.create::<Author>()?;
//! assert!(db.tables()?.contains(&"author".to_owned()));
//! # Ok(())
//! # }
//! ```

mod column;
mod database;
mod table;

pub use column::Column;
pub use column::ColumnType;
pub use column::Field;
pub use column::ForeignKey;
pub use column::SqlType;
pub use database::Database;
pub use database::OrmError;
pub use table::Table;
pub use table::create_table_sql;
