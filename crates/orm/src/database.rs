use crate::table::Table;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const SELECT_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table';";

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("sqlite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },
}

/// One SQLite database file
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OrmError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "open database");
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self, OrmError> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the table for `T` unless it already exists
    pub fn create<T: Table>(&self) -> Result<(), OrmError> {
        let sql = T::create_sql();
        debug!(%sql, "create table");
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    /// Names of the tables in the database, as listed by `sqlite_master`.
    ///
    /// SQLite's own `sqlite_sequence` shows up once an autoincrement table exists.
    pub fn tables(&self) -> Result<Vec<String>, OrmError> {
        let mut statement = self.conn.prepare(SELECT_TABLES_SQL)?;
        let names = statement.query_map([], |row| row.get::<_, String>(0))?.collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
