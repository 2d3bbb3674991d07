use crate::table::Table;
use std::any::TypeId;
use std::fmt;

/// SQLite storage classes a column can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rust types with a fixed SQLite column type
pub trait ColumnType: 'static {
    const SQL_TYPE: SqlType;
}

macro_rules! column_type {
    ($sql_type:ident => $($ty:ty),+) => {
        $(
            impl ColumnType for $ty {
                const SQL_TYPE: SqlType = SqlType::$sql_type;
            }
        )+
    };
}

column_type!(Integer => i8, i16, i32, i64, u8, u16, u32, isize);
// stored as 0 or 1
column_type!(Integer => bool);
column_type!(Real => f32, f64);
column_type!(Text => String, &'static str);
column_type!(Blob => Vec<u8>);

/// A plain typed column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    sql_type: SqlType,
    rust_type: Option<TypeId>,
}

impl Column {
    /// A column declared by its SQL type only
    pub fn new(sql_type: SqlType) -> Self {
        Self { sql_type, rust_type: None }
    }

    /// A column holding values of `T`
    pub fn of<T: ColumnType>() -> Self {
        Self { sql_type: T::SQL_TYPE, rust_type: Some(TypeId::of::<T>()) }
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Whether the column was declared with [`Column::of::<T>`](Column::of)
    pub fn is<T: 'static>(&self) -> bool {
        self.rust_type == Some(TypeId::of::<T>())
    }
}

/// A reference to another table, stored as `<field>_id INTEGER`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    table: TypeId,
    table_name: String,
}

impl ForeignKey {
    pub fn to<T: Table>() -> Self {
        Self { table: TypeId::of::<T>(), table_name: T::table_name() }
    }

    /// Name of the referenced table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn references<T: Table>(&self) -> bool {
        self.table == TypeId::of::<T>()
    }
}

/// One declared attribute of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Column(Column),
    ForeignKey(ForeignKey),
}

impl Field {
    /// The column definition for this field, e.g. `age INTEGER` or `author_id INTEGER`
    pub fn column_definition(&self, name: &str) -> String {
        match self {
            Field::Column(column) => format!("{name} {}", column.sql_type()),
            Field::ForeignKey(_) => format!("{name}_id {}", SqlType::Integer),
        }
    }
}
