use crate::column::Field;

/// A type mapped to one SQLite table.
///
/// Usually implemented with the [`table!`](crate::table!) macro. The table is named
/// after the lowercased type name and always gets an autoincrementing `id` primary
/// key in front of the declared fields.
pub trait Table: 'static {
    /// The Rust type name, e.g. `Author`
    fn type_name() -> &'static str;

    /// Declared fields with their names, in any order
    fn fields() -> Vec<(&'static str, Field)>;

    fn table_name() -> String {
        Self::type_name().to_lowercase()
    }

    /// The `CREATE TABLE IF NOT EXISTS` statement for this table
    fn create_sql() -> String {
        create_table_sql(&Self::table_name(), Self::fields())
    }
}

/// Builds the create statement; fields are emitted sorted by name
pub fn create_table_sql(table_name: &str, mut fields: Vec<(&'static str, Field)>) -> String {
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let columns = std::iter::once("id INTEGER PRIMARY KEY AUTOINCREMENT".to_owned())
        .chain(fields.iter().map(|(name, field)| field.column_definition(name)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE TABLE IF NOT EXISTS {table_name} ({columns});")
}

/// Declares unit structs implementing [`Table`].
///
/// ```
/// use sprout_orm::{Table, table};
///
/// table! {
///     pub Author {
///         name: column(String),
///         age: column(i64),
///     }
/// }
///
/// table! {
///     pub Book {
///         title: column(String),
///         published: column(bool),
///         author: foreign_key(Author),
///     }
/// }
///
/// assert_eq!(
///     Book::create_sql(),
///     "CREATE TABLE IF NOT EXISTS book (id INTEGER PRIMARY KEY AUTOINCREMENT, author_id INTEGER, published INTEGER, title TEXT);"
/// );
/// ```
#[macro_export]
macro_rules! table {
    (@field column($ty:ty)) => {
        $crate::Field::Column($crate::Column::of::<$ty>())
    };
    (@field foreign_key($table:ty)) => {
        $crate::Field::ForeignKey($crate::ForeignKey::to::<$table>())
    };
    ($(#[$meta:meta])* $vis:vis $name:ident { $($field:ident : $kind:ident ( $($arg:tt)* )),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::Table for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn fields() -> ::std::vec::Vec<(&'static str, $crate::Field)> {
                vec![$((stringify!($field), $crate::table!(@field $kind($($arg)*)))),*]
            }
        }
    };
}
