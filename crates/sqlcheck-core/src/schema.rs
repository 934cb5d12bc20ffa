//! Template schema introspection
//!
//! Lists the tables a learner can query, read from a private sandbox so the
//! template is never opened for anything but copying.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::StatementError;

/// A column of a template table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, empty when the column has none
    pub declared_type: String,
    pub primary_key: bool,
    pub not_null: bool,
}

/// A user table of the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

pub(crate) fn read_tables(conn: &Connection) -> Result<Vec<TableInfo>, StatementError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let mut info = conn.prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")?;
        let columns = info
            .query_map([&name], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    declared_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(2)? != 0,
                    primary_key: row.get::<_, i64>(3)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        tables.push(TableInfo { name, columns });
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE artists (ArtistId INTEGER PRIMARY KEY, Name NVARCHAR(120) NOT NULL);
             CREATE TABLE albums (AlbumId INTEGER PRIMARY KEY, Title, ArtistId INTEGER);",
        )
        .unwrap();

        let tables = read_tables(&conn).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "albums");
        assert_eq!(tables[0].columns[1].declared_type, "");

        let artists = &tables[1];
        assert_eq!(artists.columns.len(), 2);
        assert!(artists.columns[0].primary_key);
        assert_eq!(artists.columns[1].declared_type, "NVARCHAR(120)");
        assert!(artists.columns[1].not_null);
    }
}
