//! SQLite-backed color store.
//!
//! Table layout matches databases written by earlier deployments of the
//! service, so an existing `colors.db` keeps its cursor and counts.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::config::StoreConfig;
use crate::rotation::types::{ColorCount, Palette, Rotation};
use crate::store::{ColorStore, StorageError, StorageResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS ColorIndex (id INTEGER PRIMARY KEY, currentIndex INTEGER);
    CREATE TABLE IF NOT EXISTS ColorVisitors (color TEXT PRIMARY KEY, count INTEGER);
";

/// Row id of the single cursor row.
const CURSOR_ID: i64 = 1;

/// Color store over a single SQLite connection.
///
/// The connection sits behind a mutex, so each trait call runs alone. A
/// rotation made of separate calls can still interleave with another one;
/// [`ColorStore::rotate_atomic`] holds the lock for the whole sequence.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database described by `config`.
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let store = Self::open_path(&config.path)?;
        {
            let conn = store.conn()?;
            conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        }
        Ok(store)
    }

    /// Open (or create) the database file at `path` with driver defaults.
    pub fn open_path(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "Opened color database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, used by tests.
    pub fn in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl ColorStore for SqliteStore {
    fn initialize(&self, palette: &Palette) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.execute(
            "INSERT OR IGNORE INTO ColorIndex (id, currentIndex) VALUES (?1, 0)",
            params![CURSOR_ID],
        )?;
        let mut seeded = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO ColorVisitors (color, count) VALUES (?1, 0)")?;
            for color in palette.distinct() {
                seeded += stmt.execute(params![color])?;
            }
        }
        tx.commit()?;

        tracing::info!(
            palette_len = palette.len(),
            seeded_colors = seeded,
            "Color store initialized"
        );
        Ok(())
    }

    fn cursor(&self) -> StorageResult<usize> {
        let conn = self.conn()?;
        read_cursor(&conn)
    }

    fn set_cursor(&self, index: usize) -> StorageResult<()> {
        let conn = self.conn()?;
        write_cursor(&conn, index)
    }

    fn increment_count(&self, color: &str) -> StorageResult<()> {
        let conn = self.conn()?;
        bump_count(&conn, color)
    }

    fn list_counts(&self) -> StorageResult<Vec<ColorCount>> {
        let conn = self.conn()?;
        select_counts(&conn)
    }

    fn rotate_atomic(&self, palette: &Palette) -> StorageResult<Rotation> {
        let mut conn = self.conn()?;
        // Immediate: take the write lock before reading the cursor so another
        // process sharing the file cannot read the same value.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let cursor = read_cursor(&tx)? % palette.len();
        let color = palette.color_at(cursor).to_string();
        write_cursor(&tx, palette.next_index(cursor))?;
        bump_count(&tx, &color)?;
        let visitor_counts = select_counts(&tx)?;

        tx.commit()?;
        Ok(Rotation {
            current_color: color,
            visitor_counts,
        })
    }
}

fn read_cursor(conn: &Connection) -> StorageResult<usize> {
    let value: Option<i64> = conn
        .query_row(
            "SELECT currentIndex FROM ColorIndex WHERE id = ?1",
            params![CURSOR_ID],
            |row| row.get(0),
        )
        .optional()?;
    let value = value.ok_or(StorageError::MissingCursor)?;
    usize::try_from(value).map_err(|_| StorageError::InvalidCursor(value))
}

fn write_cursor(conn: &Connection, index: usize) -> StorageResult<()> {
    let updated = conn.execute(
        "UPDATE ColorIndex SET currentIndex = ?1 WHERE id = ?2",
        params![index as i64, CURSOR_ID],
    )?;
    if updated == 0 {
        return Err(StorageError::MissingCursor);
    }
    Ok(())
}

fn bump_count(conn: &Connection, color: &str) -> StorageResult<()> {
    let updated = conn.execute(
        "UPDATE ColorVisitors SET count = count + 1 WHERE color = ?1",
        params![color],
    )?;
    if updated == 0 {
        return Err(StorageError::UnknownColor(color.to_string()));
    }
    Ok(())
}

fn select_counts(conn: &Connection) -> StorageResult<Vec<ColorCount>> {
    // Rowid order is seeding order.
    let mut stmt = conn.prepare("SELECT color, count FROM ColorVisitors ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| {
        let color: String = row.get(0)?;
        let count: Option<i64> = row.get(1)?;
        Ok(ColorCount::new(color, count.unwrap_or(0).max(0) as u64))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
}
