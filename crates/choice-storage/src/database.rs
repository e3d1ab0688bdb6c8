//! SQLite-backed cookie jar

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::jar::{Cookie, CookieJar};
use crate::migrations::run_migrations;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

fn timestamp(at: DateTime<Utc>) -> String {
    // Fixed-width UTC form so that expiry comparisons can run in SQL
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Delete every entry whose expiry has passed, returning how many went
    pub fn purge_expired(&self) -> Result<usize> {
        let now = timestamp(Utc::now());
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM cookies WHERE expires_at <= ?1", [now])?)
        })?;

        if removed > 0 {
            tracing::debug!(removed, "Purged expired cookies");
        }

        Ok(removed)
    }
}

impl CookieJar for Database {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let row: Option<(String, String)> = self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT value, expires_at FROM cookies WHERE name = ?1",
                    [name],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?)
        })?;

        match row {
            Some((value, expires_at)) => {
                if parse_timestamp(&expires_at)? <= Utc::now() {
                    self.remove(name)?;
                    Ok(None)
                } else {
                    Ok(Some(value))
                }
            }
            None => Ok(None),
        }
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        let updated_at = timestamp(Utc::now());
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cookies (name, value, path, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    cookie.name,
                    cookie.value,
                    cookie.path,
                    timestamp(cookie.expires_at),
                    updated_at,
                ],
            )?;
            Ok(())
        })?;

        tracing::trace!(cookie = %cookie.to_header(), "Stored cookie");

        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM cookies WHERE name = ?1", [name])?;
            Ok(())
        })
    }

    fn entries(&self) -> Result<Vec<Cookie>> {
        self.purge_expired()?;

        let rows: Vec<(String, String, String, String)> = self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, value, path, expires_at FROM cookies ORDER BY name ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(name, value, path, expires_at)| {
                Ok(Cookie {
                    name,
                    value,
                    path,
                    expires_at: parse_timestamp(&expires_at)?,
                })
            })
            .collect()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
