use anyhow::Result;
use queries::*;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::debug;

use crate::{
    normalize_title,
    stats::{PlayCounts, RecentlyPlayed},
};

mod legacy;
pub mod queries;
mod tables;

pub const DATABASE_FILENAME: &str = "playdeck.db";

/// Embedded store for play counts and listening history.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        debug!(path = %path.as_ref().display(), "Opened stats database");

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let mut db = Database { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(tables::CREATE_TABLES)?;
        tx.commit()?;

        Ok(())
    }

    // ===============
    //   PLAY COUNTS
    // ===============

    pub fn load_play_counts(&mut self) -> Result<PlayCounts> {
        let mut counts = PlayCounts::new();
        let mut stmt = self.conn.prepare(GET_PLAY_COUNTS)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>("title")?, row.get::<_, u32>("count")?))
        })?;

        for row in rows {
            let (title, count) = row?;
            counts.set(&title, count);
        }

        Ok(counts)
    }

    pub fn has_play_counts(&mut self) -> Result<bool> {
        let n: i64 = self.conn.query_row(COUNT_PLAYS, [], |row| row.get(0))?;
        Ok(n > 0)
    }

    // ============
    //   HISTORY
    // ============

    pub fn has_history(&mut self) -> Result<bool> {
        let n: i64 = self.conn.query_row(COUNT_HISTORY, [], |row| row.get(0))?;
        Ok(n > 0)
    }

    pub fn load_history(&mut self, capacity: usize) -> Result<RecentlyPlayed> {
        let titles = self
            .conn
            .prepare(LOAD_HISTORY)?
            .query_map([], |row| row.get::<_, String>("title"))?
            .collect::<Result<Vec<String>, _>>()?;

        // Stored most recent first; replay oldest first so the
        // stack ends up in the same order
        let mut history = RecentlyPlayed::with_capacity(capacity);
        for title in titles.iter().rev() {
            history.push(title);
        }

        Ok(history)
    }

    /// Replace the stored counts and history in a single transaction.
    pub fn save_stats(&mut self, counts: &PlayCounts, history: &RecentlyPlayed) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            tx.execute(CLEAR_PLAYS, [])?;
            let mut stmt = tx.prepare(INSERT_PLAY_COUNT)?;
            for (title, count) in counts.iter() {
                stmt.execute(params![normalize_title(title), title, count])?;
            }

            tx.execute(CLEAR_HISTORY, [])?;
            let mut stmt = tx.prepare(INSERT_INTO_HISTORY)?;
            for (idx, title) in history.get_all().into_iter().enumerate() {
                stmt.execute(params![idx as i64, title])?;
            }
        }
        tx.commit()?;

        debug!(
            plays = counts.len(),
            history = history.len(),
            "Saved stats"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_counts_and_history() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(!db.has_play_counts().unwrap());

        let mut counts = PlayCounts::new();
        counts.add_play("Song A");
        counts.add_play("Song A");
        counts.add_play("Song B");

        let mut history = RecentlyPlayed::default();
        for title in ["Song B", "Song A", "Song A"] {
            history.push(title);
        }

        db.save_stats(&counts, &history).unwrap();
        assert!(db.has_play_counts().unwrap());

        let loaded = db.load_play_counts().unwrap();
        assert_eq!(loaded.count("song a"), 2);
        assert_eq!(loaded.count("song b"), 1);

        let loaded = db.load_history(500).unwrap();
        assert_eq!(loaded.get_all(), vec!["Song A", "Song A", "Song B"]);
    }

    #[test]
    fn saving_replaces_previous_state() {
        let mut db = Database::open_in_memory().unwrap();

        let mut counts = PlayCounts::new();
        counts.set("old", 4);
        let mut history = RecentlyPlayed::default();
        history.push("old");
        db.save_stats(&counts, &history).unwrap();

        let mut counts = PlayCounts::new();
        counts.set("new", 1);
        db.save_stats(&counts, &RecentlyPlayed::default()).unwrap();

        let loaded = db.load_play_counts().unwrap();
        assert_eq!(loaded.count("old"), 0);
        assert_eq!(loaded.count("new"), 1);
        assert!(db.load_history(500).unwrap().is_empty());
    }

    #[test]
    fn history_respects_capacity_on_load() {
        let mut db = Database::open_in_memory().unwrap();
        let mut history = RecentlyPlayed::default();
        for title in ["1", "2", "3", "4"] {
            history.push(title);
        }
        db.save_stats(&PlayCounts::new(), &history).unwrap();

        let loaded = db.load_history(2).unwrap();
        assert_eq!(loaded.get_all(), vec!["4", "3"]);
    }

    #[test]
    fn file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATABASE_FILENAME);

        {
            let mut db = Database::open(&path).unwrap();
            let mut counts = PlayCounts::new();
            counts.set("kept", 7);
            db.save_stats(&counts, &RecentlyPlayed::default()).unwrap();
        }

        let mut db = Database::open(&path).unwrap();
        assert_eq!(db.load_play_counts().unwrap().count("kept"), 7);
    }
}
