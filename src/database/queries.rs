pub const GET_PLAY_COUNTS: &str = "
    SELECT title, count FROM plays
";

pub const COUNT_PLAYS: &str = "
    SELECT COUNT(*) FROM plays
";

pub const CLEAR_PLAYS: &str = "
    DELETE FROM plays
";

pub const INSERT_PLAY_COUNT: &str = "
    INSERT OR REPLACE INTO plays (key, title, count)
    VALUES (?1, ?2, ?3)
";

// Position 0 is the most recent play
pub const LOAD_HISTORY: &str = "
    SELECT title FROM history
    ORDER BY position ASC
";

pub const COUNT_HISTORY: &str = "
    SELECT COUNT(*) FROM history
";

pub const CLEAR_HISTORY: &str = "
    DELETE FROM history
";

pub const INSERT_INTO_HISTORY: &str = "
    INSERT INTO history (position, title) VALUES (?1, ?2)
";
