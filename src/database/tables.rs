pub const CREATE_TABLES: &str = r"
    CREATE TABLE IF NOT EXISTS plays(
        key TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        count INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS history(
        position INTEGER PRIMARY KEY,
        title TEXT NOT NULL
    );
";
