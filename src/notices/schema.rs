//! Schema definition for notice storage tables.

/// Schema definition for notice tables.
pub struct NoticesSchema {
    pub version: usize,
    pub up: &'static str,
}

pub const NOTICES_VERSIONED_SCHEMAS: &[NoticesSchema] = &[NoticesSchema {
    version: 1,
    up: r#"
            CREATE TABLE IF NOT EXISTS options (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS object_meta (
                object_type TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                meta_key TEXT NOT NULL,
                meta_value TEXT NOT NULL,
                PRIMARY KEY (object_type, object_id, meta_key)
            );
        "#,
}];
