//! Database schema for the reasoning-path store.

/// SQL to create the reasoning_paths table.
///
/// Metadata is serialized as a JSON document in one column; the remaining
/// columns are the path's identity and scoring fields.
pub const CREATE_REASONING_PATHS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reasoning_paths (
    path_id TEXT PRIMARY KEY NOT NULL,
    path_type TEXT NOT NULL,
    description TEXT,
    prompt_template TEXT NOT NULL,
    strategy_id TEXT,
    instance_id TEXT,
    metadata_doc TEXT NOT NULL,
    is_learned INTEGER NOT NULL DEFAULT 0,
    learning_source TEXT,
    effectiveness_score REAL NOT NULL DEFAULT 0.5,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)
"#;

/// Index on strategy_id for strategy-scoped lookups
pub const CREATE_STRATEGY_ID_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_reasoning_paths_strategy_id
ON reasoning_paths(strategy_id)
"#;

/// Index on path_type for category filtering
pub const CREATE_PATH_TYPE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_reasoning_paths_path_type
ON reasoning_paths(path_type)
"#;

/// Index on created_at for chronological queries
pub const CREATE_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_reasoning_paths_created_at
ON reasoning_paths(created_at)
"#;
