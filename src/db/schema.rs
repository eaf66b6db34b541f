/// SQL statements for creating the catalog schema.
///
/// Every statement is create-if-absent so opening an existing catalog never
/// drops data.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    root_path TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS modules (
    id INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    docstring TEXT,
    last_indexed TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    UNIQUE (project_id, path)
);

CREATE TABLE IF NOT EXISTS classes (
    id INTEGER PRIMARY KEY,
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    docstring TEXT,
    lineno INTEGER NOT NULL,
    end_lineno INTEGER NOT NULL,
    base_classes TEXT NOT NULL DEFAULT '[]',
    decorators TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS functions (
    id INTEGER PRIMARY KEY,
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    class_id INTEGER REFERENCES classes(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    docstring TEXT,
    lineno INTEGER NOT NULL,
    end_lineno INTEGER NOT NULL,
    args TEXT NOT NULL DEFAULT '[]',
    decorators TEXT NOT NULL DEFAULT '[]',
    return_annotation TEXT
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    module_name TEXT NOT NULL,
    alias TEXT,
    is_from_import INTEGER NOT NULL DEFAULT 0,
    parent_module TEXT
);

CREATE TABLE IF NOT EXISTS variables (
    id INTEGER PRIMARY KEY,
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    lineno INTEGER NOT NULL,
    value TEXT
);

CREATE INDEX IF NOT EXISTS idx_modules_project ON modules(project_id);
CREATE INDEX IF NOT EXISTS idx_modules_path ON modules(path);
CREATE INDEX IF NOT EXISTS idx_classes_module ON classes(module_id);
CREATE INDEX IF NOT EXISTS idx_functions_module ON functions(module_id);
CREATE INDEX IF NOT EXISTS idx_functions_class ON functions(class_id);
CREATE INDEX IF NOT EXISTS idx_imports_module ON imports(module_id);
CREATE INDEX IF NOT EXISTS idx_variables_module ON variables(module_id);
";

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_creates_without_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('demo', '/tmp/demo')",
            [],
        )
        .unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn duplicate_module_path_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('demo', '/tmp/demo')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO modules (project_id, name, path) VALUES (1, 'a', '/tmp/demo/a.py')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO modules (project_id, name, path) VALUES (1, 'a', '/tmp/demo/a.py')",
            [],
        );
        assert!(dup.is_err());
    }
}
