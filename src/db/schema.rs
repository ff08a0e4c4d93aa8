use rusqlite::Connection;

/// Table names and columns are the on-disk contract other tools read.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categorias (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS produtos (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    nome         TEXT NOT NULL,
    quantidade   INTEGER NOT NULL CHECK(quantidade >= 0),
    preco        REAL NOT NULL CHECK(preco >= 0),
    categoria_id INTEGER,
    FOREIGN KEY (categoria_id) REFERENCES categorias (id)
);
"#;

/// Create both tables if they are missing. Safe to run on every start.
pub(crate) fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
