//! 数据库表结构

use crate::error::Result;
use crate::traits::SqlExecutor;

const STATEMENTS: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS forms (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS form_fields (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        form_id TEXT NOT NULL,
        elementor_id TEXT NOT NULL,
        label TEXT NOT NULL,
        type TEXT DEFAULT 'text',
        required BOOLEAN DEFAULT 0,
        position INTEGER DEFAULT 0,
        FOREIGN KEY (form_id) REFERENCES forms(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS contacts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        phone_number TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        company TEXT,
        role TEXT,
        notes TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS form_numbers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        form_id TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        label TEXT,
        contact_id INTEGER,
        FOREIGN KEY (form_id) REFERENCES forms(id) ON DELETE CASCADE,
        FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS webhook_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        form_id TEXT,
        status TEXT,
        request TEXT,
        response TEXT,
        duration_ms INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (form_id) REFERENCES forms(id) ON DELETE CASCADE
    )",
];

/// 创建缺失的表，可重复执行
pub async fn init(db: &dyn SqlExecutor) -> Result<usize> {
    for sql in STATEMENTS {
        db.query(sql, Vec::new()).await?;
    }
    log::info!("Schema ready ({} tables)", STATEMENTS.len());
    Ok(STATEMENTS.len())
}
