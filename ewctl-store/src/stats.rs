//! 仪表盘统计

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::traits::SqlExecutor;
use crate::types::{ConnectionStatus, Stats};
use crate::utils::row;

/// 汇总仪表盘数据
#[derive(Clone)]
pub struct StatsRepository {
    db: Arc<dyn SqlExecutor>,
}

impl StatsRepository {
    pub fn new(db: Arc<dyn SqlExecutor>) -> Self {
        Self { db }
    }

    /// 收集统计
    ///
    /// 每个查询独立执行，失败的一项保持零值；最后用 `SELECT 1` 判断连接状态。
    pub async fn collect(&self) -> Stats {
        let mut stats = Stats::default();

        if let Some(count) = self.count("SELECT COUNT(*) AS count FROM forms", Vec::new()).await {
            stats.total_forms = count;
            stats.active_forms = count;
        }

        if let Some(count) = self
            .count("SELECT COUNT(*) AS count FROM contacts", Vec::new())
            .await
        {
            stats.total_contacts = count;
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        if let Some(count) = self
            .count(
                "SELECT COUNT(*) AS count FROM webhook_logs WHERE DATE(created_at) = ?",
                vec![json!(today)],
            )
            .await
        {
            stats.webhooks_today = count;
        }

        match self
            .db
            .query(
                "SELECT created_at FROM webhook_logs ORDER BY created_at DESC LIMIT 1",
                Vec::new(),
            )
            .await
        {
            Ok(result) => {
                stats.last_webhook = result.first().and_then(|r| row::timestamp(r, "created_at"));
            }
            Err(e) => log::error!("Failed to get last webhook: {e}"),
        }

        stats.connection = match self.db.query("SELECT 1", Vec::new()).await {
            Ok(_) => ConnectionStatus::Connected,
            Err(e) => {
                log::warn!("D1 ping failed: {e}");
                ConnectionStatus::Disconnected
            }
        };

        stats
    }

    async fn count(&self, sql: &str, params: Vec<serde_json::Value>) -> Option<i64> {
        match self.db.query(sql, params).await {
            Ok(result) => Some(result.first().map_or(0, |r| row::int(r, "count"))),
            Err(e) => {
                log::error!("Stats query failed ({sql}): {e}");
                None
            }
        }
    }
}
