use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::QueryResult;

/// SQL 执行器 Trait
///
/// 仓储只依赖这个接口；生产环境由 [`D1Client`](crate::D1Client) 实现，
/// 测试中可替换为记录调用的 mock。
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// 执行一条 SQL，返回第一个结果集
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<QueryResult>;
}
