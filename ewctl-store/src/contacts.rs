//! 联系人仓储

use std::sync::Arc;

use serde_json::json;

use crate::error::{Result, StoreError};
use crate::traits::SqlExecutor;
use crate::types::{Contact, ContactSummary, validate_phone};
use crate::utils::row::{self, Row};

const WITH_STATS_SQL: &str = "
    SELECT
        c.*,
        COUNT(DISTINCT fn.form_id) AS form_count,
        GROUP_CONCAT(DISTINCT fn.form_id) AS form_ids
    FROM contacts c
    LEFT JOIN form_numbers fn ON c.id = fn.contact_id
    GROUP BY c.id
    ORDER BY c.name ASC";

const SEARCH_SQL: &str = "
    SELECT
        c.*,
        COUNT(DISTINCT fn.form_id) AS form_count,
        GROUP_CONCAT(DISTINCT fn.form_id) AS form_ids
    FROM contacts c
    LEFT JOIN form_numbers fn ON c.id = fn.contact_id
    WHERE c.name LIKE ? OR c.company LIKE ? OR c.phone_number LIKE ?
    GROUP BY c.id
    ORDER BY c.name ASC";

/// 联系人的增删改查
#[derive(Clone)]
pub struct ContactRepository {
    db: Arc<dyn SqlExecutor>,
}

impl ContactRepository {
    pub fn new(db: Arc<dyn SqlExecutor>) -> Self {
        Self { db }
    }

    /// 所有联系人，按姓名排序
    pub async fn list(&self) -> Result<Vec<Contact>> {
        let result = self
            .db
            .query("SELECT * FROM contacts ORDER BY name ASC", Vec::new())
            .await?;
        Ok(result.rows.iter().map(contact_from_row).collect())
    }

    /// 所有联系人及其关联的表单
    pub async fn list_with_stats(&self) -> Result<Vec<ContactSummary>> {
        let result = self.db.query(WITH_STATS_SQL, Vec::new()).await?;
        Ok(result.rows.iter().map(summary_from_row).collect())
    }

    /// 按姓名、公司或电话模糊搜索
    pub async fn search(&self, term: &str) -> Result<Vec<ContactSummary>> {
        let pattern = json!(format!("%{term}%"));
        let result = self
            .db
            .query(
                SEARCH_SQL,
                vec![pattern.clone(), pattern.clone(), pattern],
            )
            .await?;
        Ok(result.rows.iter().map(summary_from_row).collect())
    }

    /// 按 ID 读取
    pub async fn get(&self, id: i64) -> Result<Contact> {
        let result = self
            .db
            .query("SELECT * FROM contacts WHERE id = ?", vec![json!(id)])
            .await?;
        result
            .first()
            .map(contact_from_row)
            .ok_or_else(|| StoreError::NotFound {
                entity: "contact",
                id: id.to_string(),
            })
    }

    /// 某个表单的收件联系人
    pub async fn by_form(&self, form_id: &str) -> Result<Vec<Contact>> {
        let result = self
            .db
            .query(
                "SELECT DISTINCT c.* FROM contacts c
                 JOIN form_numbers fn ON c.id = fn.contact_id
                 WHERE fn.form_id = ?
                 ORDER BY c.name ASC",
                vec![json!(form_id)],
            )
            .await?;
        Ok(result.rows.iter().map(contact_from_row).collect())
    }

    /// 新建联系人，返回数据库分配的 ID
    pub async fn create(&self, contact: &Contact) -> Result<i64> {
        validate(contact)?;
        let result = self
            .db
            .query(
                "INSERT INTO contacts (phone_number, name, company, role, notes, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                vec![
                    json!(contact.phone_number),
                    json!(contact.name),
                    json!(contact.company),
                    json!(contact.role),
                    json!(contact.notes),
                ],
            )
            .await?;
        log::debug!("Created contact {}", result.meta.last_row_id);
        Ok(result.meta.last_row_id)
    }

    /// 更新联系人
    pub async fn update(&self, contact: &Contact) -> Result<()> {
        validate(contact)?;
        self.db
            .query(
                "UPDATE contacts
                 SET phone_number = ?, name = ?, company = ?, role = ?, notes = ?,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                vec![
                    json!(contact.phone_number),
                    json!(contact.name),
                    json!(contact.company),
                    json!(contact.role),
                    json!(contact.notes),
                    json!(contact.id),
                ],
            )
            .await?;
        log::debug!("Updated contact {}", contact.id);
        Ok(())
    }

    /// 删除联系人
    ///
    /// 先解除 `form_numbers` 中的引用；这一步失败只记录警告。
    pub async fn delete(&self, id: i64) -> Result<()> {
        if let Err(e) = self
            .db
            .query(
                "UPDATE form_numbers SET contact_id = NULL WHERE contact_id = ?",
                vec![json!(id)],
            )
            .await
        {
            log::warn!("Failed to remove references to contact {id}: {e}");
        }

        self.db
            .query("DELETE FROM contacts WHERE id = ?", vec![json!(id)])
            .await?;
        log::debug!("Deleted contact {id}");
        Ok(())
    }
}

fn validate(contact: &Contact) -> Result<()> {
    if contact.name.trim().is_empty() {
        return Err(StoreError::InvalidInput {
            field: "name",
            detail: "name is required".to_string(),
        });
    }
    validate_phone(&contact.phone_number)
}

fn contact_from_row(row: &Row) -> Contact {
    Contact {
        id: row::int(row, "id"),
        phone_number: row::text(row, "phone_number"),
        name: row::text(row, "name"),
        company: row::text(row, "company"),
        role: row::text(row, "role"),
        notes: row::text(row, "notes"),
        created_at: row::timestamp(row, "created_at"),
        updated_at: row::timestamp(row, "updated_at"),
    }
}

fn summary_from_row(row: &Row) -> ContactSummary {
    ContactSummary {
        contact: contact_from_row(row),
        form_count: row::int(row, "form_count"),
        form_ids: row::list(row, "form_ids"),
    }
}
