//! 表单仓储

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{Result, StoreError};
use crate::traits::SqlExecutor;
use crate::types::{Form, FormField, FormNumber, FormSummary};
use crate::utils::row::{self, Row};

const LIST_SQL: &str = "
    SELECT
        f.id, f.name, f.description, f.created_at, f.updated_at,
        COUNT(DISTINCT ff.id) AS field_count,
        COUNT(DISTINCT fn.id) AS number_count
    FROM forms f
    LEFT JOIN form_fields ff ON f.id = ff.form_id
    LEFT JOIN form_numbers fn ON f.id = fn.form_id
    GROUP BY f.id
    ORDER BY f.created_at DESC";

const SEARCH_SQL: &str = "
    SELECT
        f.id, f.name, f.description, f.created_at, f.updated_at,
        COUNT(DISTINCT ff.id) AS field_count,
        COUNT(DISTINCT fn.id) AS number_count
    FROM forms f
    LEFT JOIN form_fields ff ON f.id = ff.form_id
    LEFT JOIN form_numbers fn ON f.id = fn.form_id
    WHERE f.name LIKE ? OR f.description LIKE ?
    GROUP BY f.id
    ORDER BY f.created_at DESC";

/// 表单的增删改查
#[derive(Clone)]
pub struct FormRepository {
    db: Arc<dyn SqlExecutor>,
}

impl FormRepository {
    pub fn new(db: Arc<dyn SqlExecutor>) -> Self {
        Self { db }
    }

    /// 所有表单及字段、收件人数量，按创建时间倒序
    pub async fn list(&self) -> Result<Vec<FormSummary>> {
        let result = self.db.query(LIST_SQL, Vec::new()).await?;
        Ok(result.rows.iter().map(summary_from_row).collect())
    }

    /// 按名称或描述模糊搜索
    pub async fn search(&self, term: &str) -> Result<Vec<FormSummary>> {
        let pattern = format!("%{term}%");
        let result = self
            .db
            .query(SEARCH_SQL, vec![json!(pattern), json!(pattern)])
            .await?;
        Ok(result.rows.iter().map(summary_from_row).collect())
    }

    /// 读取单个表单及其字段和收件人
    ///
    /// 字段或收件人查询失败只记录日志，对应列表为空。
    pub async fn get(&self, id: &str) -> Result<Form> {
        let result = self
            .db
            .query("SELECT * FROM forms WHERE id = ?", vec![json!(id)])
            .await?;
        let row = result.first().ok_or_else(|| StoreError::NotFound {
            entity: "form",
            id: id.to_string(),
        })?;

        let mut form = Form {
            id: row::text(row, "id"),
            name: row::text(row, "name"),
            description: row::text(row, "description"),
            fields: Vec::new(),
            numbers: Vec::new(),
            created_at: row::timestamp(row, "created_at"),
            updated_at: row::timestamp(row, "updated_at"),
        };

        match self.fields(id).await {
            Ok(fields) => form.fields = fields,
            Err(e) => log::error!("Failed to get fields of form {id}: {e}"),
        }
        match self.numbers(id).await {
            Ok(numbers) => form.numbers = numbers,
            Err(e) => log::error!("Failed to get numbers of form {id}: {e}"),
        }

        Ok(form)
    }

    /// 新建表单，随后写入字段（按顺序编号）和收件人
    pub async fn create(&self, form: &Form) -> Result<()> {
        if form.id.trim().is_empty() || form.id.contains(' ') {
            return Err(StoreError::InvalidInput {
                field: "id",
                detail: "form id must be non-empty and contain no spaces".to_string(),
            });
        }

        self.db
            .query(
                "INSERT INTO forms (id, name, description, created_at, updated_at)
                 VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                vec![json!(form.id), json!(form.name), json!(form.description)],
            )
            .await?;

        self.insert_children(form).await;
        log::debug!("Created form {}", form.id);
        Ok(())
    }

    /// 更新表单：改写基本信息，删除后重建字段和收件人
    pub async fn update(&self, form: &Form) -> Result<()> {
        self.db
            .query(
                "UPDATE forms SET name = ?, description = ?, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                vec![json!(form.name), json!(form.description), json!(form.id)],
            )
            .await?;

        for sql in [
            "DELETE FROM form_fields WHERE form_id = ?",
            "DELETE FROM form_numbers WHERE form_id = ?",
        ] {
            if let Err(e) = self.db.query(sql, vec![json!(form.id)]).await {
                log::warn!("Failed to clear children of form {}: {e}", form.id);
            }
        }

        self.insert_children(form).await;
        log::debug!("Updated form {}", form.id);
        Ok(())
    }

    /// 删除表单（字段和收件人由外键级联删除）
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.db
            .query("DELETE FROM forms WHERE id = ?", vec![json!(id)])
            .await?;
        log::debug!("Deleted form {id}");
        Ok(())
    }

    async fn fields(&self, form_id: &str) -> Result<Vec<FormField>> {
        let result = self
            .db
            .query(
                "SELECT * FROM form_fields WHERE form_id = ? ORDER BY position",
                vec![json!(form_id)],
            )
            .await?;
        Ok(result.rows.iter().map(field_from_row).collect())
    }

    async fn numbers(&self, form_id: &str) -> Result<Vec<FormNumber>> {
        let result = self
            .db
            .query(
                "SELECT * FROM form_numbers WHERE form_id = ?",
                vec![json!(form_id)],
            )
            .await?;
        Ok(result.rows.iter().map(number_from_row).collect())
    }

    async fn insert_children(&self, form: &Form) {
        for (position, field) in form.fields.iter().enumerate() {
            let params = vec![
                json!(form.id),
                json!(field.elementor_id),
                json!(field.label),
                json!(field.field_type),
                json!(i64::from(field.required)),
                json!(position),
            ];
            if let Err(e) = self
                .db
                .query(
                    "INSERT INTO form_fields (form_id, elementor_id, label, type, required, position)
                     VALUES (?, ?, ?, ?, ?, ?)",
                    params,
                )
                .await
            {
                log::error!("Failed to create field {}: {e}", field.elementor_id);
            }
        }

        for number in &form.numbers {
            let params = vec![
                json!(form.id),
                json!(number.phone_number),
                json!(number.label),
                number.contact_id.map_or(Value::Null, |id| json!(id)),
            ];
            if let Err(e) = self
                .db
                .query(
                    "INSERT INTO form_numbers (form_id, phone_number, label, contact_id)
                     VALUES (?, ?, ?, ?)",
                    params,
                )
                .await
            {
                log::error!("Failed to create number {}: {e}", number.phone_number);
            }
        }
    }
}

fn summary_from_row(row: &Row) -> FormSummary {
    FormSummary {
        id: row::text(row, "id"),
        name: row::text(row, "name"),
        description: row::text(row, "description"),
        created_at: row::timestamp(row, "created_at"),
        updated_at: row::timestamp(row, "updated_at"),
        field_count: row::int(row, "field_count"),
        number_count: row::int(row, "number_count"),
    }
}

fn field_from_row(row: &Row) -> FormField {
    FormField {
        id: row::int(row, "id"),
        elementor_id: row::text(row, "elementor_id"),
        label: row::text(row, "label"),
        field_type: row::text(row, "type"),
        required: row::flag(row, "required"),
        position: row::int(row, "position"),
    }
}

fn number_from_row(row: &Row) -> FormNumber {
    FormNumber {
        id: row::int(row, "id"),
        phone_number: row::text(row, "phone_number"),
        label: row::text(row, "label"),
        contact_id: row::opt_int(row, "contact_id"),
    }
}
