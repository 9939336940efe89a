//! Sweet Repository
//!
//! Stock changes are single conditional `UPDATE` statements, so concurrent
//! purchases can never drive `quantity` below zero.

use super::{BaseRepository, RepoError, RepoResult, thing};
use crate::db::models::{SweetRecord, new_record_id};
use crate::utils::time::now_millis;
use shared::models::{SweetCreate, SweetSearch, SweetUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "sweet";

/// Attempts for a stock update hitting a transaction conflict
const MAX_STOCK_ATTEMPTS: u32 = 5;

const PURCHASE_QUERY: &str = r#"UPDATE $thing SET
        quantity -= $qty,
        updated_at = $now
    WHERE quantity >= $qty
    RETURN AFTER"#;

const RESTOCK_QUERY: &str = r#"UPDATE $thing SET
        quantity += $qty,
        updated_at = $now
    WHERE quantity >= 0
    RETURN AFTER"#;

#[derive(Clone)]
pub struct SweetRepository {
    base: BaseRepository,
}

impl SweetRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All sweets, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<SweetRecord>> {
        let sweets: Vec<SweetRecord> = self
            .base
            .db()
            .query("SELECT * FROM sweet ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(sweets)
    }

    /// Find sweet by id (bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SweetRecord>> {
        let thing = thing(TABLE, id)?;
        let sweet: Option<SweetRecord> = self.base.db().select(thing).await?;
        Ok(sweet)
    }

    /// Find sweet by exact name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<SweetRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sweet WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let sweets: Vec<SweetRecord> = result.take(0)?;
        Ok(sweets.into_iter().next())
    }

    /// Create a new sweet
    pub async fn create(&self, data: SweetCreate) -> RepoResult<SweetRecord> {
        let data = data.normalized();
        let price = data
            .price
            .ok_or_else(|| RepoError::Validation("Price is required".to_string()))?;
        let quantity = data
            .quantity
            .ok_or_else(|| RepoError::Validation("Quantity is required".to_string()))?;

        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Sweet '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE $thing SET
                    name = $name,
                    category = $category,
                    price = $price,
                    quantity = $quantity,
                    description = $description,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", new_record_id(TABLE)))
            .bind(("name", data.name))
            .bind(("category", data.category))
            .bind(("price", price))
            .bind(("quantity", quantity))
            .bind(("description", data.description))
            .bind(("now", now))
            .await?;

        let created: Option<SweetRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sweet".to_string()))
    }

    /// Partial update, `updated_at` is always refreshed
    ///
    /// A blank description clears the field.
    pub async fn update(&self, id: &str, data: SweetUpdate) -> RepoResult<SweetRecord> {
        let thing = thing(TABLE, id)?;
        let data = data.normalized();
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Sweet {} not found", id)))?;

        if data.is_empty() {
            return Ok(existing);
        }

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Sweet '{}' already exists",
                new_name
            )));
        }

        let clear_description = data.description.as_deref() == Some("");
        let description = data.description.filter(|d| !d.is_empty());

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    category = $category OR category,
                    price = IF $has_price THEN $price ELSE price END,
                    quantity = IF $has_quantity THEN $quantity ELSE quantity END,
                    description = IF $clear_description THEN NONE
                        ELSE IF $has_description THEN $description
                        ELSE description END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("category", data.category))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("has_quantity", data.quantity.is_some()))
            .bind(("quantity", data.quantity))
            .bind(("clear_description", clear_description))
            .bind(("has_description", description.is_some()))
            .bind(("description", description))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<SweetRecord>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Sweet {} not found", id)))
    }

    /// Hard delete a sweet
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = thing(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Sweet {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?
            .check()?;
        Ok(true)
    }

    /// Filtered search, newest first, one page
    ///
    /// Text filters are case-insensitive substring matches. Pagination runs
    /// after the query: `WHERE` + `ORDER BY` + `LIMIT` together can drop rows
    /// on the embedded engine.
    pub async fn search(&self, params: &SweetSearch) -> RepoResult<Vec<SweetRecord>> {
        let name = params.name_filter();
        let category = params.category_filter();

        let mut conditions = Vec::new();
        if name.is_some() {
            conditions.push("string::contains(string::lowercase(name), $name)");
        }
        if category.is_some() {
            conditions.push("string::contains(string::lowercase(category), $category)");
        }
        if params.min_price.is_some() {
            conditions.push("price >= $min_price");
        }
        if params.max_price.is_some() {
            conditions.push("price <= $max_price");
        }

        let mut sql = String::from("SELECT * FROM sweet");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(name) = name {
            query = query.bind(("name", name));
        }
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(min_price) = params.min_price {
            query = query.bind(("min_price", min_price));
        }
        if let Some(max_price) = params.max_price {
            query = query.bind(("max_price", max_price));
        }

        let sweets: Vec<SweetRecord> = query.await?.take(0)?;
        Ok(sweets
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .collect())
    }

    /// Atomically take `quantity` units out of stock
    pub async fn purchase(&self, id: &str, quantity: i64) -> RepoResult<SweetRecord> {
        if let Some(updated) = self.adjust_stock(id, PURCHASE_QUERY, quantity).await? {
            return Ok(updated);
        }

        // Nothing updated: either the sweet is gone or stock was too low
        match self.find_by_id(id).await? {
            Some(current) => Err(RepoError::InsufficientStock {
                requested: quantity,
                available: current.quantity,
            }),
            None => Err(RepoError::NotFound(format!("Sweet {} not found", id))),
        }
    }

    /// Atomically add `quantity` units to stock
    pub async fn restock(&self, id: &str, quantity: i64) -> RepoResult<SweetRecord> {
        self.adjust_stock(id, RESTOCK_QUERY, quantity)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Sweet {} not found", id)))
    }

    async fn adjust_stock(
        &self,
        id: &str,
        query: &'static str,
        quantity: i64,
    ) -> RepoResult<Option<SweetRecord>> {
        let thing = thing(TABLE, id)?;
        let db = self.base.db();
        let rows: Vec<SweetRecord> = retry_conflicts(id, move || {
            let thing = thing.clone();
            async move {
                db.query(query)
                    .bind(("thing", thing))
                    .bind(("qty", quantity))
                    .bind(("now", now_millis()))
                    .await?
                    .take(0)
            }
        })
        .await?;
        Ok(rows.into_iter().next())
    }
}

/// Run `op` again while it fails with a retryable conflict, up to
/// [`MAX_STOCK_ATTEMPTS`] attempts in total
async fn retry_conflicts<T, E, F, Fut>(id: &str, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if attempt < MAX_STOCK_ATTEMPTS && is_retryable(&e) => {
                tracing::debug!(sweet_id = %id, attempt, "Stock update conflict, retrying");
                attempt += 1;
                tokio::task::yield_now().await;
            }
            outcome => return outcome,
        }
    }
}

/// Transaction conflicts on the embedded engine report themselves as retryable
fn is_retryable(err: &impl std::fmt::Display) -> bool {
    err.to_string().contains("can be retried")
}
