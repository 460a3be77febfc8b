//! # Catalog Repository
//!
//! Database operations for catalog items and their add-on services.
//! Services live in a child table, ordered by `position`, and are always
//! loaded with their item.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use marlin_core::types::{CatalogItem, PricingMethod, Service};

use crate::error::DbResult;
use crate::repository::{money_column, money_text};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a catalog item together with its services, atomically.
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting catalog item");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO catalog_items (id, name, category, pricing_method, price, is_variable)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.pricing_method)
        .bind(money_text(item.price))
        .bind(item.is_variable)
        .execute(&mut *tx)
        .await?;

        for (position, service) in item.services.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO services (id, catalog_item_id, name, price, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&service.id)
            .bind(&item.id)
            .bind(&service.name)
            .bind(money_text(service.price))
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a catalog item by ID, services included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, pricing_method, price, is_variable
            FROM catalog_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let services = self.services_for(id).await?;
                Ok(Some(decode_item(&row, services)?))
            }
            None => Ok(None),
        }
    }

    /// Lists the whole catalog, ordered by category then name.
    pub async fn list(&self) -> DbResult<Vec<CatalogItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, pricing_method, price, is_variable
            FROM catalog_items
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id")?;
            let services = self.services_for(&id).await?;
            items.push(decode_item(row, services)?);
        }
        Ok(items)
    }

    async fn services_for(&self, catalog_item_id: &str) -> DbResult<Vec<Service>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price
            FROM services
            WHERE catalog_item_id = ?1
            ORDER BY position
            "#,
        )
        .bind(catalog_item_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Service {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    price: money_column("services.price", row.try_get("price")?)?,
                })
            })
            .collect()
    }
}

fn decode_item(row: &SqliteRow, services: Vec<Service>) -> DbResult<CatalogItem> {
    let price: String = row.try_get("price")?;
    Ok(CatalogItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        pricing_method: row.try_get::<PricingMethod, _>("pricing_method")?,
        price: money_column("catalog_items.price", &price)?,
        services,
        is_variable: row.try_get("is_variable")?,
    })
}
