use async_trait::async_trait;
use chrono::NaiveDate;
use common::{OrderId, ProductId, StoreId, UserId};
use domain::{
    ApprovalStatus, DailyStat, Order, OrderStatus, Product, Store, StoreCounter, StoreStats,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StorageError,
    store::{CatalogStore, OrderStore},
};

/// PostgreSQL-backed store implementation.
///
/// Stores and products keep their full document in a `body` JSONB column,
/// with the mutable counters (store stats, product sales and views) and moderation
/// status lifted into plain columns so increments are single-statement
/// server-side updates.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

/// Column holding a given store counter.
fn counter_column(counter: StoreCounter) -> &'static str {
    match counter {
        StoreCounter::ViewsToday => "views_today",
        StoreCounter::ViewsThisWeek => "views_this_week",
        StoreCounter::ViewsThisMonth => "views_this_month",
        StoreCounter::ViewsTotal => "views_total",
        StoreCounter::OrdersPending => "orders_pending",
        StoreCounter::OrdersCompleted => "orders_completed",
        StoreCounter::OrdersTotal => "orders_total",
        StoreCounter::RevenueToday => "revenue_today",
        StoreCounter::RevenueThisWeek => "revenue_this_week",
        StoreCounter::RevenueThisMonth => "revenue_this_month",
        StoreCounter::RevenueTotal => "revenue_total",
    }
}

fn parse_approval(s: &str) -> ApprovalStatus {
    match s {
        "approved" => ApprovalStatus::Approved,
        "rejected" => ApprovalStatus::Rejected,
        _ => ApprovalStatus::Pending,
    }
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_store(row: PgRow) -> Result<Store> {
        let body: serde_json::Value = row.try_get("body")?;
        let mut store: Store = serde_json::from_value(body)?;

        // Columns are the source of truth for the mutable parts.
        store.status = parse_approval(row.try_get("status")?);
        store.stats = StoreStats {
            views: domain::PeriodCounters {
                today: row.try_get("views_today")?,
                this_week: row.try_get("views_this_week")?,
                this_month: row.try_get("views_this_month")?,
                total: row.try_get("views_total")?,
            },
            orders: domain::OrderCounters {
                pending: row.try_get("orders_pending")?,
                completed: row.try_get("orders_completed")?,
                total: row.try_get("orders_total")?,
            },
            revenue: domain::PeriodCounters {
                today: row.try_get("revenue_today")?,
                this_week: row.try_get("revenue_this_week")?,
                this_month: row.try_get("revenue_this_month")?,
                total: row.try_get("revenue_total")?,
            },
        };
        Ok(store)
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let body: serde_json::Value = row.try_get("body")?;
        let mut product: Product = serde_json::from_value(body)?;
        product.status = parse_approval(row.try_get("status")?);
        product.sales = row.try_get("sales")?;
        product.views = row.try_get("views")?;
        Ok(product)
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let body: serde_json::Value = row.try_get("body")?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    #[tracing::instrument(skip(self, store), fields(store_id = %store.id))]
    async fn insert_store(&self, store: &Store) -> Result<()> {
        let body = serde_json::to_value(store)?;
        sqlx::query(
            r#"
            INSERT INTO stores (
                id, owner_id, status, body,
                views_today, views_this_week, views_this_month, views_total,
                orders_pending, orders_completed, orders_total,
                revenue_today, revenue_this_week, revenue_this_month, revenue_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(store.id.as_uuid())
        .bind(store.owner.as_uuid())
        .bind(store.status.as_str())
        .bind(&body)
        .bind(store.stats.views.today)
        .bind(store.stats.views.this_week)
        .bind(store.stats.views.this_month)
        .bind(store.stats.views.total)
        .bind(store.stats.orders.pending)
        .bind(store.stats.orders.completed)
        .bind(store.stats.orders.total)
        .bind(store.stats.revenue.today)
        .bind(store.stats.revenue.this_week)
        .bind(store.stats.revenue.this_month)
        .bind(store.stats.revenue.total)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn store(&self, id: StoreId) -> Result<Option<Store>> {
        let row = sqlx::query("SELECT * FROM stores WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_store).transpose()
    }

    async fn update_store_status(&self, id: StoreId, status: ApprovalStatus) -> Result<()> {
        let result = sqlx::query("UPDATE stores SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("store", id));
        }
        Ok(())
    }

    async fn replace_store_stats(&self, id: StoreId, stats: StoreStats) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE stores SET
                views_today = $2, views_this_week = $3, views_this_month = $4, views_total = $5,
                orders_pending = $6, orders_completed = $7, orders_total = $8,
                revenue_today = $9, revenue_this_week = $10, revenue_this_month = $11,
                revenue_total = $12
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(stats.views.today)
        .bind(stats.views.this_week)
        .bind(stats.views.this_month)
        .bind(stats.views.total)
        .bind(stats.orders.pending)
        .bind(stats.orders.completed)
        .bind(stats.orders.total)
        .bind(stats.revenue.today)
        .bind(stats.revenue.this_week)
        .bind(stats.revenue.this_month)
        .bind(stats.revenue.total)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("store", id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, deltas), fields(store_id = %id))]
    async fn bump_store_counters(
        &self,
        id: StoreId,
        deltas: &[(StoreCounter, i64)],
    ) -> Result<()> {
        if deltas.is_empty() {
            return Ok(());
        }

        // Single UPDATE so the increments commit atomically server-side.
        let mut sql = String::from("UPDATE stores SET ");
        for (i, (counter, _)) in deltas.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let col = counter_column(*counter);
            sql.push_str(&format!("{col} = {col} + ${}", i + 2));
        }
        sql.push_str(" WHERE id = $1");

        let mut query = sqlx::query(&sql).bind(id.as_uuid());
        for (_, delta) in deltas {
            query = query.bind(*delta);
        }

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("store", id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert_product(&self, product: &Product) -> Result<()> {
        let body = serde_json::to_value(product)?;
        sqlx::query(
            r#"
            INSERT INTO products (id, store_id, status, sales, views, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.store_id.as_uuid())
        .bind(product.status.as_str())
        .bind(product.sales)
        .bind(product.views)
        .bind(&body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn update_product_status(&self, id: ProductId, status: ApprovalStatus) -> Result<()> {
        let result = sqlx::query("UPDATE products SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("product", id));
        }
        Ok(())
    }

    async fn count_store_products(&self, store_id: StoreId) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE store_id = $1")
                .bind(store_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn bump_product_sales(&self, id: ProductId, delta: i64) -> Result<()> {
        let result = sqlx::query("UPDATE products SET sales = sales + $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(delta)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("product", id));
        }
        Ok(())
    }

    async fn bump_product_views(&self, id: ProductId, delta: i64) -> Result<()> {
        let result = sqlx::query("UPDATE products SET views = views + $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(delta)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("product", id));
        }
        Ok(())
    }

    async fn bump_daily_stat(
        &self,
        store_id: StoreId,
        date: NaiveDate,
        views: i64,
        visitors: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_stats (store_id, date, views, visitors)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (store_id, date) DO UPDATE SET
                views = daily_stats.views + EXCLUDED.views,
                visitors = daily_stats.visitors + EXCLUDED.visitors
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(date)
        .bind(views)
        .bind(visitors)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn daily_stats(&self, store_id: StoreId, from: NaiveDate) -> Result<Vec<DailyStat>> {
        let rows = sqlx::query(
            r#"
            SELECT store_id, date, views, visitors
            FROM daily_stats
            WHERE store_id = $1 AND date >= $2
            ORDER BY date ASC
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(DailyStat {
                    store_id: StoreId::from_uuid(row.try_get::<Uuid, _>("store_id")?),
                    date: row.try_get("date")?,
                    views: row.try_get("views")?,
                    visitors: row.try_get("visitors")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert_order(&self, order: &Order) -> Result<()> {
        let body = serde_json::to_value(order)?;
        let store_ids: Vec<Uuid> = order.store_ids().iter().map(|id| id.as_uuid()).collect();

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, order_date, store_ids, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.status.as_str())
        .bind(order.order_date)
        .bind(&store_ids)
        .bind(&body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT body FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn replace_order(&self, order: &Order) -> Result<()> {
        let body = serde_json::to_value(order)?;
        let result = sqlx::query("UPDATE orders SET status = $2, body = $3 WHERE id = $1")
            .bind(order.id.as_uuid())
            .bind(order.status.as_str())
            .bind(&body)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("order", order.id));
        }
        Ok(())
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT body FROM orders WHERE user_id = $1 ORDER BY order_date DESC",
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn orders_for_store(
        &self,
        store: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    r#"
                    SELECT body FROM orders
                    WHERE $1 = ANY(store_ids) AND status = $2
                    ORDER BY order_date DESC
                    "#,
                )
                .bind(store.as_uuid())
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT body FROM orders
                    WHERE $1 = ANY(store_ids)
                    ORDER BY order_date DESC
                    "#,
                )
                .bind(store.as_uuid())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
