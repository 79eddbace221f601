use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    db::store::CatalogStore,
    error::AppResult,
    models::{BuyerOverlap, Product, ProductId, ProductOrder, ProductQuery, Purchase, UserId},
};

/// Columns selected for every [`Product`]; numerics are cast to float8
const PRODUCT_COLUMNS: &str = "id, name, slug, category_id, price::float8 AS price, stock, \
     is_active, avg_rating::float8 AS avg_rating, reviews_count, views_count";

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled development schema
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn order_by_clause(order: ProductOrder) -> &'static str {
    match order {
        ProductOrder::Popularity => "views_count DESC, avg_rating DESC, reviews_count DESC, id",
        ProductOrder::Rating => "avg_rating DESC, reviews_count DESC, id",
    }
}

/// [`CatalogStore`] over the storefront's Postgres tables
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the SELECT for a [`ProductQuery`]
    fn build_product_query(query: &ProductQuery) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM products_product WHERE is_active = TRUE",
            PRODUCT_COLUMNS
        ));

        if query.in_stock_only {
            qb.push(" AND stock > 0");
        }
        if let Some(categories) = &query.categories {
            qb.push(" AND category_id = ANY(")
                .push_bind(categories.clone())
                .push(")");
        }
        if !query.exclude.is_empty() {
            qb.push(" AND NOT (id = ANY(")
                .push_bind(query.exclude.clone())
                .push("))");
        }

        qb.push(" ORDER BY ").push(order_by_clause(query.order));
        qb.push(" LIMIT ").push_bind(query.limit as i64);
        qb
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn product(&self, id: ProductId) -> AppResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products_product WHERE id = $1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM products_product WHERE id = ANY($1)",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn find_products(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let mut qb = Self::build_product_query(query);
        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    async fn purchased_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>> {
        let ids = sqlx::query_scalar::<_, ProductId>(
            r#"
            SELECT DISTINCT oi.product_id
            FROM orders_orderitem oi
            JOIN orders_order o ON o.id = oi.order_id
            WHERE o.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn viewed_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>> {
        let ids = sqlx::query_scalar::<_, ProductId>(
            r#"
            SELECT DISTINCT product_id
            FROM products_productview
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn overlapping_buyers(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
        limit: usize,
    ) -> AppResult<Vec<BuyerOverlap>> {
        if product_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, BuyerOverlap>(
            r#"
            SELECT o.user_id, COUNT(DISTINCT oi.product_id) AS overlap
            FROM orders_order o
            JOIN orders_orderitem oi ON oi.order_id = o.id
            WHERE oi.product_id = ANY($1) AND o.user_id <> $2
            GROUP BY o.user_id
            ORDER BY overlap DESC
            LIMIT $3
            "#,
        )
        .bind(product_ids)
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn purchases_by_users(&self, user_ids: &[UserId]) -> AppResult<Vec<Purchase>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT DISTINCT o.user_id, oi.product_id
            FROM orders_order o
            JOIN orders_orderitem oi ON oi.order_id = o.id
            WHERE o.user_id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
