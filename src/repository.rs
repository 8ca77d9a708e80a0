use crate::models::{
    AdminDashboardStats, Coupon, CreateCouponRequest, CreateOrderRequest, Order, Tag,
    VendorDashboardStats,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// handlers to interact with the data layer without knowing the specific
/// implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
///
/// Error policy: driver failures are logged inside the implementation and
/// degrade to empty/None/false results. Handlers translate those into the
/// uniform 404/409/500 responses; no sqlx error type crosses this boundary.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Coupons ---
    // Inserts a coupon. None when the code is already taken (or on failure).
    async fn create_coupon(&self, req: CreateCouponRequest) -> Option<Coupon>;
    async fn list_coupons(&self) -> Vec<Coupon>;
    // Lookup used by the apply flow. Matching is exact and case-sensitive.
    async fn get_coupon_by_code(&self, code: &str) -> Option<Coupon>;
    async fn delete_coupon(&self, id: Uuid) -> bool;
    // Usage tracking. Non-critical: callers log a false return and move on.
    async fn record_coupon_usage(&self, coupon_id: Uuid, order_id: Option<Uuid>) -> bool;

    // --- Orders ---
    async fn create_order(&self, req: CreateOrderRequest) -> Option<Order>;
    async fn get_order(&self, id: Uuid) -> Option<Order>;
    // Admin listing with optional status/vendor filters.
    async fn list_orders(&self, status: Option<String>, vendor: Option<Uuid>) -> Vec<Order>;
    // Vendor listing, scoped to the vendor's own orders.
    async fn list_vendor_orders(&self, vendor_id: Uuid) -> Vec<Order>;
    // Vendor-scoped status update: affects a row only when the vendor owns the order.
    async fn set_order_status(&self, id: Uuid, vendor_id: Uuid, status: &str) -> Option<Order>;
    /// Admin override: update ANY order's status (no ownership check).
    async fn set_order_status_admin(&self, id: Uuid, status: &str) -> Option<Order>;

    // --- Tags ---
    // Inserts a tag. None when the name already exists (or on failure).
    async fn create_tag(&self, name: &str) -> Option<Tag>;
    async fn list_tags(&self) -> Vec<Tag>;
    async fn delete_tag(&self, id: Uuid) -> bool;

    // --- Dashboards ---
    async fn admin_stats(&self) -> AdminDashboardStats;
    async fn vendor_stats(&self, vendor_id: Uuid) -> VendorDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// create_coupon
    ///
    /// Inserts a new coupon. `ON CONFLICT DO NOTHING` plus `RETURNING` yields no
    /// row when the code is taken, which surfaces as None to the handler (409).
    async fn create_coupon(&self, req: CreateCouponRequest) -> Option<Coupon> {
        sqlx::query_as::<_, Coupon>(
            r#"
            INSERT INTO coupons (id, code, discount_percent, is_active, expires_at, created_at)
            VALUES ($1, $2, $3, true, $4, NOW())
            ON CONFLICT (code) DO NOTHING
            RETURNING id, code, discount_percent, is_active, expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.code)
        .bind(req.discount_percent)
        .bind(req.expires_at)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_coupon error: {:?}", e);
            None
        })
    }

    async fn list_coupons(&self) -> Vec<Coupon> {
        sqlx::query_as::<_, Coupon>(
            "SELECT id, code, discount_percent, is_active, expires_at, created_at
             FROM coupons ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_coupons error: {:?}", e);
            vec![]
        })
    }

    async fn get_coupon_by_code(&self, code: &str) -> Option<Coupon> {
        sqlx::query_as::<_, Coupon>(
            "SELECT id, code, discount_percent, is_active, expires_at, created_at
             FROM coupons WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_coupon_by_code error: {:?}", e);
            None
        })
    }

    async fn delete_coupon(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_coupon error: {:?}", e);
                false
            }
        }
    }

    /// record_coupon_usage
    ///
    /// Usage tracking insert. Callers treat a false return as a logged
    /// non-event; the apply response is never blocked on this write.
    async fn record_coupon_usage(&self, coupon_id: Uuid, order_id: Option<Uuid>) -> bool {
        match sqlx::query(
            "INSERT INTO coupon_usages (coupon_id, order_id, used_at) VALUES ($1, $2, NOW())",
        )
        .bind(coupon_id)
        .bind(order_id)
        .execute(&self.pool)
        .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("record_coupon_usage error: {:?}", e);
                false
            }
        }
    }

    /// create_order
    ///
    /// Inserts a new rental order. All new orders start in the `pending` state.
    async fn create_order(&self, req: CreateOrderRequest) -> Option<Order> {
        match sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (id, vendor_id, customer_name, customer_email, product_name, quantity,
                 rental_start, rental_end, total_cents, coupon_code, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', NOW(), NOW())
            RETURNING id, vendor_id, customer_name, customer_email, product_name, quantity,
                      rental_start, rental_end, total_cents, coupon_code, status,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.vendor_id)
        .bind(&req.customer_name)
        .bind(&req.customer_email)
        .bind(&req.product_name)
        .bind(req.quantity)
        .bind(req.rental_start)
        .bind(req.rental_end)
        .bind(req.total_cents)
        .bind(&req.coupon_code)
        .fetch_one(&self.pool)
        .await
        {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::error!("create_order error: {:?}", e);
                None
            }
        }
    }

    async fn get_order(&self, id: Uuid) -> Option<Order> {
        sqlx::query_as::<_, Order>(
            "SELECT id, vendor_id, customer_name, customer_email, product_name, quantity,
                    rental_start, rental_end, total_cents, coupon_code, status,
                    created_at, updated_at
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_order error: {:?}", e);
            None
        })
    }

    /// list_orders
    ///
    /// Administrative listing with optional filters, assembled through
    /// QueryBuilder so every user-supplied value is bound, never interpolated.
    async fn list_orders(&self, status: Option<String>, vendor: Option<Uuid>) -> Vec<Order> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"
            SELECT id, vendor_id, customer_name, customer_email, product_name, quantity,
                   rental_start, rental_end, total_cents, coupon_code, status,
                   created_at, updated_at
            FROM orders
            WHERE 1 = 1
            "#,
        );

        if let Some(s) = status {
            builder.push(" AND status = ");
            builder.push_bind(s);
        }

        if let Some(v) = vendor {
            builder.push(" AND vendor_id = ");
            builder.push_bind(v);
        }

        builder.push(" ORDER BY created_at DESC");

        let query = builder.build_query_as::<Order>();

        match query.fetch_all(&self.pool).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!("list_orders error: {:?}", e);
                vec![]
            }
        }
    }

    async fn list_vendor_orders(&self, vendor_id: Uuid) -> Vec<Order> {
        sqlx::query_as::<_, Order>(
            "SELECT id, vendor_id, customer_name, customer_email, product_name, quantity,
                    rental_start, rental_end, total_cents, coupon_code, status,
                    created_at, updated_at
             FROM orders WHERE vendor_id = $1 ORDER BY created_at DESC",
        )
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_vendor_orders error: {:?}", e);
            vec![]
        })
    }

    /// set_order_status
    ///
    /// Updates an order's status only when the given vendor owns it. A None
    /// return covers both "no such order" and "not this vendor's order".
    async fn set_order_status(&self, id: Uuid, vendor_id: Uuid, status: &str) -> Option<Order> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET status = $1, updated_at = NOW()
            WHERE id = $2 AND vendor_id = $3
            RETURNING id, vendor_id, customer_name, customer_email, product_name, quantity,
                      rental_start, rental_end, total_cents, coupon_code, status,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(id)
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_order_status error: {:?}", e);
            None
        })
    }

    /// set_order_status_admin
    ///
    /// **Admin Override**: updates any order's status without an ownership check.
    async fn set_order_status_admin(&self, id: Uuid, status: &str) -> Option<Order> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, vendor_id, customer_name, customer_email, product_name, quantity,
                      rental_start, rental_end, total_cents, coupon_code, status,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_order_status_admin error: {:?}", e);
            None
        })
    }

    /// create_tag
    ///
    /// Inserts a tag, relying on the unique name constraint for idempotency.
    async fn create_tag(&self, name: &str) -> Option<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_tag error: {:?}", e);
            None
        })
    }

    async fn list_tags(&self) -> Vec<Tag> {
        sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_tags error: {:?}", e);
                vec![]
            })
    }

    async fn delete_tag(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_tag error: {:?}", e);
                false
            }
        }
    }

    /// admin_stats
    ///
    /// Compiles all counters for the administrative dashboard in a single call.
    async fn admin_stats(&self) -> AdminDashboardStats {
        let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let pending_orders =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .unwrap_or(0);
        let total_coupons = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);
        let total_tags = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await
            .unwrap_or(0);

        AdminDashboardStats { total_orders, pending_orders, total_coupons, total_tags }
    }

    /// vendor_stats
    ///
    /// Counters scoped to one vendor's orders, for the vendor dashboard.
    async fn vendor_stats(&self, vendor_id: Uuid) -> VendorDashboardStats {
        let total_orders =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE vendor_id = $1")
                .bind(vendor_id)
                .fetch_one(&self.pool)
                .await
                .unwrap_or(0);
        let pending_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE vendor_id = $1 AND status = 'pending'",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or(0);
        let returned_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE vendor_id = $1 AND status = 'returned'",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or(0);

        VendorDashboardStats { vendor_id, total_orders, pending_orders, returned_orders }
    }
}
