use sqlx::PgPool;

/// Postgres-backed image store. Cloning shares the pool.
#[derive(Clone)]
pub struct SqlxImageRepo {
    pub pool: PgPool,
}
