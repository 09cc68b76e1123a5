use crate::domain::{models::business::Business, ports::BusinessRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBusinessRepo {
    pool: PgPool,
}

impl PostgresBusinessRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for PostgresBusinessRepo {
    async fn create(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            "INSERT INTO businesses (id, name, email, phone, address, active, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
            .bind(&business.id)
            .bind(&business.name)
            .bind(&business.email)
            .bind(&business.phone)
            .bind(&business.address)
            .bind(business.active)
            .bind(business.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
