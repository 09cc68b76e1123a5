use crate::domain::{models::business::Business, ports::BusinessRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBusinessRepo {
    pool: SqlitePool,
}

impl SqliteBusinessRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for SqliteBusinessRepo {
    async fn create(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            "INSERT INTO businesses (id, name, email, phone, address, active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
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
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
