use crate::domain::{models::service::{Service, ServiceFilter}, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, business_id, name, description, duration_minutes, price, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&service.id)
            .bind(&service.business_id)
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.duration_minutes)
            .bind(service.price)
            .bind(service.active)
            .bind(service.created_at)
            .bind(service.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_name(&self, business_id: &str, name: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE business_id = ? AND name = ?")
            .bind(business_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services
             WHERE (? IS NULL OR business_id = ?)
               AND (? IS NULL OR active = ?)
             ORDER BY name ASC"
        )
            .bind(&filter.business_id).bind(&filter.business_id)
            .bind(filter.active).bind(filter.active)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET name = ?, description = ?, duration_minutes = ?, price = ?, active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.duration_minutes)
            .bind(service.price)
            .bind(service.active)
            .bind(service.updated_at)
            .bind(&service.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Ok(())
    }
}
