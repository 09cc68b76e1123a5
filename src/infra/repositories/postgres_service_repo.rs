use crate::domain::{models::service::{Service, ServiceFilter}, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"INSERT INTO services (id, business_id, name, description, duration_minutes, price, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#
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
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_name(&self, business_id: &str, name: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE business_id = $1 AND name = $2")
            .bind(business_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            r#"SELECT * FROM services
            WHERE ($1::text IS NULL OR business_id = $1)
              AND ($2::boolean IS NULL OR active = $2)
            ORDER BY name ASC"#
        )
            .bind(&filter.business_id)
            .bind(filter.active)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"UPDATE services SET name = $1, description = $2, duration_minutes = $3, price = $4, active = $5, updated_at = $6
            WHERE id = $7
            RETURNING *"#
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
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
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
