use crate::domain::{models::agenda::{Agenda, AgendaFilter}, ports::AgendaRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAgendaRepo {
    pool: PgPool,
}

impl PostgresAgendaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaRepository for PostgresAgendaRepo {
    async fn create(&self, agenda: &Agenda) -> Result<Agenda, AppError> {
        sqlx::query_as::<_, Agenda>(
            r#"INSERT INTO agendas (
                id, service_id, date_start, date_end, work_start, work_end, interval_minutes, active_weekdays,
                break_start, break_end, active, auto_generate_slots, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *"#
        )
            .bind(&agenda.id)
            .bind(&agenda.service_id)
            .bind(agenda.date_start)
            .bind(agenda.date_end)
            .bind(agenda.work_start)
            .bind(agenda.work_end)
            .bind(agenda.interval_minutes)
            .bind(&agenda.active_weekdays)
            .bind(agenda.break_start)
            .bind(agenda.break_end)
            .bind(agenda.active)
            .bind(agenda.auto_generate_slots)
            .bind(&agenda.notes)
            .bind(agenda.created_at)
            .bind(agenda.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>("SELECT * FROM agendas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &AgendaFilter) -> Result<Vec<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>(
            r#"SELECT * FROM agendas
            WHERE ($1::text IS NULL OR service_id = $1)
              AND ($2::boolean IS NULL OR active = $2)
              AND ($3::date IS NULL OR date_start >= $3)
              AND ($4::date IS NULL OR date_end <= $4)
            ORDER BY date_start ASC, created_at ASC"#
        )
            .bind(&filter.service_id)
            .bind(filter.active)
            .bind(filter.starts_from)
            .bind(filter.ends_by)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_by_service(&self, service_id: &str) -> Result<Vec<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>("SELECT * FROM agendas WHERE service_id = $1 AND active = TRUE ORDER BY date_start ASC")
            .bind(service_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, agenda: &Agenda) -> Result<Agenda, AppError> {
        sqlx::query_as::<_, Agenda>(
            r#"UPDATE agendas SET
                service_id = $1, date_start = $2, date_end = $3, work_start = $4, work_end = $5,
                interval_minutes = $6, active_weekdays = $7, break_start = $8, break_end = $9,
                active = $10, auto_generate_slots = $11, notes = $12, updated_at = $13
            WHERE id = $14
            RETURNING *"#
        )
            .bind(&agenda.service_id)
            .bind(agenda.date_start)
            .bind(agenda.date_end)
            .bind(agenda.work_start)
            .bind(agenda.work_end)
            .bind(agenda.interval_minutes)
            .bind(&agenda.active_weekdays)
            .bind(agenda.break_start)
            .bind(agenda.break_end)
            .bind(agenda.active)
            .bind(agenda.auto_generate_slots)
            .bind(&agenda.notes)
            .bind(agenda.updated_at)
            .bind(&agenda.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_active(&self, id: &str, active: bool, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE agendas SET active = $1, updated_at = $2 WHERE id = $3")
            .bind(active)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Agenda not found".into()));
        }
        Ok(())
    }
}
