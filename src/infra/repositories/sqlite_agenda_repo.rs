use crate::domain::{models::agenda::{Agenda, AgendaFilter}, ports::AgendaRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAgendaRepo {
    pool: SqlitePool,
}

impl SqliteAgendaRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaRepository for SqliteAgendaRepo {
    async fn create(&self, agenda: &Agenda) -> Result<Agenda, AppError> {
        sqlx::query_as::<_, Agenda>(
            "INSERT INTO agendas (id, service_id, date_start, date_end, work_start, work_end, interval_minutes, active_weekdays, break_start, break_end, active, auto_generate_slots, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&agenda.id).bind(&agenda.service_id)
            .bind(agenda.date_start).bind(agenda.date_end)
            .bind(agenda.work_start).bind(agenda.work_end)
            .bind(agenda.interval_minutes).bind(&agenda.active_weekdays)
            .bind(agenda.break_start).bind(agenda.break_end)
            .bind(agenda.active).bind(agenda.auto_generate_slots).bind(&agenda.notes)
            .bind(agenda.created_at).bind(agenda.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>("SELECT * FROM agendas WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &AgendaFilter) -> Result<Vec<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>(
            "SELECT * FROM agendas
             WHERE (? IS NULL OR service_id = ?)
               AND (? IS NULL OR active = ?)
               AND (? IS NULL OR date_start >= ?)
               AND (? IS NULL OR date_end <= ?)
             ORDER BY date_start ASC, created_at ASC"
        )
            .bind(&filter.service_id).bind(&filter.service_id)
            .bind(filter.active).bind(filter.active)
            .bind(filter.starts_from).bind(filter.starts_from)
            .bind(filter.ends_by).bind(filter.ends_by)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_by_service(&self, service_id: &str) -> Result<Vec<Agenda>, AppError> {
        sqlx::query_as::<_, Agenda>("SELECT * FROM agendas WHERE service_id = ? AND active = 1 ORDER BY date_start ASC")
            .bind(service_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, agenda: &Agenda) -> Result<Agenda, AppError> {
        sqlx::query_as::<_, Agenda>(
            "UPDATE agendas SET service_id=?, date_start=?, date_end=?, work_start=?, work_end=?, interval_minutes=?, active_weekdays=?,
                    break_start=?, break_end=?, active=?, auto_generate_slots=?, notes=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&agenda.service_id)
            .bind(agenda.date_start).bind(agenda.date_end)
            .bind(agenda.work_start).bind(agenda.work_end)
            .bind(agenda.interval_minutes).bind(&agenda.active_weekdays)
            .bind(agenda.break_start).bind(agenda.break_end)
            .bind(agenda.active).bind(agenda.auto_generate_slots).bind(&agenda.notes)
            .bind(agenda.updated_at)
            .bind(&agenda.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_active(&self, id: &str, active: bool, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE agendas SET active = ?, updated_at = ? WHERE id = ?")
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
