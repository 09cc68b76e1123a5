use crate::domain::{
    models::reservation::{Reservation, ReservationFilter, ReservationState},
    ports::ReservationRepository,
    services::availability::is_free,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Takes the database write lock through a no-op write on the agenda row,
    /// then rechecks the slot against siblings committed before us.
    async fn lock_and_check(conn: &mut SqliteConnection, reservation: &Reservation) -> Result<bool, AppError> {
        sqlx::query("UPDATE agendas SET updated_at = updated_at WHERE id = ?")
            .bind(&reservation.agenda_id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        let siblings = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE agenda_id = ? AND date_reserved = ? AND state != 'cancelled' AND id != ?"
        )
            .bind(&reservation.agenda_id)
            .bind(reservation.date_reserved)
            .bind(&reservation.id)
            .fetch_all(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(is_free(reservation.window(), &siblings))
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if !Self::lock_and_check(&mut tx, reservation).await? {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(None);
        }

        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, user_id, service_id, agenda_id, date_reserved, time_start, time_end, state, notes, total_price, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.user_id).bind(&reservation.service_id).bind(&reservation.agenda_id)
            .bind(reservation.date_reserved).bind(reservation.time_start).bind(reservation.time_end)
            .bind(reservation.state).bind(&reservation.notes).bind(reservation.total_price)
            .bind(reservation.created_at).bind(reservation.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(created))
    }

    async fn reschedule_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if !Self::lock_and_check(&mut tx, reservation).await? {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(None);
        }

        let moved = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET service_id=?, agenda_id=?, date_reserved=?, time_start=?, time_end=?, state=?, notes=?, total_price=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&reservation.service_id).bind(&reservation.agenda_id)
            .bind(reservation.date_reserved).bind(reservation.time_start).bind(reservation.time_end)
            .bind(reservation.state).bind(&reservation.notes).bind(reservation.total_price)
            .bind(reservation.updated_at)
            .bind(&reservation.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(moved))
    }

    async fn update(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET state=?, notes=?, total_price=?, updated_at=? WHERE id=? RETURNING *"
        )
            .bind(reservation.state)
            .bind(&reservation.notes)
            .bind(reservation.total_price)
            .bind(reservation.updated_at)
            .bind(&reservation.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations
             WHERE (? IS NULL OR user_id = ?)
               AND (? IS NULL OR service_id = ?)
               AND (? IS NULL OR agenda_id = ?)
               AND (? IS NULL OR state = ?)
               AND (? IS NULL OR date_reserved >= ?)
               AND (? IS NULL OR date_reserved <= ?)
             ORDER BY date_reserved DESC, time_start DESC"
        )
            .bind(&filter.user_id).bind(&filter.user_id)
            .bind(&filter.service_id).bind(&filter.service_id)
            .bind(&filter.agenda_id).bind(&filter.agenda_id)
            .bind(filter.state).bind(filter.state)
            .bind(filter.date_from).bind(filter.date_from)
            .bind(filter.date_to).bind(filter.date_to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_for_day(&self, agenda_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE agenda_id = ? AND date_reserved = ? AND state != 'cancelled' ORDER BY time_start ASC"
        )
            .bind(agenda_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_state_for_user(&self, user_id: &str) -> Result<Vec<(ReservationState, i64)>, AppError> {
        sqlx::query_as::<_, (ReservationState, i64)>(
            "SELECT state, COUNT(*) FROM reservations WHERE user_id = ? GROUP BY state"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
