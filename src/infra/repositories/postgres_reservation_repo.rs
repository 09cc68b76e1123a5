use crate::domain::{
    models::reservation::{Reservation, ReservationFilter, ReservationState},
    ports::ReservationRepository,
    services::availability::is_free,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Row-locks the agenda so concurrent bookings on it serialize, then
    /// rechecks the slot against committed siblings.
    async fn lock_and_check(conn: &mut PgConnection, reservation: &Reservation) -> Result<bool, AppError> {
        sqlx::query("SELECT id FROM agendas WHERE id = $1 FOR UPDATE")
            .bind(&reservation.agenda_id)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        let siblings = sqlx::query_as::<_, Reservation>(
            r#"SELECT * FROM reservations
            WHERE agenda_id = $1 AND date_reserved = $2 AND state <> 'cancelled' AND id <> $3"#
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
impl ReservationRepository for PostgresReservationRepo {
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if !Self::lock_and_check(&mut tx, reservation).await? {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(None);
        }

        let created = sqlx::query_as::<_, Reservation>(
            r#"INSERT INTO reservations (
                id, user_id, service_id, agenda_id, date_reserved, time_start, time_end,
                state, notes, total_price, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *"#
        )
            .bind(&reservation.id)
            .bind(&reservation.user_id)
            .bind(&reservation.service_id)
            .bind(&reservation.agenda_id)
            .bind(reservation.date_reserved)
            .bind(reservation.time_start)
            .bind(reservation.time_end)
            .bind(reservation.state)
            .bind(&reservation.notes)
            .bind(reservation.total_price)
            .bind(reservation.created_at)
            .bind(reservation.updated_at)
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
            r#"UPDATE reservations SET
                service_id = $1, agenda_id = $2, date_reserved = $3, time_start = $4, time_end = $5,
                state = $6, notes = $7, total_price = $8, updated_at = $9
            WHERE id = $10
            RETURNING *"#
        )
            .bind(&reservation.service_id)
            .bind(&reservation.agenda_id)
            .bind(reservation.date_reserved)
            .bind(reservation.time_start)
            .bind(reservation.time_end)
            .bind(reservation.state)
            .bind(&reservation.notes)
            .bind(reservation.total_price)
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
            "UPDATE reservations SET state = $1, notes = $2, total_price = $3, updated_at = $4 WHERE id = $5 RETURNING *"
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
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            r#"SELECT * FROM reservations
            WHERE ($1::text IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR service_id = $2)
              AND ($3::text IS NULL OR agenda_id = $3)
              AND ($4::reservation_state IS NULL OR state = $4)
              AND ($5::date IS NULL OR date_reserved >= $5)
              AND ($6::date IS NULL OR date_reserved <= $6)
            ORDER BY date_reserved DESC, time_start DESC"#
        )
            .bind(&filter.user_id)
            .bind(&filter.service_id)
            .bind(&filter.agenda_id)
            .bind(filter.state)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_for_day(&self, agenda_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE agenda_id = $1 AND date_reserved = $2 AND state <> 'cancelled' ORDER BY time_start ASC"
        )
            .bind(agenda_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_state_for_user(&self, user_id: &str) -> Result<Vec<(ReservationState, i64)>, AppError> {
        sqlx::query_as::<_, (ReservationState, i64)>(
            "SELECT state, COUNT(*) FROM reservations WHERE user_id = $1 GROUP BY state"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
