use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Default)]
pub struct CreateBusinessRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CreateServiceRequest {
    pub business_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Deserialize, Default)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Deserialize, Default)]
pub struct ServiceQuery {
    pub negocio_id: Option<String>,
    pub activo: Option<bool>,
}

/// Body of agenda create and update. On update, absent fields keep their
/// stored value and an explicit `null` clears the break.
#[derive(Deserialize, Default)]
pub struct AgendaRequest {
    pub service_id: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub work_start: Option<String>,
    pub work_end: Option<String>,
    pub interval_minutes: Option<i32>,
    pub active_weekdays: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub break_start: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub break_end: Option<Option<String>>,
    pub active: Option<bool>,
    pub auto_generate_slots: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

#[derive(Deserialize, Default)]
pub struct AgendaQuery {
    pub servicio_id: Option<String>,
    pub activo: Option<bool>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    /// Day to annotate with slots; defaults to today.
    pub fecha: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SlotDateQuery {
    pub fecha: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CheckAgendaRequest {
    pub service_id: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub exclude_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CreateReservationRequest {
    pub user_id: Option<String>,
    pub service_id: Option<String>,
    pub agenda_id: Option<String>,
    pub date_reserved: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub state: Option<String>,
    pub notes: Option<String>,
    pub total_price: Option<f64>,
}

#[derive(Deserialize, Default)]
pub struct UpdateReservationRequest {
    pub service_id: Option<String>,
    pub agenda_id: Option<String>,
    pub date_reserved: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub total_price: Option<f64>,
}

#[derive(Deserialize, Default)]
pub struct ReservationQuery {
    pub usuario_id: Option<String>,
    pub servicio_id: Option<String>,
    pub agenda_id: Option<String>,
    pub estado: Option<String>,
    pub fecha_desde: Option<String>,
    pub fecha_hasta: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CheckSlotRequest {
    pub agenda_id: Option<String>,
    pub date_reserved: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub exclude_id: Option<String>,
}
