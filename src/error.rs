use chrono::NaiveDateTime;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the operator. Validation is checked before any write;
/// referential integrity is left to the store and arrives as `Database`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("customer first and last name are required")]
    MissingCustomerName,

    #[error("a service type is required")]
    MissingServiceType,

    #[error("staff name and role are required")]
    MissingStaffFields,

    #[error("end time must be after start time")]
    EndNotAfterStart,

    #[error("{0} is not a valid wall-clock time in the target time zone")]
    InvalidLocalTime(NaiveDateTime),

    #[error("this customer already has a booked appointment that day for this organization")]
    DayConflict,

    #[error("appointment {0} not found")]
    AppointmentNotFound(i64),

    #[error("staff member {0} not found")]
    StaffNotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
