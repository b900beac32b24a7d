use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{Error, Result},
    models::{AppointmentDetail, AppointmentStatus, BookingRequest, Customer},
};

/// Resolve an operator-local wall-clock time to the UTC instant stored in the
/// database. Ambiguous times (clocks rolled back) take the earlier mapping;
/// times skipped by a forward transition are rejected.
pub fn local_to_utc<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(Error::InvalidLocalTime(local)),
    }
}

// Half-open UTC window covering one local calendar day.
fn local_day_window<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_local = day.and_time(NaiveTime::MIN);
    let end_local = start_local + Duration::days(1);
    Ok((local_to_utc(start_local, tz)?, local_to_utc(end_local, tz)?))
}

// Half-open window covering the UTC calendar day of `start`. The one-booking
// per-day rule is keyed on the UTC day, not the operator's local day.
fn utc_day_window(start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = start.date_naive().and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}

/// Every appointment whose UTC start instant falls inside the given local
/// calendar day, earliest first. Cancelled rows are not filtered out.
pub async fn list_day<Tz: TimeZone>(
    pool: &SqlitePool,
    day: NaiveDate,
    tz: &Tz,
) -> Result<Vec<AppointmentDetail>> {
    let (window_start, window_end) = local_day_window(day, tz)?;

    let rows = sqlx::query_as::<_, AppointmentDetail>(
        r#"SELECT a.id, o.name AS organization, s.name AS staff,
                  c.first_name || ' ' || c.last_name AS customer,
                  a.service_type, a.start_time, a.end_time, a.status, a.notes
           FROM appointments a
           JOIN organizations o ON a.organization_id = o.id
           JOIN customers c ON a.customer_id = c.id
           JOIN staff s ON a.staff_id = s.id
           WHERE a.start_time >= ? AND a.start_time < ?
           ORDER BY a.start_time ASC"#,
    )
    .bind(window_start)
    .bind(window_end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn fetch_appointment(pool: &SqlitePool, id: i64) -> Result<AppointmentDetail> {
    let row = sqlx::query_as::<_, AppointmentDetail>(
        r#"SELECT a.id, o.name AS organization, s.name AS staff,
                  c.first_name || ' ' || c.last_name AS customer,
                  a.service_type, a.start_time, a.end_time, a.status, a.notes
           FROM appointments a
           JOIN organizations o ON a.organization_id = o.id
           JOIN customers c ON a.customer_id = c.id
           JOIN staff s ON a.staff_id = s.id
           WHERE a.id = ?"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.ok_or(Error::AppointmentNotFound(id))
}

/// Book an appointment. Validates the request, reuses or creates the customer
/// by exact (first name, last name, phone) match, rejects a second booked
/// appointment for the same organization, customer, and UTC day, then inserts
/// with status `Booked`. Returns the new appointment id.
///
/// The steps run as independent statements with no shared transaction, so the
/// day-conflict check stays a best-effort existence query.
pub async fn create_appointment(pool: &SqlitePool, req: BookingRequest) -> Result<i64> {
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    let service_type = req.service_type.trim();

    if first_name.is_empty() || last_name.is_empty() {
        return Err(Error::MissingCustomerName);
    }
    if service_type.is_empty() {
        return Err(Error::MissingServiceType);
    }
    if req.end_time <= req.start_time {
        return Err(Error::EndNotAfterStart);
    }

    let customer_id = find_or_create_customer(
        pool,
        first_name,
        last_name,
        req.phone.trim(),
        req.email.as_deref(),
    )
    .await?;

    let (day_start, day_end) = utc_day_window(req.start_time);
    let conflict = sqlx::query_scalar::<_, i64>(
        r#"SELECT EXISTS (
               SELECT 1 FROM appointments
               WHERE organization_id = ? AND customer_id = ?
                 AND start_time >= ? AND start_time < ?
                 AND status = ?
           )"#,
    )
    .bind(req.organization_id)
    .bind(customer_id)
    .bind(day_start)
    .bind(day_end)
    .bind(AppointmentStatus::Booked)
    .fetch_one(pool)
    .await?;

    if conflict != 0 {
        return Err(Error::DayConflict);
    }

    let notes = req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let result = sqlx::query(
        r#"INSERT INTO appointments
           (organization_id, customer_id, staff_id, service_type, start_time, end_time, status, notes)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(req.organization_id)
    .bind(customer_id)
    .bind(req.staff_id)
    .bind(service_type)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(AppointmentStatus::Booked)
    .bind(notes)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn find_or_create_customer(
    pool: &SqlitePool,
    first_name: &str,
    last_name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<i64> {
    let existing = sqlx::query_as::<_, Customer>(
        r#"SELECT id, first_name, last_name, phone, email
           FROM customers
           WHERE first_name = ? AND last_name = ? AND phone = ?
           LIMIT 1"#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    if let Some(customer) = existing {
        return Ok(customer.id);
    }

    let email = email.map(str::trim).filter(|e| !e.is_empty());
    let result = sqlx::query(
        "INSERT INTO customers (first_name, last_name, phone, email) VALUES (?, ?, ?, ?)",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite an appointment's start and end. Status and the organization,
/// staff, and customer references stay untouched; the day-conflict check is
/// not re-run on reschedule.
pub async fn reschedule_appointment(
    pool: &SqlitePool,
    id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<()> {
    if end_time <= start_time {
        return Err(Error::EndNotAfterStart);
    }

    let result = sqlx::query("UPDATE appointments SET start_time = ?, end_time = ? WHERE id = ?")
        .bind(start_time)
        .bind(end_time)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::AppointmentNotFound(id));
    }
    Ok(())
}

/// Mark an appointment cancelled. Idempotent; cancelled rows keep showing up
/// in day listings and there is no hard delete path.
pub async fn cancel_appointment(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
        .bind(AppointmentStatus::Cancelled)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::AppointmentNotFound(id));
    }
    Ok(())
}
