use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

// Any business using the system: a bank branch, a clinic, a DMV office.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

// The person booking: patient, client, citizen. Deduplicated on
// (first_name, last_name, phone); created lazily on first booking.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
}

// The person fulfilling appointments: teller, nurse, examiner.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Staff {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub role: String,
}

/// Stored as TEXT with these exact literals; no other value is constructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub organization_id: i64,
    pub customer_id: i64,
    pub staff_id: i64,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// An appointment with its organization, staff, and customer display names
/// resolved at the query boundary. Times stay in UTC; convert for display
/// with [`AppointmentDetail::start_in`] and [`AppointmentDetail::end_in`].
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AppointmentDetail {
    pub id: i64,
    pub organization: String,
    pub staff: String,
    pub customer: String,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl AppointmentDetail {
    pub fn start_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.start_time.with_timezone(tz)
    }

    pub fn end_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.end_time.with_timezone(tz)
    }
}

/// Input for [`crate::booking::create_appointment`]. Times are absolute UTC
/// instants; resolve operator-local wall-clock input through
/// [`crate::booking::local_to_utc`] first.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub organization_id: i64,
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}
