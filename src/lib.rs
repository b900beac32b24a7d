//! Appointment scheduling for small organizations (clinics, banks, government
//! offices): a SQLite-backed data model with day listings, booking with
//! customer dedup, rescheduling, cancellation, and staff management.

pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod staff;

pub use error::{Error, Result};
