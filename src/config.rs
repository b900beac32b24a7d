use std::env;

/// Connection settings supplied by the environment at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/appointments.db".to_string());
        Self { database_url }
    }
}
