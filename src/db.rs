use std::{fs, path::Path, str::FromStr};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// Create the parent directory for a file-backed SQLite database so the first
/// connection can create the file itself.
pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"));

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Open a connection pool against `db_url`. Foreign keys are enforced on
/// every connection; the schema relies on CASCADE and RESTRICT rules.
pub async fn connect(db_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Insert the three demo organizations and one staff member for each, with
/// fixed ids 1-3. Skipped entirely once any organization exists.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<()> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    log::info!("Seeding demo organizations and staff");

    let organizations = [
        (1_i64, "City DMV - Downtown", "Main St"),
        (2, "General Hospital", "North Wing"),
        (3, "First National Bank", "Branch A"),
    ];
    for (id, name, location) in organizations {
        sqlx::query("INSERT INTO organizations (id, name, location) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(location)
            .execute(pool)
            .await?;
    }

    let staff = [
        (1_i64, 1_i64, "Alex Rivera", "Examiner"),
        (2, 2, "Dr. Chen", "Nurse"),
        (3, 3, "Jamie Patel", "Teller"),
    ];
    for (id, organization_id, name, role) in staff {
        sqlx::query("INSERT INTO staff (id, organization_id, name, role) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(organization_id)
            .bind(name)
            .bind(role)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// In-memory pool for tests. A SQLite memory database lives and dies with its
/// connection, so the pool is pinned to a single one.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    seed_demo_data(&pool).await.unwrap();
    pool
}
