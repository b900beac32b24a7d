use chrono::Local;

use smart_appointments::{booking, config::AppConfig, db};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    db::ensure_sqlite_dir(&config.database_url)?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    db::seed_demo_data(&pool).await?;

    let today = Local::now().date_naive();
    let schedule = booking::list_day(&pool, today, &Local).await?;

    log::info!("{} appointment(s) on {today}", schedule.len());
    for entry in &schedule {
        log::info!(
            "#{} {} | {} / {} / {} | {} - {} | {}",
            entry.id,
            entry.service_type,
            entry.organization,
            entry.staff,
            entry.customer,
            entry.start_in(&Local).format("%H:%M"),
            entry.end_in(&Local).format("%H:%M"),
            entry.status,
        );
    }

    Ok(())
}
