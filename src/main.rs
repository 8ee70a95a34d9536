use dotenvy::dotenv;
use latex_ledger::{
    api::{self, AppState},
    config::{database, settings},
    core::{
        clock::{Clock, SystemClock},
        directory,
    },
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,sea_orm=warn")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load settings (bind address, clock offset, directory seeds)
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let clock = SystemClock::new(settings.clock.utc_offset_hours)?;

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed companies and suppliers listed in config.toml
    let report = directory::seed_directory(&db, &settings, clock.today())
        .await
        .inspect_err(|e| error!("Failed to seed directory: {}", e))?;
    info!(
        "Directory seeded: {} companies and {} suppliers created, {} already present",
        report.companies_created, report.suppliers_created, report.already_present
    );

    // 6. Serve the API
    let app = api::router(AppState {
        db: Arc::new(db),
        clock: Arc::new(clock),
    });
    let listener = tokio::net::TcpListener::bind(&settings.server.bind_address).await?;
    info!("Listening on {}", settings.server.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
