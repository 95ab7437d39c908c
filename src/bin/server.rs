use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use flashdeck::auth::AuthKeys;
use flashdeck::config::{get_config, CliArgs};
use flashdeck::{create_app, db, run_migrations, AppState};

fn env_filter(debug: bool) -> EnvFilter {
    let default_filter = if debug { "flashdeck=debug,tower_http=debug" } else { "flashdeck=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();

    // JSON file logs only when --log-dir / FLASHDECK_LOG_DIR is given; the
    // config file is read after logging is up.
    let mut _log_guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;
    let file_layer = args.log_dir.as_ref().map(|log_dir| {
        let file_appender = tracing_appender::rolling::daily(log_dir, "flashdeck.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        _log_guard = Some(guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_filter(env_filter(args.debug))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter(args.debug)))
        .init();

    let config = get_config(&args);

    let pool = db::init_pool(&config.database_url)?;
    {
        let mut conn = pool.get().context("Failed to get a connection for migrations")?;
        run_migrations(&mut conn)?;
    }

    let keys = AuthKeys::new(&config.jwt_secret, config.token_ttl());
    let app = create_app(AppState::new(Arc::new(pool), keys));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
