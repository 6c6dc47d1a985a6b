use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use money_manager::{
    AppState, HttpTransactionsApi, TransactionQuery, TransactionStore, WeekStart, build_router,
    graceful_shutdown, logging_middleware,
};

/// The web server for Money Manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the remote transactions API.
    #[arg(long, env = "MONEY_MANAGER_API_URL", default_value = "http://localhost:5000/api/v1")]
    api_url: String,

    /// The address to serve the app from.
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    #[arg(long, env = "MONEY_MANAGER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// The day that weekly reporting periods start on.
    #[arg(long, value_enum, default_value_t = WeekStart::Sunday)]
    week_start: WeekStart,

    /// The symbol shown in front of monetary amounts.
    #[arg(long, default_value = "₹")]
    currency_symbol: String,

    /// How long to wait for the remote API before giving up, in seconds.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    /// The file that debug logs are appended to.
    #[arg(long, default_value = "debug.log")]
    log_file: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_file) {
        eprintln!("Could not open log file {}: {error}", args.log_file);
        return ExitCode::FAILURE;
    }

    let api = match HttpTransactionsApi::new(
        &args.api_url,
        Duration::from_secs(args.request_timeout_secs),
    ) {
        Ok(api) => api,
        Err(error) => {
            tracing::error!("Could not create the API client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(TransactionStore::new(api));

    // The app still starts when the API is down, pages show a reload button instead.
    if let Err(error) = store.load(&TransactionQuery::default()).await {
        tracing::warn!("Could not load transactions from {}: {error}", args.api_url);
    }

    let state = match AppState::new(
        store,
        &args.timezone,
        args.week_start,
        &args.currency_symbol,
    ) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Invalid settings: {error}");
            return ExitCode::FAILURE;
        }
    };

    let router = add_tracing_layer(build_router(state))
        .layer(middleware::from_fn(logging_middleware));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::new(args.host, args.port);
    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_file_path: &str) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
