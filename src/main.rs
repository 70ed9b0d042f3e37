use axum::middleware;
use axum::routing::get;
use clap::{Parser, Subcommand};
use config::{load_config, AppConfig, LogLevel};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod auth;
pub mod config;
pub mod handler;
pub mod registry;
pub mod routes;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliFlags {
    /// The configuration file holding the API key allow-list; can be relative.
    #[clap(long = "config", default_value = "config.json")]
    config_path: String,

    /// The directory scanned for route definition files; the same directory
    /// backs the /json passthrough endpoint.
    #[clap(long = "json-dir", default_value = "json")]
    json_dir: String,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the JSON Schema for a route definition
    RouteSchema,
}

#[tokio::main]
/// Entrypoint into the application.
async fn main() {
    let opt = CliFlags::parse();

    match opt.command {
        Some(Commands::RouteSchema) => {
            routes::generate_schema();
        }
        None => start_server(opt).await,
    }
}

async fn start_server(args: CliFlags) {
    // The config is parsed before logging is set up so the configured level
    // can apply; a load failure is reported once the subscriber is installed.
    let (user_config, config_error) = match load_config(args.config_path.as_str()) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let level = if let Some(logging) = user_config.logging.clone() {
        match logging.level {
            LogLevel::TRACE => Level::TRACE,
            LogLevel::DEBUG => Level::DEBUG,
            LogLevel::INFO => Level::INFO,
            LogLevel::WARN => Level::WARN,
            LogLevel::ERROR => Level::ERROR,
        }
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    // This shouldn't fail, hence the .expect()
    tracing::subscriber::set_global_default(subscriber).expect("setting default logger failed");

    if let Some(e) = config_error {
        error!("Unable to read or parse {}: {}", args.config_path, e);
    }

    // Registration is a blocking phase: every route file is read and
    // validated before the listener binds, so no request can observe a
    // partially built routing table.
    let json_dir = PathBuf::from(&args.json_dir);
    let loaded = registry::load_route_files(&json_dir);
    let routes: Vec<_> = loaded
        .into_iter()
        .flat_map(|(_, file_routes)| file_routes)
        .collect();
    info!(
        "Loaded {} mock routes from {}",
        routes.len(),
        json_dir.display()
    );

    // Dynamic routes sit behind the key check; the passthrough is registered
    // after the layer and stays public.
    let app = registry::build_router(&routes)
        .layer(middleware::from_fn_with_state(
            auth::ApiKeys::new(user_config.api_keys.clone()),
            auth::require_api_key,
        ))
        .route(
            handler::JSON_FILE_ROUTE,
            get(handler::json_file).with_state(json_dir),
        );

    let listener = match tokio::net::TcpListener::bind(("127.0.0.1", 0)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("No available ports found: {}", e);
            return;
        }
    };
    info!("🚀 Listening on {}", listener.local_addr().expect("bound listener has an address"));

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
