use std::process::ExitCode;
use std::sync::Arc;

use actix_web::HttpServer;
use clap::{Parser, Subcommand};

use bookshelf_api::{
    bootstrap,
    config::Config,
    store::{MemoryUserStore, PgUserStore, UserStore},
    AppError, AppState,
};

#[derive(Debug, Parser)]
#[command(name = "bookshelf-api", version, about = "Storefront backend and SPA host")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the database schema and the configured seed admin, then exit.
    InitDb,
}

async fn open_store(config: &Config) -> Result<Arc<dyn UserStore>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgUserStore::connect(url, config.database_max_connections).await?;
            log::info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL is not set; users are kept in memory and lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

async fn init_db(config: &Config, users: &dyn UserStore) -> Result<(), AppError> {
    let outcome =
        bootstrap::init_database(users, config.admin.as_ref(), config.bcrypt_cost).await?;
    log::info!("{}", outcome.message());
    Ok(())
}

async fn serve(config: Config, users: Arc<dyn UserStore>) -> std::io::Result<()> {
    let bind = (config.server_host.clone(), config.server_port);
    log::info!(
        "Starting server at {} (static files from {})",
        config.server_url(),
        config.static_dir.display()
    );

    let state = AppState::new(config, users);
    HttpServer::new(move || bookshelf_api::build_app(state.clone()))
        .bind(bind)?
        .run()
        .await
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("Loaded configuration: {:?}", config);

    let users = match open_store(&config).await {
        Ok(users) => users,
        Err(e) => {
            log::error!("Failed to open user store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_db(&config, users.as_ref()).await {
        log::error!("Database initialization failed: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => ExitCode::SUCCESS,
        Command::Serve => match serve(config, users).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Server error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
