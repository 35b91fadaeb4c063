use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use emenu_api::{build_router, AppState};
use emenu_core::repositories::{DishRepository, MenuRepository, UserRepository};
use emenu_core::services::{AuthService, DigestService, Mailer};
use emenu_infrastructure::{
    create_pool, run_migrations, InMemoryStore, LogMailer, PgDishRepository, PgMenuRepository,
    PgUserRepository, SmtpMailer,
};
use emenu_security::JwtService;
use emenu_shared::config::{AppConfig, MailSettings, MailTransport};

mod scheduler;
mod seed;

use seed::SeedAccount;

#[derive(Parser, Debug)]
#[command(name = "emenu-server", version, about = "eMenu - restaurant menu API and daily dish digest")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API and the daily digest scheduler (default)
    Serve {
        /// Keep all data in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,

        #[command(flatten)]
        seed: SeedAccount,
    },
    /// Compute and send the digest once, e.g. from cron
    SendDigest {
        /// Reference date (YYYY-MM-DD); covers the 24 hours before its midnight UTC
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Create an account for the private API
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, env = "EMENU_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

struct Repositories {
    dishes: Arc<dyn DishRepository>,
    menus: Arc<dyn MenuRepository>,
    users: Arc<dyn UserRepository>,
}

async fn connect(config: &AppConfig, in_memory: bool) -> anyhow::Result<Repositories> {
    if in_memory {
        warn!("Using in-memory store; data is lost on exit");
        let store = Arc::new(InMemoryStore::new());
        return Ok(Repositories {
            dishes: store.clone(),
            menus: store.clone(),
            users: store,
        });
    }

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }

    Ok(Repositories {
        dishes: Arc::new(PgDishRepository::new(pool.clone())),
        menus: Arc::new(PgMenuRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
    })
}

fn build_mailer(settings: &MailSettings) -> anyhow::Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match settings.transport {
        MailTransport::Smtp => Arc::new(SmtpMailer::new(settings).context("invalid SMTP settings")?),
        MailTransport::Log => Arc::new(LogMailer),
    };
    Ok(mailer)
}

fn jwt_service(config: &AppConfig) -> JwtService {
    JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry)
}

async fn serve(config: AppConfig, in_memory: bool, seed: SeedAccount) -> anyhow::Result<()> {
    let repos = connect(&config, in_memory).await?;

    if in_memory {
        let auth = AuthService::new(repos.users.clone(), jwt_service(&config));
        if seed.apply(&auth).await?.is_none() {
            warn!("No account seeded; private endpoints will reject every request");
        }
    }

    if config.digest.enabled {
        let run_at = config.digest.run_at_time()?;
        let digest = DigestService::new(repos.dishes.clone(), repos.users.clone(), config.digest.subject.clone())?;
        let mailer = build_mailer(&config.mail)?;
        info!("Daily digest scheduled at {} UTC", run_at);
        tokio::spawn(scheduler::run_daily(Arc::new(digest), mailer, run_at));
    } else {
        info!("Daily digest disabled");
    }

    let state = AppState::new(repos.dishes, repos.menus, repos.users, jwt_service(&config));
    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn send_digest(config: AppConfig, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let repos = connect(&config, false).await?;
    let digest = DigestService::new(repos.dishes, repos.users, config.digest.subject.clone())?;
    let mailer = build_mailer(&config.mail)?;

    let reference_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let report = digest.run(reference_date, mailer.as_ref()).await?;
    info!(sent = report.sent, failed = report.failed.len(), "Digest for {} finished", reference_date);

    if !report.failed.is_empty() {
        anyhow::bail!("{} digest messages could not be delivered", report.failed.len());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    emenu_shared::telemetry::init_telemetry();

    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("{} starting ({})", config.app.name, config.app.env);

    let command = cli.command.unwrap_or(Command::Serve {
        in_memory: false,
        seed: SeedAccount::default(),
    });
    match command {
        Command::Serve { in_memory, seed } => serve(config, in_memory, seed).await,
        Command::SendDigest { date } => send_digest(config, date).await,
        Command::CreateUser {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let repos = connect(&config, false).await?;
            let auth = AuthService::new(repos.users, jwt_service(&config));
            let user = auth
                .create_user(&username, &first_name, &last_name, &email, &password)
                .await?;
            info!("Created user {} ({})", user.username, user.id);
            Ok(())
        }
    }
}
