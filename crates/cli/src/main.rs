//! Sable CLI - catalog seeding and order management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with the launch collection
//! sable seed
//!
//! # List catalog products
//! sable products list
//!
//! # Work the order queue
//! sable orders list
//! sable orders set-status -i 4f9a8b2c -s processing
//! sable orders cancel -i 4f9a8b2c
//!
//! # Read the contact inbox
//! sable messages list
//! sable messages delete -i 91bd03aa
//! ```
//!
//! # Environment Variables
//!
//! - `SABLE_BACKEND_URL` / `SABLE_PROJECT_ID` / `SABLE_API_KEY` - platform
//!   connection (see the storefront crate's config module)
//! - `SABLE_ADMIN_EMAIL` / `SABLE_ADMIN_PASSWORD` - account used for
//!   admin-gated commands
//! - `SENTRY_DSN` - optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use sable_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sable")]
#[command(author, version, about = "Sable CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with the launch collection
    Seed,
    /// Catalog management
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Order queue management
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Contact inbox management
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all catalog products
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List all orders, newest first
    List,
    /// Move an order through its lifecycle
    SetStatus {
        /// Order id
        #[arg(short, long)]
        id: String,

        /// New status (`pending`, `processing`, `completed`, `cancelled`)
        #[arg(short, long)]
        status: String,
    },
    /// Force-cancel an order
    Cancel {
        /// Order id
        #[arg(short, long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum MessagesAction {
    /// List all contact messages, newest first
    List,
    /// Delete a contact message
    Delete {
        /// Message id
        #[arg(short, long)]
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to info for our crates.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sable=info,sable_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let front = commands::storefront(&config)?;

    match cli.command {
        Commands::Seed => commands::seed::run(&front).await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&front).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&front).await?,
            OrdersAction::SetStatus { id, status } => {
                commands::orders::set_status(&front, &id, &status).await?;
            }
            OrdersAction::Cancel { id } => commands::orders::cancel(&front, &id).await?,
        },
        Commands::Messages { action } => match action {
            MessagesAction::List => commands::messages::list(&front).await?,
            MessagesAction::Delete { id } => commands::messages::delete(&front, &id).await?,
        },
    }
    Ok(())
}
