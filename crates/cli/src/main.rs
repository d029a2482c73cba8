//! Threadline CLI - Catalog, order, and admin tools against the backend.
//!
//! # Usage
//!
//! ```bash
//! # List the de-duplicated catalog
//! tl-cli catalog list
//!
//! # Find a product by name
//! tl-cli catalog search "Canvas Tote"
//!
//! # List one customer's orders
//! tl-cli orders list --customer 12
//!
//! # Print the admin tables
//! TL_ADMIN_PASSWORD=... tl-cli admin tables -u ops
//!
//! # Apply edited rows from a YAML file
//! TL_ADMIN_PASSWORD=... tl-cli admin reconcile -u ops --edits edits.yaml
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, filter, and search products
//! - `orders` - List orders
//! - `admin` - Admin tables and reconciliation (requires the operator login)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use threadline_core::CustomerId;

mod commands;

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(author, version, about = "Threadline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin tables and reconciliation
    Admin {
        #[command(flatten)]
        login: AdminLogin,

        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List one product per name, optionally filtered
    List {
        /// Color to filter by
        #[arg(long)]
        color: Option<String>,

        /// Size to filter by
        #[arg(long)]
        size: Option<String>,

        /// Price range label (e.g. "Under $25", "$25 - $50", "Over $50")
        #[arg(long)]
        price: Option<String>,

        /// Apply filters literally instead of the storefront's legacy rules
        #[arg(long)]
        corrected: bool,
    },
    /// Find a product by name
    Search {
        /// Product name
        name: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List {
        /// Only this customer's orders
        #[arg(short, long)]
        customer: Option<CustomerId>,
    },
}

#[derive(Args)]
struct AdminLogin {
    /// Operator username
    #[arg(short, long, global = true, env = "TL_ADMIN_USERNAME")]
    username: Option<String>,

    /// Operator password
    #[arg(long, global = true, env = "TL_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Print products, customers, and enriched orders
    Tables,
    /// Apply edited product and order rows
    Reconcile {
        /// YAML file with `products` and `orders` lists
        #[arg(short, long)]
        edits: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tl_cli=info,threadline_admin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => {
            let api = commands::connect()?;
            match action {
                CatalogAction::List {
                    color,
                    size,
                    price,
                    corrected,
                } => {
                    let filter = commands::catalog::ListFilter {
                        color,
                        size,
                        price,
                        corrected,
                    };
                    commands::catalog::list(&api, &filter).await?;
                }
                CatalogAction::Search { name } => {
                    commands::catalog::search(&api, &name).await?;
                }
            }
        }
        Commands::Orders { action } => match action {
            OrdersAction::List { customer } => {
                let api = commands::connect()?;
                commands::orders::list(&api, customer).await?;
            }
        },
        Commands::Admin { login, action } => {
            let username = login.username.unwrap_or_default();
            let password = SecretString::from(login.password.unwrap_or_default());
            commands::admin::authorize(&username, &password)?;

            let api = commands::connect()?;
            match action {
                AdminAction::Tables => commands::admin::tables(&api).await?,
                AdminAction::Reconcile { edits } => {
                    commands::admin::reconcile_file(&api, &edits).await?;
                }
            }
        }
    }
    Ok(())
}
