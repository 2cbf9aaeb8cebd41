//! Home of Suits CLI - browse, shop and manage the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! hos-cli catalog list --category business --sort low
//!
//! # Sign in (the session is kept in STOREFRONT_DATA_DIR between runs)
//! hos-cli account login -e james@example.com -p secret
//!
//! # Buy a suit
//! hos-cli checkout --item 1:40R:Charcoal --first-name James --last-name Bond \
//!     --email james@example.com --phone "+254 712 345 678" \
//!     --street "1 Kenyatta Ave" --city Nairobi --postal-code 00100 --payment mobile-money
//!
//! # Ask the stylist
//! hos-cli advise 3 What shoes go with this?
//! ```
//!
//! Each invocation opens a fresh storefront from environment configuration.
//! The cart is not persisted, so `checkout` takes its items on the command
//! line.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use home_of_suits_core::ProductId;
use home_of_suits_storefront::catalog::{CategoryFilter, SortOrder};
use home_of_suits_storefront::config::StorefrontConfig;
use home_of_suits_storefront::{AppError, Storefront};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "hos-cli")]
#[command(author, version, about = "Home of Suits storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Sign in, register and manage your profile
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Show the signed-in customer's order history
    Orders,
    /// Place an order
    Checkout(Box<CheckoutArgs>),
    /// Ask the AI stylist about a product
    Advise {
        /// Product id
        product: ProductId,

        /// Your question
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Administrator tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category to show (`all`, `business`, `wedding`, `casual`, `vintage`, `evening`)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Price order (`featured`, `low`, `high`)
        #[arg(short, long, default_value = "featured")]
        sort: SortOrder,
    },
    /// Show one product in full
    Show {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in profile and address book
    Show,
    /// Edit the signed-in profile
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Manage saved addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// Save a new address
    Add {
        /// Short name such as "Home" or "Office"
        #[arg(long)]
        label: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        street: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        postal_code: String,

        #[arg(long)]
        phone: String,
    },
    /// Delete a saved address
    Remove {
        /// Address id as shown by `account show`
        id: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Sign in as an administrator
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Show sales figures and inventory
    Dashboard,
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

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "home_of_suits_storefront=info,home_of_suits_cli=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            AppError::from(e).report();
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        e.report();
        if !e.is_internal() {
            tracing::error!("{e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut store = Storefront::open(config);

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, sort } => commands::catalog::list(&store, category, sort),
            CatalogAction::Show { id } => commands::catalog::show(&store, id)?,
        },
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(&mut store, &email, &password).await?;
            }
            AccountAction::Register {
                name,
                email,
                password,
            } => commands::account::register(&mut store, &name, &email, &password).await?,
            AccountAction::Logout => commands::account::logout(&mut store)?,
            AccountAction::Show => commands::account::show(&store),
            AccountAction::Update { name, email, phone } => {
                commands::account::update(&mut store, name, email, phone)?;
            }
            AccountAction::Address { action } => match action {
                AddressAction::Add {
                    label,
                    first_name,
                    last_name,
                    street,
                    city,
                    postal_code,
                    phone,
                } => commands::account::add_address(
                    &mut store,
                    home_of_suits_storefront::models::NewAddress {
                        label,
                        first_name,
                        last_name,
                        street,
                        city,
                        postal_code,
                        phone,
                    },
                )?,
                AddressAction::Remove { id } => commands::account::remove_address(&mut store, &id)?,
            },
        },
        Commands::Orders => commands::account::orders(&store),
        Commands::Checkout(args) => commands::checkout::run(&mut store, *args).await?,
        Commands::Advise { product, question } => {
            commands::advise::run(&store, product, &question.join(" ")).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Login { email, password } => {
                commands::admin::login(&mut store, &email, &password).await?;
            }
            AdminAction::Dashboard => commands::admin::dashboard(&store)?,
        },
    }
    Ok(())
}
