// ============================================================================
// nexusgear: command-line storefront for the NexusGear marketplace
// ============================================================================
// Usage:
//   nexusgear browse [--category C] [--min N] [--max N] [--search S] [--sort S]
//   nexusgear item <ID>                       Item details and related items
//   nexusgear cart add <ID> [--quantity N]    Add to the persisted cart
//   nexusgear login <EMAIL> <PASSWORD>        Sign in (demo credentials)
//   nexusgear checkout [--payment METHOD]     Place an order for the cart
//   nexusgear export                          Dump cart and session as JSON
// ============================================================================

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_core::cart::MAX_QUANTITY;
use storefront_core::catalog::RELATED_LIMIT;
use storefront_core::{
    CartStore, CategoryFilter, Checkout, CheckoutPayment, CheckoutSummary, DemoAuthBackend,
    KeyValueStore, MarketItem, MarketQuery, PaymentMethod, SessionStore, SocialProvider,
    SortOption, StorefrontConfig, StorefrontDb, StorefrontError,
};
use tracing::debug;

/// NexusGear marketplace from the terminal
#[derive(Parser)]
#[command(name = "nexusgear", version, about = "Browse, fill a cart and check out on NexusGear")]
struct Cli {
    /// Path to the local store (default: ~/.nexusgear/storefront.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// JSON catalog file (default: bundled dataset)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List marketplace items matching the given filters
    Browse {
        /// All, Limiteds, CS2, Dota 2, Rust, In Game
        #[arg(long, default_value = "all")]
        category: String,

        /// Lowest price (default: cheapest item)
        #[arg(long)]
        min: Option<f64>,

        /// Highest price (default: most expensive item)
        #[arg(long)]
        max: Option<f64>,

        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,

        /// rap-desc, rap-asc, price-desc, price-asc, rate-asc
        #[arg(long, default_value = "rap-desc")]
        sort: String,

        /// All, Paypal, Card (shown, not applied)
        #[arg(long, default_value = "all")]
        payment: String,
    },

    /// Show one item and related items from the same game
    Item { id: String },

    /// Show the recently sold strip
    Recent,

    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Sign in with email and password
    Login { email: String, password: String },

    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Sign in through discord, google or github
    Social { provider: String },

    /// Sign in to the seller dashboard
    SellerLogin { email: String, password: String },

    /// Sign in to the admin panel
    AdminLogin {
        email: String,
        password: String,
        key: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Place an order for everything in the cart
    Checkout {
        /// credit-card, paypal, crypto
        #[arg(long, default_value = "credit-card")]
        payment: String,
    },

    /// Export cart and session as JSON
    Export {
        /// Output format (currently only json is supported)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and totals
    List,
    /// Add an item
    Add {
        id: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Remove an item
    Remove { id: String },
    /// Set an item's quantity (0 removes it)
    Set { id: String, quantity: u32 },
    /// Empty the cart
    Clear,
}

/// Everything a command may need, wired explicitly
struct Storefront {
    db: Arc<StorefrontDb>,
    config: StorefrontConfig,
    market: MarketQuery,
    cart: CartStore,
    session: SessionStore,
}

impl Storefront {
    fn open(cli: &Cli) -> Result<Self> {
        let mut config = StorefrontConfig::from_env();
        if cli.db_path.is_some() {
            config.db_path = cli.db_path.clone();
        }
        if cli.catalog.is_some() {
            config.catalog_path = cli.catalog.clone();
        }
        debug!("Configuration: {:?}", config);

        let db = Arc::new(StorefrontDb::open(config.db_path.as_deref())?);
        let store: Arc<dyn KeyValueStore> = db.clone();
        let catalog = Arc::new(config.load_catalog()?);
        let backend = Arc::new(
            DemoAuthBackend::new(config.auth_latency())
                .with_seller_latency(config.seller_latency()),
        );

        Ok(Self {
            market: MarketQuery::new(catalog),
            cart: CartStore::load(store.clone()),
            session: SessionStore::load(store, backend).with_timeout(config.auth_timeout()),
            db,
            config,
        })
    }

    fn item(&self, id: &str) -> Result<&MarketItem> {
        self.market
            .catalog()
            .get(id)
            .ok_or_else(|| StorefrontError::ItemNotFound(id.to_string()).into())
    }
}

fn parse_category(s: &str) -> Result<CategoryFilter> {
    CategoryFilter::from_str(s).ok_or_else(|| StorefrontError::UnknownCategory(s.to_string()).into())
}

fn parse_sort(s: &str) -> Result<SortOption> {
    SortOption::from_str(s).ok_or_else(|| StorefrontError::UnknownSortOption(s.to_string()).into())
}

fn parse_payment_filter(s: &str) -> Result<PaymentMethod> {
    PaymentMethod::from_str(s)
        .ok_or_else(|| StorefrontError::UnknownPaymentMethod(s.to_string()).into())
}

fn parse_checkout_payment(s: &str) -> Result<CheckoutPayment> {
    CheckoutPayment::from_str(s)
        .ok_or_else(|| StorefrontError::UnknownPaymentMethod(s.to_string()).into())
}

fn parse_provider(s: &str) -> Result<SocialProvider> {
    SocialProvider::from_str(s).ok_or_else(|| StorefrontError::UnknownProvider(s.to_string()).into())
}

fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("(invalid: {})", ts))
}

/// RUST_LOG wins when set; otherwise only warnings reach stderr
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront_core=warn,storefront_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();
    let mut store = Storefront::open(&cli)?;

    match cli.command {
        Commands::Browse {
            category,
            min,
            max,
            search,
            sort,
            payment,
        } => cmd_browse(&mut store, &category, min, max, search, &sort, &payment),
        Commands::Item { id } => cmd_item(&store, &id),
        Commands::Recent => cmd_recent(&store),
        Commands::Cart { action } => cmd_cart(&mut store, action),
        Commands::Login { email, password } => {
            report_auth(&store, store.session.login(&email, &password).await)
        }
        Commands::Register {
            username,
            email,
            password,
        } => report_auth(
            &store,
            store.session.register(&username, &email, &password).await,
        ),
        Commands::Social { provider } => {
            let provider = parse_provider(&provider)?;
            report_auth(&store, store.session.social_login(provider).await)
        }
        Commands::SellerLogin { email, password } => {
            report_auth(&store, store.session.seller_login(&email, &password).await)
        }
        Commands::AdminLogin {
            email,
            password,
            key,
        } => report_auth(
            &store,
            store.session.admin_login(&email, &password, &key).await,
        ),
        Commands::Logout => {
            store.session.logout();
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => cmd_whoami(&store),
        Commands::Checkout { payment } => cmd_checkout(&mut store, &payment).await,
        Commands::Export { format } => cmd_export(&store, &format),
    }
}

fn print_items(items: &[MarketItem]) {
    println!(
        "{:<22}  {:<26}  {:<9}  {:>11}  {:>11}  {}",
        "ID", "NAME", "GAME", "RAP", "PRICE", "RARITY"
    );
    println!("{}", "-".repeat(94));
    for item in items {
        println!(
            "{:<22}  {:<26}  {:<9}  {:>11}  {:>11}  {}",
            item.id,
            item.name.chars().take(26).collect::<String>(),
            item.category.as_str(),
            format_price(item.rap),
            format_price(item.price),
            item.rarity.map(|r| r.as_str()).unwrap_or("-")
        );
    }
}

fn cmd_browse(
    store: &mut Storefront,
    category: &str,
    min: Option<f64>,
    max: Option<f64>,
    search: String,
    sort: &str,
    payment: &str,
) -> Result<()> {
    let market = &mut store.market;
    market.set_category(parse_category(category)?);
    market.set_sort_option(parse_sort(sort)?);
    market.set_payment_method(parse_payment_filter(payment)?);
    market.set_search_query(search);
    let (lo, hi) = (
        min.unwrap_or(market.min_price()),
        max.unwrap_or(market.max_price()),
    );
    market.set_price_range(lo, hi);

    let criteria = market.criteria();
    println!(
        "Category: {}  Price: {} - {}  Sort: {}  Payment: {}",
        criteria.category.as_str(),
        format_price(criteria.price_range.0),
        format_price(criteria.price_range.1),
        criteria.sort.label(),
        criteria.payment_method.as_str()
    );
    println!();

    if market.filtered_items().is_empty() {
        println!("No items match these filters.");
        return Ok(());
    }

    print_items(market.filtered_items());
    println!(
        "\nShowing {} of {} items",
        market.filtered_items().len(),
        market.items().len()
    );
    Ok(())
}

fn cmd_item(store: &Storefront, id: &str) -> Result<()> {
    let item = store.item(id)?;

    println!("=== {} ===", item.name);
    println!("ID:       {}", item.id);
    println!("Game:     {}", item.category.as_str());
    println!("Price:    {}", format_price(item.price));
    println!("RAP:      {}", format_price(item.rap));
    if let Some(rarity) = item.rarity {
        println!("Rarity:   {}", rarity.as_str());
    }
    if item.featured {
        println!("Featured");
    }
    if item.is_new {
        println!("New arrival");
    }
    if let Some(line) = store.cart.line(&item.id) {
        println!("In cart:  x{}", line.quantity);
    }

    let related = store.market.catalog().related(&item.id, RELATED_LIMIT);
    if !related.is_empty() {
        println!("\nRelated items:");
        for other in related {
            println!("  - {} ({}) {}", other.name, other.id, format_price(other.price));
        }
    }
    Ok(())
}

fn cmd_recent(store: &Storefront) -> Result<()> {
    let sold = store.market.recently_sold();
    if sold.is_empty() {
        println!("Nothing sold yet.");
        return Ok(());
    }
    println!("=== Recently Sold ===");
    print_items(sold);
    Ok(())
}

fn print_cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    println!("{:<22}  {:<26}  {:>4}  {:>11}", "ID", "NAME", "QTY", "LINE TOTAL");
    println!("{}", "-".repeat(70));
    for line in cart.lines() {
        println!(
            "{:<22}  {:<26}  {:>4}  {:>11}",
            line.id,
            line.name.chars().take(26).collect::<String>(),
            line.quantity,
            format_price(line.line_total())
        );
    }

    let summary = CheckoutSummary::for_cart(cart);
    println!();
    println!("Items:    {}", summary.item_count);
    println!("Subtotal: {}", format_price(summary.subtotal));
    println!("Tax:      {}", format_price(summary.tax));
    println!("Total:    {}", format_price(summary.total));
}

fn cmd_cart(store: &mut Storefront, action: CartAction) -> Result<()> {
    match action {
        CartAction::List => {}
        CartAction::Add { id, quantity } => {
            let item = store.item(&id)?.clone();
            store.cart.add_item(&item, quantity);
            let now = store.cart.line(&id).map(|l| l.quantity).unwrap_or(0);
            println!("Added {} (now x{}, max {}).\n", item.name, now, MAX_QUANTITY);
        }
        CartAction::Remove { id } => {
            if store.cart.remove_item(&id) {
                println!("Removed {}.\n", id);
            } else {
                println!("{} is not in your cart.\n", id);
            }
        }
        CartAction::Set { id, quantity } => {
            if store.cart.line(&id).is_none() {
                println!("{} is not in your cart.\n", id);
            } else {
                store.cart.update_quantity(&id, quantity);
                match store.cart.line(&id) {
                    Some(line) => println!("{} set to x{}.\n", id, line.quantity),
                    None => println!("Removed {}.\n", id),
                }
            }
        }
        CartAction::Clear => {
            store.cart.clear_cart();
            println!("Cart cleared.\n");
        }
    }

    print_cart(&store.cart);
    Ok(())
}

fn report_auth(store: &Storefront, ok: bool) -> Result<()> {
    if !ok {
        let reason = store
            .session
            .status()
            .failure()
            .unwrap_or("unknown error")
            .to_string();
        anyhow::bail!("Sign-in failed: {}", reason);
    }
    cmd_whoami(store)
}

fn cmd_whoami(store: &Storefront) -> Result<()> {
    match store.session.identity() {
        Some(identity) => {
            println!("Signed in as {} <{}>", identity.username, identity.email);
            println!("  id:   {}", identity.id);
            println!("  role: {}", identity.role.as_str());
            if let Some(provider) = identity.provider {
                println!("  via:  {}", provider.display_name());
            }
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn cmd_checkout(store: &mut Storefront, payment: &str) -> Result<()> {
    let payment = parse_checkout_payment(payment)?;
    let checkout = Checkout::new(store.config.checkout_latency());
    let identity = store.session.identity();

    println!("Processing payment...");
    let receipt = checkout
        .place_order(&mut store.cart, identity.as_ref(), payment)
        .await
        .map_err(|e| anyhow!("Checkout failed: {}", e))?;

    println!("=== Order Confirmed ===");
    println!("Order number: {}", receipt.order_number);
    println!("Order id:     {}", receipt.order_id);
    println!("Placed at:    {}", format_timestamp(receipt.placed_at));
    println!("Payment:      {}", receipt.payment.as_str());
    println!("Items:        {}", receipt.summary.item_count);
    println!("Total:        {}", format_price(receipt.summary.total));
    Ok(())
}

fn cmd_export(store: &Storefront, format: &str) -> Result<()> {
    if format != "json" {
        anyhow::bail!("Unsupported format '{}'. Only 'json' is supported.", format);
    }

    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "database": store.db.path().display().to_string(),
        "keys": store.db.keys()?,
        "cart": store.cart.lines(),
        "summary": CheckoutSummary::for_cart(&store.cart),
        "session": store.session.identity(),
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}
