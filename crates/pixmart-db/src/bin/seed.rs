//! # Seed Data Generator
//!
//! Populates the database with photo products and orders for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products and 50 orders (default)
//! cargo run -p pixmart-db --bin seed
//!
//! # Custom amounts
//! cargo run -p pixmart-db --bin seed -- --products 1000 --orders 300
//!
//! # Specify database path (otherwise PIXMART_DB_PATH or ./pixmart_dev.db)
//! cargo run -p pixmart-db --bin seed -- --db ./data/pixmart.db
//! ```
//!
//! ## Generated Data
//! - Products cycle through photo subjects, each tagged with its subject
//!   plus one or two mood tags
//! - Orders reference 1-4 products and rotate through every status
//! - One extra order references a product id that does not exist, so
//!   population has something to drop
//!
//! Log verbosity follows `RUST_LOG` (default `info,pixmart=debug,sqlx=warn`).

use std::env;
use std::time::Instant;

use pixmart_core::{
    NewOrder, NewProduct, OrderListOptions, OrderStatus, ProductLinks, ProductListOptions,
    ProductUrls, ProductUser, Tag,
};
use pixmart_db::{Database, DbConfig};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Photo subjects; each doubles as a tag.
const SUBJECTS: &[&str] = &[
    "nature", "city", "ocean", "mountain", "forest", "desert", "street", "portrait",
];

/// Secondary tags mixed into products.
const MOODS: &[&str] = &["calm", "moody", "bright", "vintage", "minimal"];

/// Photographers credited on generated products.
const PHOTOGRAPHERS: &[(&str, &str, &str)] = &[
    ("u-ada", "Ada", "ada"),
    ("u-grace", "Grace", "gracehopper"),
    ("u-linus", "Linus", "linus"),
    ("u-margaret", "Margaret", "mhamilton"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 200;
    let mut order_count: usize = 50;
    let mut db_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pixmart Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>  Number of products to generate (default: 200)");
                println!("  -o, --orders <N>    Number of orders to generate (default: 50)");
                println!("  -d, --db <PATH>     Database file path (default: $PIXMART_DB_PATH)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let mut config = DbConfig::from_env()?;
    if let Some(path) = db_path {
        config.database_path = path.into();
    }

    info!(
        path = %config.database_path.display(),
        products = product_count,
        orders = order_count,
        "Seeding database"
    );

    let db = Database::new(config).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has products, skipping seed to avoid duplicates"
        );
        return Ok(());
    }

    // Products
    let start = Instant::now();
    let mut product_ids = Vec::with_capacity(product_count);

    for seed in 0..product_count {
        match db.products().create(generate_product(seed)).await {
            Ok(product) => product_ids.push(product.id),
            Err(e) => {
                warn!(seed, error = %e, "Failed to insert product");
                continue;
            }
        }

        if product_ids.len() % 100 == 0 {
            info!(generated = product_ids.len(), "Products progress");
        }
    }

    info!(
        generated = product_ids.len(),
        elapsed = ?start.elapsed(),
        "Products generated"
    );

    // Orders
    let start = Instant::now();
    let mut generated = 0;

    if !product_ids.is_empty() {
        for seed in 0..order_count {
            let input = generate_order(seed, &product_ids);
            if let Err(e) = db.orders().create(input).await {
                warn!(seed, error = %e, "Failed to insert order");
                continue;
            }
            generated += 1;
        }
    }

    // Deliberately dangling reference
    let dangling = NewOrder::from_json(json!({
        "buyerEmail": "dangling@example.com",
        "products": ["does-not-exist"],
        "status": "PENDING"
    }))?;
    let dangling = db.orders().create(dangling).await?;
    generated += 1;

    info!(
        generated,
        elapsed = ?start.elapsed(),
        "Orders generated"
    );

    // Exercise the filters
    let nature = db
        .products()
        .list(&ProductListOptions::default().tag("nature").limit(0))
        .await?;
    info!(count = nature.len(), "Products tagged 'nature'");

    if let Some(first) = product_ids.first() {
        let with_first = db
            .orders()
            .list(&OrderListOptions::default().product_id(first.clone()).limit(0))
            .await?;
        info!(product_id = %first, count = with_first.len(), "Orders containing product");
    }

    for status in OrderStatus::ALL {
        let orders = db
            .orders()
            .list(&OrderListOptions::default().status(status).limit(0))
            .await?;
        info!(status = %status, count = orders.len(), "Orders by status");
    }

    info!(
        id = %dangling.id,
        resolved = dangling.products.len(),
        "Dangling order populated"
    );

    db.close().await;
    info!("Seed complete");

    Ok(())
}

/// Installs the fmt subscriber, honoring `RUST_LOG` when set.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pixmart=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Generates a single photo product.
fn generate_product(seed: usize) -> NewProduct {
    let subject = SUBJECTS[seed % SUBJECTS.len()];
    let mood = MOODS[seed % MOODS.len()];
    let (user_id, first_name, username) = PHOTOGRAPHERS[seed % PHOTOGRAPHERS.len()];

    let mut tags = vec![Tag::new(subject), Tag::new(mood)];
    if seed % 3 == 0 {
        tags.push(Tag::new(MOODS[(seed / 3) % MOODS.len()]));
        tags.dedup();
    }

    let photo = format!("photo-{seed:05}");

    NewProduct {
        description: Some(format!("{subject} shot #{seed}")),
        // Every fourth photo has no alt text
        alt_description: (seed % 4 != 0).then(|| format!("a {mood} {subject} scene")),
        likes: ((seed * 37) % 1000) as i64,
        urls: ProductUrls {
            regular: format!("https://images.pixmart.dev/{photo}?w=1080"),
            small: format!("https://images.pixmart.dev/{photo}?w=400"),
            thumb: format!("https://images.pixmart.dev/{photo}?w=200"),
        },
        links: ProductLinks {
            self_link: format!("https://api.pixmart.dev/photos/{photo}"),
            html: format!("https://pixmart.dev/photos/{photo}"),
        },
        user: ProductUser {
            id: user_id.to_string(),
            first_name: first_name.to_string(),
            last_name: None,
            portfolio_url: Some(format!("https://pixmart.dev/@{username}")),
            username: username.to_string(),
        },
        tags,
    }
}

/// Generates an order referencing 1-4 of the given products.
fn generate_order(seed: usize, product_ids: &[String]) -> NewOrder {
    let size = 1 + seed % 4;
    let products = (0..size)
        .map(|k| product_ids[(seed * 7 + k * 13) % product_ids.len()].clone())
        .collect();

    let mut order = NewOrder::new(format!("buyer{seed}@example.com"), products);
    order.status = Some(OrderStatus::ALL[seed % OrderStatus::ALL.len()]);
    order
}
