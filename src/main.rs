use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, Instrument};

use cart_service::{setup_tracing, CartConfig, CartSystem, CartView, ProductId};

#[derive(Debug, Parser)]
#[command(name = "cart", about = "Manage the storefront shopping cart")]
struct Cli {
    /// TOML config file (defaults to ./cart.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the cart
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let config = match &cli.config {
        Some(path) => CartConfig::load_from(path)?,
        None => CartConfig::load()?,
    };
    info!(api = %config.api_base_url, storage = %config.storage_path.display(), "Configuration loaded");

    let system = CartSystem::start(&config).await?;
    let mut notifications = system.subscribe();
    let mut view = CartView::load(system.cart_client.clone()).await?;

    let span = tracing::info_span!("cart_command", command = ?cli.command);
    let outcome = async {
        match cli.command {
            Command::List => Ok(()),
            Command::Add { product_id } => view.increment(product_id).await,
            Command::Remove { product_id } => view.remove(product_id).await,
            Command::Update { product_id, amount } => view.set_amount(product_id, amount).await,
        }
    }
    .instrument(span)
    .await;

    if let Err(e) = &outcome {
        error!(error = %e, "Cart command failed");
        while let Ok(notification) = notifications.try_recv() {
            eprintln!("{}", notification.message);
        }
    }

    print_cart(&view);

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_cart(view: &CartView) {
    let rows = view.rows();
    if rows.is_empty() {
        println!("Cart is empty");
        return;
    }
    println!("{:>6}  {:<40} {:>12} {:>5} {:>14}", "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL");
    for row in rows {
        println!(
            "{:>6}  {:<40} {:>12} {:>5} {:>14}",
            row.id, row.title, row.price, row.amount, row.subtotal
        );
    }
    println!("{:>6}  {:<40} {:>12} {:>5} {:>14}", "", "TOTAL", "", "", view.total_formatted());
}
