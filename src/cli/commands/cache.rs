//! Cache command - manage recorded install orders

use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::{PylayerError, PylayerResult};
use crate::order::{FileOrderStore, OrderStore, StoredOrder};
use crate::ui::{self, UiContext};

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> PylayerResult<()> {
    let store = FileOrderStore::new(ConfigManager::orders_dir(config));

    match args.action {
        CacheAction::List { format } => list_orders(&store, format).await,
        CacheAction::Show { python } => show_order(&store, &python).await,
        CacheAction::Clear { python, yes } => clear_orders(&store, python, yes).await,
    }
}

async fn list_orders(store: &FileOrderStore, format: OutputFormat) -> PylayerResult<()> {
    let orders = store.list().await?;

    match format {
        OutputFormat::Table => print_order_table(store, &orders),
        OutputFormat::Json => print_order_json(&orders)?,
        OutputFormat::Plain => {
            for order in &orders {
                println!("{}", order.runtime_version);
            }
        }
    }

    Ok(())
}

fn print_order_table(store: &FileOrderStore, orders: &[StoredOrder]) {
    if orders.is_empty() {
        println!("No recorded orders in {}", store.dir().display());
        return;
    }

    println!("{:<12} {:<10} {:<20}", "PYTHON", "ENTRIES", "UPDATED");
    println!("{}", "-".repeat(42));

    for order in orders {
        println!(
            "{:<12} {:<10} {:<20}",
            order.runtime_version,
            order.entries,
            order.modified.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("Total: {} order(s) in {}", orders.len(), store.dir().display());
}

fn print_order_json(orders: &[StoredOrder]) -> PylayerResult<()> {
    #[derive(serde::Serialize)]
    struct OrderJson<'a> {
        python: &'a str,
        path: String,
        entries: usize,
        updated_at: String,
    }

    let json: Vec<OrderJson> = orders
        .iter()
        .map(|o| OrderJson {
            python: &o.runtime_version,
            path: o.path.display().to_string(),
            entries: o.entries,
            updated_at: o.modified.to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn show_order(store: &FileOrderStore, version: &str) -> PylayerResult<()> {
    if !store.path_for(version).exists() {
        return Err(PylayerError::OrderNotFound(version.to_string()));
    }

    for entry in store.load(version).await? {
        println!("{}", entry);
    }
    Ok(())
}

async fn clear_orders(store: &FileOrderStore, version: Option<String>, yes: bool) -> PylayerResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);

    let prompt = match version {
        Some(ref v) => format!("Remove the recorded order for python {}?", v),
        None => format!("Remove all recorded orders in {}?", store.dir().display()),
    };

    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_warn_hint(&ctx, "Nothing removed", "Pass --yes to skip confirmation");
        return Ok(());
    }

    match version {
        Some(v) => {
            if !store.remove(&v).await? {
                return Err(PylayerError::OrderNotFound(v));
            }
            ui::step_ok(&ctx, &format!("Removed recorded order for python {}", v));
        }
        None => {
            let removed = store.clear().await?;
            ui::step_ok(&ctx, &format!("Removed {} recorded order(s)", removed));
        }
    }

    Ok(())
}
