use crate::commands::parse_target;
use crate::commands::spinner::Spinner;
use crate::context::{log_changes, AppContext};
use crate::display::{titles_label, titles_table};
use crate::output::Output;
use cinestream_core::{FileKeyValueStore, SavedListStore};
use cinestream_models::{CatalogFields, CatalogItem, ItemKey, MediaType, SavedItem};
use cinestream_sources::CatalogSource;
use color_eyre::eyre::{Context, Result};
use serde_json::{json, Value};
use std::io::Read;

pub fn run_list(ctx: &AppContext, media_type: Option<MediaType>, output: &Output) -> Result<()> {
    let store = ctx.open_list();
    let items: Vec<&SavedItem> = store
        .iter()
        .filter(|item| media_type.map_or(true, |mt| item.media_type == mt))
        .collect();

    if !output.is_human() {
        output.json(&serde_json::to_value(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        output.info("My List is empty. Add something with `cinestream add movie <id>`.");
        return Ok(());
    }

    output.heading(format!("My List ({})", titles_label(items.len())));
    output.table(&titles_table(
        items.iter().map(|item| (item.key(), *item)),
        |_| true,
    ));
    Ok(())
}

pub async fn run_add(
    ctx: &AppContext,
    target: Vec<String>,
    json: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut store = ctx.open_list();
    let _changes = log_changes(&store);

    let item = match json {
        Some(raw) => {
            let value = read_json_record(&raw)?;
            CatalogItem::from_value(value).wrap_err("Record cannot be saved to My List")?
        }
        None => {
            let key = parse_target(&target)?;
            if let Some(existing) = store.get(key.id, key.media_type) {
                output.info(format!("{} is already in My List", describe(key, existing)));
                return Ok(());
            }
            fetch_record(ctx, key, output).await?
        }
    };

    let key = item.key();
    let label = describe(key, &item);
    if store.add(item) {
        output.success(format!("Added {} to My List", label));
    } else {
        output.info(format!("{} is already in My List", label));
    }
    report(&store, key, output);
    Ok(())
}

pub fn run_remove(ctx: &AppContext, target: Vec<String>, output: &Output) -> Result<()> {
    let key = parse_target(&target)?;
    let mut store = ctx.open_list();
    let _changes = log_changes(&store);

    let label = match store.get(key.id, key.media_type) {
        Some(item) => describe(key, item),
        None => key.to_string(),
    };

    if store.remove(key.id, key.media_type) {
        output.success(format!("Removed {} from My List", label));
    } else {
        output.info(format!("{} is not in My List", label));
    }
    report(&store, key, output);
    Ok(())
}

pub async fn run_toggle(ctx: &AppContext, target: Vec<String>, output: &Output) -> Result<()> {
    let key = parse_target(&target)?;
    let mut store = ctx.open_list();
    let _changes = log_changes(&store);

    // Removing needs no catalog round trip
    let item = match store.get(key.id, key.media_type).cloned() {
        Some(saved) => CatalogItem::from(saved),
        None => fetch_record(ctx, key, output).await?,
    };

    let label = describe(key, &item);
    if store.toggle(item) {
        output.success(format!("Added {} to My List", label));
    } else {
        output.success(format!("Removed {} from My List", label));
    }
    report(&store, key, output);
    Ok(())
}

pub fn run_clear(ctx: &AppContext, yes: bool, output: &Output) -> Result<()> {
    let mut store = ctx.open_list();
    if store.is_empty() {
        output.info("My List is already empty");
        return Ok(());
    }

    if !yes {
        output.warn(format!(
            "This removes {} from My List. Re-run with --yes to confirm.",
            titles_label(store.len())
        ));
        return Ok(());
    }

    let _changes = log_changes(&store);
    let removed = store.clear();
    output.success(format!("Cleared My List ({} removed)", titles_label(removed)));
    warn_if_not_durable(&store, output);
    Ok(())
}

async fn fetch_record(ctx: &AppContext, key: ItemKey, output: &Output) -> Result<CatalogItem> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start(format!("Looking up {}", key), output.is_quiet());
    let result = catalog.record(key.media_type, key.id).await;
    spinner.finish();
    result.wrap_err_with(|| format!("Failed to look up {}", key))
}

/// Accepts inline JSON, or `-` to read it from stdin
fn read_json_record(raw: &str) -> Result<Value> {
    let text = if raw.trim() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("Failed to read record from stdin")?;
        buffer
    } else {
        raw.to_string()
    };
    serde_json::from_str(&text).wrap_err("--json is not valid JSON")
}

fn describe<T: CatalogFields + ?Sized>(key: ItemKey, record: &T) -> String {
    match record.title() {
        Some(title) => format!("\"{}\" ({})", title, key),
        None => key.to_string(),
    }
}

/// Emit the resulting state for JSON consumers and flag unsaved changes
fn report(store: &SavedListStore<FileKeyValueStore>, key: ItemKey, output: &Output) {
    output.json(&json!({
        "key": key.to_string(),
        "saved": store.is_saved(key.id, key.media_type),
        "count": store.len(),
        "durable": store.is_durable(),
    }));
    warn_if_not_durable(store, output);
}

fn warn_if_not_durable(store: &SavedListStore<FileKeyValueStore>, output: &Output) {
    if !store.is_durable() {
        output.warn(format!(
            "My List could not be written to {}; this change will be lost on exit",
            store.storage().dir().display()
        ));
    }
}
