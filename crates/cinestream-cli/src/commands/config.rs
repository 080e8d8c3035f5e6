use crate::context::AppContext;
use crate::display::styled_table;
use crate::output::Output;
use cinestream_config::{Config, PathManager, TMDB_API_KEY_ENV};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_show(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config_file = ctx.paths.config_file();
    let storage_dir = ctx.config.storage_dir(ctx.paths.storage_dir());
    let tmdb = &ctx.config.tmdb;

    let key_source = api_key_source(tmdb.api_key.as_deref());
    let key_display = match tmdb.resolve_api_key() {
        Some(key) if full => key,
        Some(key) => mask_string(&key),
        None => "<not set>".to_string(),
    };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "tmdb": {
                "api_key": key_display,
                "api_key_source": key_source,
                "language": tmdb.language,
                "base_url": tmdb.base_url,
                "image_base_url": tmdb.image_base_url,
            },
            "storage": {
                "list_key": ctx.config.storage.list_key,
                "dir": storage_dir.display().to_string(),
            },
            "log_file": ctx.paths.log_file().display().to_string(),
        }));
        return Ok(());
    }

    let mut info_table = styled_table();
    info_table.add_row(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);
    if !config_file.exists() {
        info_table.add_row(vec![
            Cell::new("Status"),
            Cell::new("not created yet; run `cinestream config init`").fg(Color::Yellow),
        ]);
    }
    output.table(&info_table);

    let mut tmdb_table = styled_table();
    tmdb_table.set_header(vec![
        Cell::new("TMDB").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    tmdb_table.add_row(vec![
        Cell::new("Configured"),
        Cell::new(if tmdb.is_configured() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        }),
    ]);
    tmdb_table.add_row(vec![Cell::new("API Key"), Cell::new(key_display)]);
    tmdb_table.add_row(vec![Cell::new("API Key Source"), Cell::new(key_source)]);
    tmdb_table.add_row(vec![Cell::new("Language"), Cell::new(&tmdb.language)]);
    tmdb_table.add_row(vec![Cell::new("Base URL"), Cell::new(&tmdb.base_url)]);
    tmdb_table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&tmdb.image_base_url)]);
    output.table(&tmdb_table);

    let mut storage_table = styled_table();
    storage_table.set_header(vec![
        Cell::new("My List").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    storage_table.add_row(vec![Cell::new("Storage Key"), Cell::new(&ctx.config.storage.list_key)]);
    storage_table.add_row(vec![
        Cell::new("Directory"),
        Cell::new(storage_dir.display().to_string()),
    ]);
    storage_table.add_row(vec![
        Cell::new("Log File"),
        Cell::new(ctx.paths.log_file().display().to_string()),
    ]);
    output.table(&storage_table);

    Ok(())
}

pub fn run_init(force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if config_file.exists() && !force {
        output.warn(format!(
            "{} already exists. Use --force to overwrite it with defaults.",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    output.info("Next: `cinestream config set-api-key` to connect to TMDB");
    Ok(())
}

pub fn run_set_api_key(api_key: Option<String>, output: &Output) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => rpassword::prompt_password("TMDB API key: ")
            .map_err(|e| eyre!("Failed to read API key: {}", e))?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key cannot be empty");
    }

    let ctx = AppContext::load()?;
    let mut config = ctx.config;
    config.tmdb.api_key = Some(api_key);
    let config_file = ctx.paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("TMDB API key saved to {}", config_file.display()));
    if std::env::var(TMDB_API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        output.warn(format!(
            "{} is set in the environment and takes precedence over the saved key",
            TMDB_API_KEY_ENV
        ));
    }
    Ok(())
}

fn api_key_source(configured: Option<&str>) -> &'static str {
    let from_env = std::env::var(TMDB_API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty());
    match (from_env, configured.is_some_and(|k| !k.trim().is_empty())) {
        (true, _) => "environment",
        (false, true) => "config file",
        (false, false) => "none",
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}
