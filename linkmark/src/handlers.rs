use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkmark_core::bookmark::{MetadataPolicy, create_bookmark, import_urls};
use linkmark_core::data::Database;
use linkmark_core::report::{ReportFormat, format_bookmark, generate_report, save_report};
use linkmark_scanner::fetcher::DEFAULT_TIMEOUT_SECS;
use linkmark_scanner::{FetchContext, Scraper, ScraperConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::server::{self, AppState};

pub const DB_FILE_NAME: &str = "linkmark.db";

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read URL file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

/// Parse a bookmark identifier from user input.
pub fn parse_bookmark_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Expand `~` in the configured directory and append the database file name.
pub fn resolve_db_path(config_dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(config_dir);
    Path::new(expanded.as_ref()).join(DB_FILE_NAME)
}

fn open_database(args: &ArgMatches) -> Result<Database> {
    let db_path = resolve_db_path(db_dir(args));
    if !Database::exists(&db_path) {
        bail!(
            "No database at {}. Run `linkmark init` first.",
            db_path.display()
        );
    }
    Database::new(&db_path).with_context(|| format!("Failed to open {}", db_path.display()))
}

fn db_dir(args: &ArgMatches) -> &str {
    args.get_one::<String>("db")
        .map(String::as_str)
        .unwrap_or("~/.config/linkmark/")
}

fn build_scraper(args: &ArgMatches) -> Result<Scraper> {
    let timeout = args
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let config = ScraperConfig::default().with_timeout(Duration::from_secs(timeout));
    Ok(Scraper::with_config(config)?)
}

fn policy_from(args: &ArgMatches) -> MetadataPolicy {
    if args.get_flag("best-effort") {
        MetadataPolicy::BestEffort
    } else {
        MetadataPolicy::Strict
    }
}

/// A fetch context that is cancelled when the user hits Ctrl-C.
fn interruptible_context() -> FetchContext {
    let ctx = FetchContext::new();
    let on_interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    ctx
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    spinner
}

pub fn handle_init(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let db_path = resolve_db_path(db_dir(global));
    let force = args.get_flag("force");

    if Database::exists(&db_path) {
        if !force {
            bail!(
                "Database already exists at {} (use --force to recreate it)",
                db_path.display()
            );
        }
        Database::drop(&db_path)?;
        println!("{} Removed existing database", "✓".green().bold());
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Database::new(&db_path)?;

    println!(
        "{} Database initialised at {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    Ok(())
}

pub async fn handle_fetch(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let url = args
        .get_one::<String>("url")
        .context("--url is required")?;
    let scraper = build_scraper(global)?;
    let ctx = interruptible_context();

    let pb = spinner(format!("Fetching {}", url));
    let result = scraper.get_metadata(url, &ctx).await;
    pb.finish_and_clear();

    let metadata = result?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

pub async fn handle_add(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let url = args
        .get_one::<String>("url")
        .context("--url is required")?;
    let db = open_database(global)?;
    let scraper = build_scraper(global)?;
    let ctx = interruptible_context();

    let pb = spinner(format!("Fetching metadata for {}", url));
    let result = create_bookmark(&scraper, &db, url, &ctx, policy_from(args)).await;
    pb.finish_and_clear();

    let bookmark = result?;
    if global.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&bookmark)?);
    } else {
        println!("{} Bookmark saved\n", "✓".green().bold());
        print!("{}", format_bookmark(&bookmark));
    }
    Ok(())
}

pub async fn handle_import(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let file = args
        .get_one::<PathBuf>("file")
        .context("--file is required")?;
    let threads = args.get_one::<usize>("threads").copied().unwrap_or(4);

    let urls = load_urls_from_file(file).map_err(anyhow::Error::msg)?;
    let db = open_database(global)?;
    let scraper = build_scraper(global)?;
    let ctx = interruptible_context();

    let pb = spinner(format!("Importing {} URLs with {} workers", urls.len(), threads));
    let outcomes = import_urls(&scraper, &db, urls, &ctx, policy_from(args), threads).await;
    pb.finish_and_clear();

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(bookmark) => println!(
                "{} [{}] {}",
                "✓".green().bold(),
                bookmark.id,
                outcome.url
            ),
            Err(e) => {
                failed += 1;
                println!("{} {} ({})", "✗".red().bold(), outcome.url, e);
            }
        }
    }

    println!(
        "\nImported {} of {} URLs",
        outcomes.len() - failed,
        outcomes.len()
    );
    Ok(())
}

pub fn handle_get(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let raw = args.get_one::<String>("ID").context("ID is required")?;
    let id = parse_bookmark_id(raw).with_context(|| format!("Invalid bookmark ID '{}'", raw))?;
    let db = open_database(global)?;

    let bookmark = db.get_bookmark(id)?;
    if global.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&bookmark)?);
    } else {
        print!("{}", format_bookmark(&bookmark));
    }
    Ok(())
}

pub fn handle_list(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let db = open_database(global)?;
    let bookmarks = db.list_bookmarks()?;

    let format = if global.get_flag("json") {
        ReportFormat::Json
    } else {
        args.get_one::<String>("format")
            .and_then(|f| ReportFormat::from_str(f))
            .unwrap_or(ReportFormat::Text)
    };
    let report = generate_report(&bookmarks, format)?;

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Wrote {} bookmarks to {}",
                "✓".green().bold(),
                bookmarks.len(),
                path.display()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}

pub fn handle_delete(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let raw = args.get_one::<String>("ID").context("ID is required")?;
    let id = parse_bookmark_id(raw).with_context(|| format!("Invalid bookmark ID '{}'", raw))?;
    let db = open_database(global)?;

    db.delete_bookmark(id)?;
    println!("{} Deleted bookmark {}", "✓".green().bold(), id);
    Ok(())
}

pub async fn handle_serve(global: &ArgMatches, args: &ArgMatches) -> Result<()> {
    let host = args
        .get_one::<String>("host")
        .map(String::as_str)
        .unwrap_or("127.0.0.1");
    let port = args.get_one::<u16>("port").copied().unwrap_or(8080);

    let db = open_database(global)?;
    let scraper = build_scraper(global)?;
    let timeout = scraper.config().timeout;
    let state = AppState::new(scraper, db, policy_from(args), timeout);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    println!("Serving bookmarks API on http://{addr}/api/bookmarks");
    println!("Press Ctrl+C to stop.");

    server::serve(listener, state).await
}
