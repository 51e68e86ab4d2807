use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use linkmark::handlers::{
    handle_add, handle_delete, handle_fetch, handle_get, handle_import, handle_init, handle_list,
    handle_serve,
};
use linkmark_core::print_banner;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet") || chosen_command.get_flag("json");

    init_tracing();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let result = run(&chosen_command).await;
    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(global: &ArgMatches) -> anyhow::Result<()> {
    match global.subcommand() {
        Some(("init", args)) => handle_init(global, args),
        Some(("fetch", args)) => handle_fetch(global, args).await,
        Some(("add", args)) => handle_add(global, args).await,
        Some(("import", args)) => handle_import(global, args).await,
        Some(("get", args)) => handle_get(global, args),
        Some(("list", args)) => handle_list(global, args),
        Some(("delete", args)) => handle_delete(global, args),
        Some(("serve", args)) => handle_serve(global, args).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn init_tracing() {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
