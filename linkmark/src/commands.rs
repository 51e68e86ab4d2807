use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkmark")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkmark")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"json" "Print results as JSON")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .help("Directory holding the linkmark database")
                .default_value("~/.config/linkmark/")
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Timeout for each outbound request, in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10")
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the linkmark database on your filesystem")
                .arg(
                    arg!(-f --"force")
                        .help("Forces the overwriting of any existing database at the --db location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("fetch")
                .about("Fetch and print a page's metadata without saving a bookmark")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page to inspect"),
                ),
        )
        .subcommand(
            command!("add")
                .about("Save a bookmark, enriched with the page's title, description and favicon")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to bookmark"),
                )
                .arg(
                    arg!(--"best-effort")
                        .required(false)
                        .help("Save the bookmark with empty metadata if the page cannot be fetched")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("import")
                .about("Bookmark every URL listed in a file")
                .arg(
                    arg!(-H --"file" <PATH>)
                        .required(true)
                        .help("Path to a newline-delimited file of URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("How many pages to fetch concurrently")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(--"best-effort")
                        .required(false)
                        .help("Save bookmarks with empty metadata when a page cannot be fetched")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("get")
                .about("Show a single bookmark")
                .arg(arg!(<ID>).help("The bookmark identifier")),
        )
        .subcommand(
            command!("list")
                .about("List saved bookmarks, newest first")
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the listing to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Listing format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("delete")
                .about("Delete a bookmark")
                .arg(arg!(<ID>).help("The bookmark identifier")),
        )
        .subcommand(
            command!("serve")
                .about("Serve the bookmarks JSON API")
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Address to bind")
                        .default_value("127.0.0.1"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("8080"),
                )
                .arg(
                    arg!(--"best-effort")
                        .required(false)
                        .help("Save bookmarks with empty metadata when a page cannot be fetched")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
