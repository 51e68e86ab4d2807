pub mod bookmark;
pub mod data;
pub mod model;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
  _ _       _                         _
 | (_)_ __ | | ___ __ ___   __ _ _ __| | __
 | | | '_ \| |/ / '_ ` _ \ / _` | '__| |/ /
 | | | | | |   <| | | | | | (_| | |  |   <
 |_|_|_| |_|_|\_\_| |_| |_|\__,_|_|  |_|\_\
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "bookmarks with page metadata".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
