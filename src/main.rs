use anyhow::Result;
use clap::{Arg, Command};

use sysgather::commands;

fn main() -> Result<()> {
    sysgather::init_logging();

    let matches = Command::new("sysgather")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Samples host load, CPU count, uptime and logged-in users")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run the configured inputs and print samples as JSON lines")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("PATH")
                        .help("Path to the TOML configuration file (default: conf/sysgather.toml)"),
                ),
        )
        .subcommand(Command::new("inputs").about("List the registered inputs"))
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches),
        Some(("inputs", _)) => commands::inputs(),
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Use 'sysgather --help' for more information.");
            Ok(())
        }
    }
}
