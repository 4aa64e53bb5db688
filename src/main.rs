use anyhow::Result;
use artifactl::cli::{Cli, Command};
use artifactl::commands;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match &cli.command {
        Command::Apply(args) => commands::apply::run(&cli, args),
        Command::Artifactory(action) => commands::adhoc::artifactory(&cli, action),
        Command::License(action) => commands::adhoc::license(&cli, action),
        Command::Users(action) => commands::adhoc::users(&cli, action),
        Command::Groups(action) => commands::adhoc::groups(&cli, action),
        Command::Repositories(action) => commands::adhoc::repositories(&cli, action),
        Command::Permissions(action) => commands::adhoc::permissions(&cli, action),
    }
}
