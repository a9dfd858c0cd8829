use clap::Parser;
use gbckp::cli::{Cli, Invocation};
use gbckp::clock::SystemClock;
use gbckp::commands;
use gbckp::config::Settings;
use gbckp::sysexits;
use std::process;
use tracing_subscriber::EnvFilter;

/// Entry point for the gbckp CLI application.
/// Parses command-line arguments, loads settings and backs up every source.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let invocation = Invocation::parse(cli.args.as_slice()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("Usage: gbckp <SOURCE>... [. | to <DIR>]. See 'gbckp --help' for usage.");
        process::exit(sysexits::EX_USAGE);
    });

    let mut settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        process::exit(sysexits::EX_CONFIG);
    });
    if let Some(level) = cli.level {
        settings.level = level;
    }

    match commands::run(&invocation, &settings, &SystemClock) {
        Ok(tally) if tally.all_succeeded() => {}
        Ok(_) => process::exit(sysexits::EX_IOERR),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}
