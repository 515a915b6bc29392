use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;
use jot::io::{config_io, logging, paths};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(paths::config_path);

    let config = match config_io::load_config(Some(&config_path), cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let result = match cli.command {
        // No subcommand → launch TUI
        None => jot::tui::run(&config),
        Some(command) => handlers::dispatch(command, cli.json, &config, &config_path),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
