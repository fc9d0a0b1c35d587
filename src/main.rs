use clap::Parser;
use layoutctl::cli::dispatcher::Dispatcher;
use layoutctl::cli::main_types::Cli;
use layoutctl::storage::config::Config;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        println!("Verbose mode is enabled");
        if let Some(config_dir) = &cli.config_dir {
            println!("Using config directory: {}", config_dir);
        }
        if let Some(grid_unit) = cli.grid_unit {
            println!("Using gridUnit override: {}", grid_unit);
        }
    }

    let dispatcher = Dispatcher::new(config, config_path, cli.verbose, cli.grid_unit);

    if let Err(e) = dispatcher.dispatch(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
