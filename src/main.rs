mod catalog;
mod checkout;
mod cli;
mod config;
mod engine;
mod intel;
mod logging;
mod model;
mod policy;
mod sink;
mod storage;

use std::process;

use config::Config;
use storage::Storage;

fn main() {
    logging::init("warn");

    let config = Config::load();

    let root = Storage::default_root().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let storage = match Storage::new(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config, &storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
