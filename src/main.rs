//! Vending Machine CLI
//!
//! Replays a CSV session script against a freshly stocked machine and
//! writes one outcome row per action to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- session.csv > outcomes.csv
//! cargo run -- session.csv prices.csv > outcomes.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `VENDING_MACHINE_CONFIG`: Path to a one-row CSV overriding the slot
//!   range, initial stock and till seed (see `vending_machine::config`)

use log::warn;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use vending_machine::catalog::spread_price;
use vending_machine::config::read_config;
use vending_machine::script::{read_prices, run_script};
use vending_machine::{MachineConfig, Result, VendingError, VendingMachine};

const CONFIG_ENV: &str = "VENDING_MACHINE_CONFIG";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(VendingError::MissingArgument);
    }

    let config = match env::var_os(CONFIG_ENV) {
        Some(path) => read_config(BufReader::new(File::open(path)?))?,
        None => MachineConfig::default(),
    };
    let prices = match args.get(2) {
        Some(path) => read_prices(BufReader::new(File::open(path)?))?,
        None => Default::default(),
    };
    for item in prices.keys().filter(|&&item| !config.slots().contains(&item)) {
        warn!("Price for item {} ignored: no such slot", item);
    }

    let mut machine = VendingMachine::new(&config, |item| {
        prices
            .get(&item)
            .copied()
            .unwrap_or_else(|| spread_price(item))
    })?;

    let file = File::open(&args[1])?;
    let reader = BufReader::new(file);

    let stdout = io::stdout();
    let handle = stdout.lock();
    run_script(&mut machine, reader, handle)?;

    Ok(())
}
