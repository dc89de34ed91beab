//! Machine seeding configuration.
//!
//! A configuration file is a one-row CSV whose headers name the fields to
//! set; missing columns keep their defaults:
//!
//! ```text
//! first_slot,last_slot,initial_stock,coins_per_denomination
//! 30,50,5,10
//! ```

use crate::error::{Result, VendingError};
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::io::Read;
use std::ops::RangeInclusive;

/// Everything needed to stock a fresh machine, apart from prices.
///
/// Prices come from a separate price rule passed to
/// [`VendingMachine::new`](crate::VendingMachine::new).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Lowest item number.
    pub first_slot: u32,

    /// Highest item number (inclusive).
    pub last_slot: u32,

    /// Copies of each item loaded at start.
    pub initial_stock: u32,

    /// Coins of each denomination loaded into the till at start.
    pub coins_per_denomination: u32,
}

impl MachineConfig {
    pub const DEFAULT_FIRST_SLOT: u32 = 30;
    pub const DEFAULT_LAST_SLOT: u32 = 50;
    pub const DEFAULT_INITIAL_STOCK: u32 = 5;
    pub const DEFAULT_COINS_PER_DENOMINATION: u32 = 10;

    /// Item numbers served by the machine.
    pub fn slots(&self) -> RangeInclusive<u32> {
        self.first_slot..=self.last_slot
    }

    /// Checks that the configuration describes a usable machine.
    pub fn validate(&self) -> Result<()> {
        if self.first_slot > self.last_slot {
            return Err(VendingError::InvalidSlotRange {
                first: self.first_slot,
                last: self.last_slot,
            });
        }
        if self.initial_stock == 0 {
            return Err(VendingError::InvalidStock(self.initial_stock));
        }
        Ok(())
    }
}

/// Reads and validates a one-row configuration CSV.
///
/// An empty file (headers only) yields the defaults.
pub fn read_config<R: Read>(reader: R) -> Result<MachineConfig> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = csv_reader.deserialize::<MachineConfig>();

    let config = match rows.next() {
        Some(result) => result.map_err(|e| VendingError::InvalidRecord {
            row: 2,
            message: e.to_string(),
        })?,
        None => MachineConfig::default(),
    };
    if rows.next().is_some() {
        return Err(VendingError::InvalidRecord {
            row: 3,
            message: "configuration must be a single row".to_string(),
        });
    }

    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            first_slot: Self::DEFAULT_FIRST_SLOT,
            last_slot: Self::DEFAULT_LAST_SLOT,
            initial_stock: Self::DEFAULT_INITIAL_STOCK,
            coins_per_denomination: Self::DEFAULT_COINS_PER_DENOMINATION,
        }
    }
}
