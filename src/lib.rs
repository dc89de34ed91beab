//! # Vending Machine
//!
//! A coin-operated vending machine: a catalog of priced items with finite
//! stock, a till of coins with finite stock, and a purchase protocol that
//! dispenses an item and pays exact change out of the till, or refuses the
//! sale without consuming anything.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 2 decimal places via `rust_decimal`, rounded
//!   after every step
//! - **Atomic purchases**: change is planned before anything is mutated
//! - **Greedy change**: largest denomination first; when greedy fails the
//!   sale is refused with `ExactChangeOnly`
//! - **Typed failures**: every rejection is a `VendingError` variant
//!
//! ## Example
//!
//! ```
//! use std::str::FromStr;
//! use vending_machine::{Coin, Decimal2, Denomination, VendingMachine};
//!
//! let mut machine = VendingMachine::with_defaults().unwrap();
//! machine
//!     .override_price(30, Decimal2::from_str("3.00").unwrap())
//!     .unwrap();
//!
//! for _ in 0..3 {
//!     machine.insert_coin(Coin::from(Denomination::TwoUnits));
//! }
//! machine.insert_coin(Coin::from(Denomination::FiftyCents));
//!
//! let purchase = machine.purchase_item(30).unwrap();
//! assert_eq!(vending_machine::coins_value(&purchase.change).to_string(), "3.50");
//! ```

pub mod catalog;
pub mod coin;
pub mod config;
pub mod decimal;
pub mod error;
pub mod machine;
pub mod script;
pub mod till;

pub use catalog::{Item, ItemCatalog, ItemDetails, ItemRecord};
pub use coin::{coins_value, Coin, Denomination};
pub use config::MachineConfig;
pub use decimal::Decimal2;
pub use error::{Result, VendingError};
pub use machine::{Purchase, SessionState, VendingMachine};
pub use till::{ChangePlan, CoinTill};
