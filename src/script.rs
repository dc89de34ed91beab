//! CSV session scripts.
//!
//! A script is a stream of customer actions (`coin`, `purchase`, `refund`,
//! `details`, `list`) replayed against a machine. Every processed action
//! produces one or more outcome rows; rows that cannot be parsed are logged
//! at warn level and skipped.

use crate::coin::Coin;
use crate::decimal::Decimal2;
use crate::error::{Result, VendingError};
use crate::machine::VendingMachine;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::str::FromStr;

/// Raw script row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct EventRecord {
    /// Action name: coin, purchase, refund, details, list
    pub action: String,

    /// Coin value or item number; absent for refund and list
    pub value: Option<String>,
}

impl EventRecord {
    /// Parses the raw CSV row into a typed event.
    ///
    /// Returns `None` for unknown actions or a missing/malformed value.
    pub fn parse(&self) -> Option<ScriptEvent> {
        let action = self.action.trim().to_lowercase();

        match action.as_str() {
            "coin" => Some(ScriptEvent::InsertCoin(Decimal::from_str(self.value()?).ok()?)),
            "purchase" => Some(ScriptEvent::Purchase(self.value()?.parse().ok()?)),
            "details" => Some(ScriptEvent::Details(self.value()?.parse().ok()?)),
            "refund" => Some(ScriptEvent::Refund),
            "list" => Some(ScriptEvent::List),
            _ => None,
        }
    }

    fn value(&self) -> Option<&str> {
        let trimmed = self.value.as_deref()?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// A parsed script action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// Insert a coin of this face value. Validated when replayed.
    InsertCoin(Decimal),

    /// Buy the item in this slot.
    Purchase(u32),

    /// Return all inserted coins.
    Refund,

    /// Show name, price and stock of a slot.
    Details(u32),

    /// Show every slot.
    List,
}

/// One output row.
#[derive(Debug, Serialize)]
struct OutcomeRow {
    action: &'static str,
    input: String,
    status: &'static str,
    item: String,
    change: String,
    session: Decimal2,
    message: String,
}

fn format_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(Coin::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replays a script against `machine`, writing outcome rows as CSV.
///
/// Output header: `action,input,status,item,change,session,message`.
/// `status` is `ok` or the error kind of the failed operation.
pub fn run_script<R: Read, W: Write>(
    machine: &mut VendingMachine,
    reader: R,
    writer: W,
) -> Result<()> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (row_idx, result) in csv_reader.deserialize::<EventRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        match result {
            Ok(record) => match record.parse() {
                Some(event) => {
                    for row in apply_event(machine, event) {
                        csv_writer.serialize(row)?;
                    }
                }
                None => warn!("Row {}: Failed to parse script record", row_num),
            },
            Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
        }
    }

    csv_writer.flush()?;
    Ok(())
}

fn apply_event(machine: &mut VendingMachine, event: ScriptEvent) -> Vec<OutcomeRow> {
    let row = |machine: &VendingMachine, action: &'static str, input: String| OutcomeRow {
        action,
        input,
        status: "ok",
        item: String::new(),
        change: String::new(),
        session: machine.session_value(),
        message: String::new(),
    };
    let failed = |mut row: OutcomeRow, e: VendingError| {
        row.status = e.kind();
        row.message = e.to_string();
        row
    };

    match event {
        ScriptEvent::InsertCoin(value) => match Coin::new(value) {
            Ok(coin) => {
                machine.insert_coin(coin);
                vec![row(machine, "coin", coin.to_string())]
            }
            Err(e) => vec![failed(row(machine, "coin", value.to_string()), e)],
        },
        ScriptEvent::Purchase(number) => {
            let outcome = machine.purchase_item(number);
            let base = row(machine, "purchase", number.to_string());
            match outcome {
                Ok(purchase) => vec![OutcomeRow {
                    item: purchase.item.name().to_string(),
                    change: format_coins(&purchase.change),
                    ..base
                }],
                Err(e) => vec![failed(base, e)],
            }
        }
        ScriptEvent::Refund => {
            let coins = machine.return_inserted_coins();
            vec![OutcomeRow {
                change: format_coins(&coins),
                ..row(machine, "refund", String::new())
            }]
        }
        ScriptEvent::Details(number) => {
            let base = row(machine, "details", number.to_string());
            match machine.get_item_details(number) {
                Ok(details) => vec![OutcomeRow {
                    item: details.name,
                    message: format!("price {}, stock {}", details.price, details.stock),
                    ..base
                }],
                Err(e) => vec![failed(base, e)],
            }
        }
        ScriptEvent::List => machine
            .list_items()
            .into_iter()
            .map(|(number, name)| OutcomeRow {
                item: name,
                ..row(machine, "list", number.to_string())
            })
            .collect(),
    }
}

/// Raw price row as read from CSV.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    item: u32,
    price: Decimal2,
}

/// Reads an `item,price` table.
///
/// Unlike scripts, a bad price row is fatal: the machine must not start
/// with a partially applied price list.
pub fn read_prices<R: Read>(reader: R) -> Result<BTreeMap<u32, Decimal2>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut prices = BTreeMap::new();

    for (row_idx, result) in csv_reader.deserialize::<PriceRecord>().enumerate() {
        let row = row_idx + 2;
        let record = result.map_err(|e| VendingError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;
        if prices.insert(record.item, record.price).is_some() {
            return Err(VendingError::InvalidRecord {
                row,
                message: format!("duplicate price for item {}", record.item),
            });
        }
        debug!("Row {}: item {} priced at {}", row, record.item, record.price);
    }

    Ok(prices)
}
