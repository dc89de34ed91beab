//! Item catalog: priced, stocked slots addressed by item number.
//!
//! The catalog is built once with a fixed set of slots. Stock only goes down
//! through [`ItemCatalog::fetch`] and the caller always receives its own copy
//! of the item.

use crate::decimal::Decimal2;
use crate::error::{Result, VendingError};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A dispensed item. Owned by whoever received it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Item {
    name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Item { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Price, remaining stock and template of one slot.
///
/// # Invariants
///
/// - `price >= 0.01`
/// - `stock` only decreases, one per successful fetch, and never below zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    price: Decimal2,
    stock: u32,
    item: Item,
}

impl ItemRecord {
    /// Creates a record, rejecting prices below one cent.
    pub fn new(price: Decimal2, stock: u32, item: Item) -> Result<Self> {
        let mut record = ItemRecord {
            price: Decimal2::ZERO,
            stock,
            item,
        };
        record.set_price(price)?;
        Ok(record)
    }

    pub fn price(&self) -> Decimal2 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn name(&self) -> &str {
        self.item.name()
    }

    fn set_price(&mut self, price: Decimal2) -> Result<()> {
        if price < Decimal2::from_cents(1) {
            return Err(VendingError::InvalidPrice(price));
        }
        self.price = price;
        Ok(())
    }

    /// Takes one copy out of the slot.
    fn fetch(&mut self) -> Result<Item> {
        if self.stock == 0 {
            return Err(VendingError::NoStockLeft);
        }
        self.stock -= 1;
        Ok(self.item.clone())
    }
}

/// Snapshot of a slot returned by [`ItemCatalog::get_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetails {
    pub name: String,
    pub price: Decimal2,
    pub stock: u32,
}

/// Mapping item number → [`ItemRecord`] over a fixed slot range.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: BTreeMap<u32, ItemRecord>,
}

impl ItemCatalog {
    /// Builds a catalog with one `"Item {n}"` per slot in `slots`, each holding
    /// `stock` copies and priced by `price_of(n)`.
    pub fn new<F>(slots: RangeInclusive<u32>, stock: u32, mut price_of: F) -> Result<Self>
    where
        F: FnMut(u32) -> Decimal2,
    {
        if slots.is_empty() {
            return Err(VendingError::InvalidSlotRange {
                first: *slots.start(),
                last: *slots.end(),
            });
        }
        if stock == 0 {
            return Err(VendingError::InvalidStock(stock));
        }

        let mut items = BTreeMap::new();
        for number in slots {
            let item = Item::new(format!("Item {}", number));
            items.insert(number, ItemRecord::new(price_of(number), stock, item)?);
        }

        debug!("Catalog: {} slots with {} copies each", items.len(), stock);
        Ok(ItemCatalog { items })
    }

    fn record(&self, item_number: u32) -> Result<&ItemRecord> {
        self.items
            .get(&item_number)
            .ok_or(VendingError::InvalidItemNumber)
    }

    /// Returns name, price and remaining stock for a slot.
    pub fn get_details(&self, item_number: u32) -> Result<ItemDetails> {
        let record = self.record(item_number)?;
        Ok(ItemDetails {
            name: record.name().to_string(),
            price: record.price(),
            stock: record.stock(),
        })
    }

    /// Takes one copy out of a slot.
    ///
    /// Fails with `InvalidItemNumber` or `NoStockLeft` without touching
    /// any stock.
    pub fn fetch(&mut self, item_number: u32) -> Result<Item> {
        let record = self
            .items
            .get_mut(&item_number)
            .ok_or(VendingError::InvalidItemNumber)?;
        let item = record.fetch()?;
        debug!(
            "Catalog: fetched {} from slot {}, {} left",
            item.name(),
            item_number,
            record.stock()
        );
        Ok(item)
    }

    /// Item numbers and names in ascending slot order.
    pub fn list_items(&self) -> Vec<(u32, String)> {
        self.items
            .iter()
            .map(|(&number, record)| (number, record.name().to_string()))
            .collect()
    }

    /// Overrides the price of a slot. Public seeding hook behind
    /// [`VendingMachine::override_price`](crate::VendingMachine::override_price);
    /// the price is re-validated.
    pub fn set_price(&mut self, item_number: u32, price: Decimal2) -> Result<()> {
        let record = self
            .items
            .get_mut(&item_number)
            .ok_or(VendingError::InvalidItemNumber)?;
        record.set_price(price)
    }
}

/// Price rule assigning the same price to every slot.
pub fn fixed_price(price: Decimal2) -> impl FnMut(u32) -> Decimal2 {
    move |_| price
}

/// Deterministic price rule spreading slots over 1.50–7.00.
///
/// Consecutive slots land far apart in the band so neighbouring items rarely
/// share a price.
pub fn spread_price(item_number: u32) -> Decimal2 {
    const LOW_CENTS: i64 = 150;
    const BAND_CENTS: i64 = 551;
    let offset = (i64::from(item_number) * 137) % BAND_CENTS;
    Decimal2::from_cents(LOW_CENTS + offset)
}
