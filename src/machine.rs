//! Vending machine transaction engine.
//!
//! Holds the coins inserted during the current session and orchestrates
//! purchases across the catalog and the till. A purchase either commits
//! completely (stock taken, session deposited, change paid out) or leaves
//! every resource exactly as it was.

use crate::catalog::{spread_price, Item, ItemCatalog, ItemDetails};
use crate::coin::{coins_value, Coin};
use crate::config::MachineConfig;
use crate::decimal::Decimal2;
use crate::error::{Result, VendingError};
use crate::till::CoinTill;
use log::debug;
use std::mem;

/// Where the current customer session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No coins inserted.
    Idle,
    /// At least one coin inserted and not yet spent or returned.
    Accumulating,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// The dispensed item.
    pub item: Item,

    /// Change paid out of the till, highest denomination first.
    pub change: Vec<Coin>,
}

/// The vending machine.
///
/// Owns its catalog, its till and the session buffer. Nothing outside the
/// machine can mutate them except through the operations below.
///
/// # Example
///
/// ```
/// use std::str::FromStr;
/// use vending_machine::{Coin, Decimal2, Denomination, MachineConfig, VendingMachine};
/// use vending_machine::catalog::fixed_price;
///
/// let price = Decimal2::from_str("3.00").unwrap();
/// let mut machine = VendingMachine::new(&MachineConfig::default(), fixed_price(price)).unwrap();
///
/// machine.insert_coin(Coin::from(Denomination::FiveUnits));
/// let purchase = machine.purchase_item(30).unwrap();
///
/// assert_eq!(purchase.item.name(), "Item 30");
/// assert_eq!(purchase.change, vec![Coin::from(Denomination::TwoUnits)]);
/// ```
#[derive(Debug, Clone)]
pub struct VendingMachine {
    catalog: ItemCatalog,
    till: CoinTill,
    session: Vec<Coin>,
}

impl VendingMachine {
    /// Builds a machine from a configuration and a per-slot price rule.
    pub fn new<F>(config: &MachineConfig, price_of: F) -> Result<Self>
    where
        F: FnMut(u32) -> Decimal2,
    {
        config.validate()?;
        let catalog = ItemCatalog::new(config.slots(), config.initial_stock, price_of)?;
        let till = CoinTill::with_uniform_stock(config.coins_per_denomination);
        Ok(Self::from_parts(catalog, till))
    }

    /// Builds a machine with the default configuration and [`spread_price`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(&MachineConfig::default(), spread_price)
    }

    /// Assembles a machine from an existing catalog and till.
    pub fn from_parts(catalog: ItemCatalog, till: CoinTill) -> Self {
        VendingMachine {
            catalog,
            till,
            session: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Accumulating
        }
    }

    /// Coins inserted in the current session, in insertion order.
    pub fn inserted_coins(&self) -> &[Coin] {
        &self.session
    }

    /// Read-only view of the till.
    pub fn till(&self) -> &CoinTill {
        &self.till
    }

    /// Adds a coin to the current session.
    pub fn insert_coin(&mut self, coin: Coin) {
        self.session.push(coin);
        debug!(
            "Inserted {}, session value now {}",
            coin,
            self.session_value()
        );
    }

    /// Value of the coins inserted so far.
    pub fn session_value(&self) -> Decimal2 {
        coins_value(&self.session)
    }

    /// Cancels the session and hands back every inserted coin unchanged.
    pub fn return_inserted_coins(&mut self) -> Vec<Coin> {
        let coins = mem::take(&mut self.session);
        if !coins.is_empty() {
            debug!(
                "Refunded {} coins worth {}",
                coins.len(),
                coins_value(&coins)
            );
        }
        coins
    }

    /// Buys one copy of `item_number` with the coins inserted so far.
    ///
    /// On failure nothing is consumed:
    ///
    /// - `InvalidItemNumber`, `InsufficientFunds`: session and till untouched
    /// - `ExactChangeOnly`: session and till untouched, session stays pending
    /// - `NoStockLeft`: session and till untouched
    ///
    /// Change is assembled from the till as it stood before this purchase;
    /// the customer's own coins are deposited only once the sale commits.
    pub fn purchase_item(&mut self, item_number: u32) -> Result<Purchase> {
        let details = self.catalog.get_details(item_number)?;
        let provided = self.session_value();

        if provided < details.price {
            debug!(
                "Purchase of {} rejected: provided {}, required {}",
                item_number, provided, details.price
            );
            return Err(VendingError::InsufficientFunds {
                provided,
                required: details.price,
            });
        }

        let plan = if provided > details.price {
            match self.till.plan_change(provided - details.price) {
                Ok(plan) => Some(plan),
                Err(e) => {
                    debug!("Purchase of {} rejected: {}", item_number, e);
                    return Err(e);
                }
            }
        } else {
            None
        };

        let item = match self.catalog.fetch(item_number) {
            Ok(item) => item,
            Err(e) => {
                debug!("Purchase of {} rejected: {}", item_number, e);
                return Err(e);
            }
        };

        // Stock is taken; the rest cannot fail.
        self.till.deposit(mem::take(&mut self.session));
        let change = plan
            .map(|plan| self.till.commit(&plan))
            .unwrap_or_default();

        debug!(
            "Dispensed {} for {} (paid {}, change {})",
            item.name(),
            details.price,
            provided,
            coins_value(&change)
        );

        Ok(Purchase { item, change })
    }

    /// Name, price and stock of a slot.
    pub fn get_item_details(&self, item_number: u32) -> Result<ItemDetails> {
        self.catalog.get_details(item_number)
    }

    /// Item numbers and names in ascending slot order.
    pub fn list_items(&self) -> Vec<(u32, String)> {
        self.catalog.list_items()
    }

    /// Replaces the price of a slot after construction.
    ///
    /// This is the seeding hook for operators that reprice a slot on a live
    /// machine, and for tests that need a known price on top of a generated
    /// price rule. The new price is validated like any other
    /// (`InvalidPrice` below 0.01) and never touches the current session.
    pub fn override_price(&mut self, item_number: u32, price: Decimal2) -> Result<()> {
        self.catalog.set_price(item_number, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixed_price;
    use crate::coin::Denomination;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal2 {
        Decimal2::from_str(s).unwrap()
    }

    fn coin(d: Denomination) -> Coin {
        Coin::from(d)
    }

    fn machine_with_price(price: &str) -> VendingMachine {
        VendingMachine::new(&MachineConfig::default(), fixed_price(dec(price))).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let machine = machine_with_price("1.00");
        assert_eq!(machine.state(), SessionState::Idle);
        assert_eq!(machine.session_value(), Decimal2::ZERO);
        assert!(machine.inserted_coins().is_empty());
    }

    #[test]
    fn test_insert_moves_to_accumulating() {
        let mut machine = machine_with_price("1.00");
        machine.insert_coin(coin(Denomination::FiftyCents));
        machine.insert_coin(coin(Denomination::TwentyCents));

        assert_eq!(machine.state(), SessionState::Accumulating);
        assert_eq!(machine.session_value(), dec("0.70"));
        assert_eq!(
            machine.inserted_coins(),
            &[coin(Denomination::FiftyCents), coin(Denomination::TwentyCents)]
        );
    }

    #[test]
    fn test_return_inserted_coins_drains_session() {
        let mut machine = machine_with_price("1.00");
        let till_before = machine.till().clone();
        machine.insert_coin(coin(Denomination::TwoUnits));
        machine.insert_coin(coin(Denomination::OneCent));

        let refund = machine.return_inserted_coins();

        assert_eq!(
            refund,
            vec![coin(Denomination::TwoUnits), coin(Denomination::OneCent)]
        );
        assert_eq!(machine.state(), SessionState::Idle);
        assert_eq!(machine.till(), &till_before);
    }

    #[test]
    fn test_return_on_idle_is_empty() {
        let mut machine = machine_with_price("1.00");
        assert!(machine.return_inserted_coins().is_empty());
    }

    #[test]
    fn test_exact_payment_gives_no_change() {
        let mut machine = machine_with_price("5.00");
        machine.insert_coin(coin(Denomination::FiveUnits));

        let purchase = machine.purchase_item(30).unwrap();

        assert!(purchase.change.is_empty());
        assert_eq!(purchase.item.name(), "Item 30");
        assert_eq!(machine.state(), SessionState::Idle);
        assert_eq!(machine.till().count(Denomination::FiveUnits), 11);
    }

    #[test]
    fn test_overpayment_returns_change() {
        let mut machine = machine_with_price("5.00");
        for _ in 0..3 {
            machine.insert_coin(coin(Denomination::TwoUnits));
        }

        let purchase = machine.purchase_item(30).unwrap();

        assert_eq!(purchase.change, vec![coin(Denomination::OneUnit)]);
        assert_eq!(machine.till().count(Denomination::TwoUnits), 13);
        assert_eq!(machine.till().count(Denomination::OneUnit), 9);
    }

    #[test]
    fn test_overpayment_by_one_cent() {
        let mut machine = machine_with_price("0.99");
        machine.insert_coin(coin(Denomination::OneUnit));

        let purchase = machine.purchase_item(30).unwrap();
        assert_eq!(purchase.change, vec![coin(Denomination::OneCent)]);
    }

    #[test]
    fn test_invalid_item_leaves_session() {
        let mut machine = machine_with_price("1.00");
        machine.insert_coin(coin(Denomination::OneUnit));

        assert!(matches!(
            machine.purchase_item(99),
            Err(VendingError::InvalidItemNumber)
        ));
        assert_eq!(machine.session_value(), dec("1.00"));
    }

    #[test]
    fn test_insufficient_funds_then_retry() {
        let mut machine = machine_with_price("1.20");
        machine.insert_coin(coin(Denomination::OneUnit));

        match machine.purchase_item(30) {
            Err(VendingError::InsufficientFunds { provided, required }) => {
                assert_eq!(provided, dec("1.00"));
                assert_eq!(required, dec("1.20"));
            }
            other => panic!("Expected InsufficientFunds, got {:?}", other),
        }
        assert_eq!(machine.state(), SessionState::Accumulating);

        machine.insert_coin(coin(Denomination::TwentyCents));
        let purchase = machine.purchase_item(30).unwrap();
        assert!(purchase.change.is_empty());
    }

    #[test]
    fn test_exact_change_only_rolls_back() {
        let catalog = ItemCatalog::new(1..=1, 1, fixed_price(dec("1.40"))).unwrap();
        let mut till = CoinTill::new();
        till.deposit(vec![coin(Denomination::FiftyCents)]);
        till.deposit(vec![coin(Denomination::TwentyCents); 3]);
        let mut machine = VendingMachine::from_parts(catalog, till.clone());

        machine.insert_coin(coin(Denomination::TwoUnits));
        match machine.purchase_item(1) {
            Err(VendingError::ExactChangeOnly { remaining }) => {
                assert_eq!(remaining, dec("0.10"))
            }
            other => panic!("Expected ExactChangeOnly, got {:?}", other),
        }

        assert_eq!(machine.till(), &till);
        assert_eq!(machine.session_value(), dec("2.00"));
        assert_eq!(machine.get_item_details(1).unwrap().stock, 1);
    }

    #[test]
    fn test_no_stock_keeps_coins_and_till() {
        let catalog = ItemCatalog::new(1..=1, 1, fixed_price(dec("1.00"))).unwrap();
        let mut machine =
            VendingMachine::from_parts(catalog, CoinTill::with_uniform_stock(10));

        machine.insert_coin(coin(Denomination::OneUnit));
        machine.purchase_item(1).unwrap();

        machine.insert_coin(coin(Denomination::TwoUnits));
        let till_before = machine.till().clone();
        assert!(matches!(
            machine.purchase_item(1),
            Err(VendingError::NoStockLeft)
        ));
        assert_eq!(machine.till(), &till_before);
        assert_eq!(machine.inserted_coins(), &[coin(Denomination::TwoUnits)]);
    }

    #[test]
    fn test_change_is_not_paid_from_session_coins() {
        // Till has no 1.00 coins; the customer's 2.00 coins are not used to
        // make change for their own purchase.
        let catalog = ItemCatalog::new(1..=1, 1, fixed_price(dec("1.00"))).unwrap();
        let mut machine = VendingMachine::from_parts(catalog, CoinTill::new());

        machine.insert_coin(coin(Denomination::TwoUnits));
        machine.insert_coin(coin(Denomination::TwoUnits));

        assert!(matches!(
            machine.purchase_item(1),
            Err(VendingError::ExactChangeOnly { .. })
        ));
        assert_eq!(machine.till().total_value(), Decimal2::ZERO);
    }

    #[test]
    fn test_override_price() {
        let mut machine = machine_with_price("1.00");
        machine.override_price(30, dec("5.20")).unwrap();
        assert_eq!(machine.get_item_details(30).unwrap().price, dec("5.20"));
        assert_eq!(machine.get_item_details(31).unwrap().price, dec("1.00"));
    }

    #[test]
    fn test_override_price_validates_and_keeps_session() {
        let mut machine = machine_with_price("1.00");
        machine.insert_coin(coin(Denomination::TwoUnits));

        assert!(matches!(
            machine.override_price(30, Decimal2::ZERO),
            Err(VendingError::InvalidPrice(_))
        ));
        assert!(matches!(
            machine.override_price(99, dec("1.00")),
            Err(VendingError::InvalidItemNumber)
        ));
        machine.override_price(30, dec("3.00")).unwrap();

        assert_eq!(machine.get_item_details(30).unwrap().price, dec("3.00"));
        assert_eq!(machine.session_value(), dec("2.00"));
        assert_eq!(machine.state(), SessionState::Accumulating);
    }

    #[test]
    fn test_with_defaults() {
        let machine = VendingMachine::with_defaults().unwrap();
        assert_eq!(machine.list_items().len(), 21);
        assert_eq!(machine.till().total_value(), dec("88.80"));
    }
}
