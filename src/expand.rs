use crate::items::{LineItem, extract_items};
use crate::money::Money;
use crate::order::{OrderRecord, Person};
use crate::price_list::PriceList;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Quantities above this are still expanded in full but logged, since every
/// unit is held in memory.
pub const LARGE_QUANTITY: u64 = 10_000;

/// A single physical unit of an ordered item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedUnit {
    /// 1-based position over every unit of the batch
    pub index: usize,
    /// `index` of the order this unit came from
    pub order_index: usize,
    pub item: String,
    pub price: Money,
    pub main_person: Person,
    pub target_person: Person,
    pub wish: String,
}

/// An order naming the same item in more than one place, e.g. `鬼王x2+鬼王x3`.
/// Flagged for a human to look at, still expanded as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub order_index: usize,
    pub items: String,
    pub main_person: Person,
    pub target_person: Person,
    pub duplicates: BTreeSet<String>,
    /// quantity of every item of the order, repeated names summed
    pub item_totals: BTreeMap<String, u64>,
}

impl Anomaly {
    fn detect(order: &OrderRecord, items: &[LineItem]) -> Option<Self> {
        let mut mentions: BTreeMap<&str, usize> = BTreeMap::new();
        let mut item_totals: BTreeMap<String, u64> = BTreeMap::new();
        for (name, quantity) in items {
            *mentions.entry(name).or_default() += 1;
            *item_totals.entry(name.clone()).or_default() += u64::from(*quantity);
        }
        let duplicates: BTreeSet<String> = mentions
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_owned())
            .collect();
        if duplicates.is_empty() {
            return None;
        }
        Some(Anomaly {
            order_index: order.index,
            items: order.items.clone(),
            main_person: order.main_person.clone(),
            target_person: order.target_person.clone(),
            duplicates,
            item_totals,
        })
    }
}

/// Units and per-item totals for a batch of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Expansion {
    pub units: Vec<ExpandedUnit>,
    pub item_quantity: BTreeMap<String, u64>,
    pub item_amount: BTreeMap<String, Money>,
    pub anomalies: Vec<Anomaly>,
}

impl Expansion {
    /// Expands every order into one unit per item ordered and totals them.
    ///
    /// Items missing from `prices` are priced at zero rather than rejected.
    pub fn new(orders: &[OrderRecord], prices: &PriceList) -> Self {
        let mut expansion = Expansion::default();
        for order in orders {
            expansion.add_order(order, prices);
        }
        tracing::debug!(
            orders = orders.len(),
            units = expansion.units.len(),
            anomalies = expansion.anomalies.len(),
            "expanded orders"
        );
        expansion
    }

    fn add_order(&mut self, order: &OrderRecord, prices: &PriceList) {
        let items = extract_items(&order.items);

        if let Some(anomaly) = Anomaly::detect(order, &items) {
            tracing::debug!(
                order = order.index,
                duplicates = ?anomaly.duplicates,
                "order repeats an item"
            );
            self.anomalies.push(anomaly);
        }

        for (name, quantity) in items {
            if !prices.contains(&name) {
                tracing::debug!(order = order.index, item = %name, "item not in price list");
            }
            let price = prices.get(&name);
            let quantity = u64::from(quantity);
            if quantity > LARGE_QUANTITY {
                tracing::warn!(
                    order = order.index,
                    item = %name,
                    quantity,
                    "expanding an unusually large quantity"
                );
            }
            *self.item_quantity.entry(name.clone()).or_default() += quantity;
            *self.item_amount.entry(name.clone()).or_default() += price * quantity;

            for _ in 0..quantity {
                self.units.push(ExpandedUnit {
                    index: self.units.len() + 1,
                    order_index: order.index,
                    item: name.clone(),
                    price,
                    main_person: order.main_person.clone(),
                    target_person: order.target_person.clone(),
                    wish: order.wish.clone(),
                });
            }
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.item_quantity.values().sum()
    }

    pub fn total_amount(&self) -> Money {
        self.item_amount.values().sum()
    }
}

/// Shorthand for [`Expansion::new`]
pub fn expand(orders: &[OrderRecord], prices: &PriceList) -> Expansion {
    Expansion::new(orders, prices)
}
