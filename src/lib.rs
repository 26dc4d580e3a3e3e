pub mod config;
pub mod expand;
pub mod items;
pub mod lines;
pub mod money;
pub mod order;
pub mod parser;
pub mod price_list;
pub mod reconcile;
pub mod report;

use config::Config;
use expand::Expansion;
use order::OrderRecord;
use parser::Dialect;
use reconcile::{Reconciliation, Reference};
use serde::Serialize;

/// Everything derived from one paste of order text.
///
/// A batch is built once and never changed; parsing new text means building
/// a new batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub dialect: Dialect,
    pub orders: Vec<OrderRecord>,
    pub expansion: Expansion,
}

impl Batch {
    pub fn parse(text: &str, dialect: Dialect, config: &Config) -> Self {
        let orders = parser::parse(text, dialect, &config.wish_markers);
        let expansion = Expansion::new(&orders, &config.prices);
        tracing::info!(
            orders = orders.len(),
            units = expansion.units.len(),
            amount = %expansion.total_amount(),
            anomalies = expansion.anomalies.len(),
            "loaded batch"
        );
        Batch {
            dialect,
            orders,
            expansion,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn reconcile(&self, reference: &Reference) -> Reconciliation {
        Reconciliation::from_expansion(&self.expansion, reference)
    }

    /// The orders as tab-delimited lines
    pub fn to_tabbed(&self) -> String {
        parser::multiline::to_tabbed(&self.orders)
    }
}
