//! Plain-text renderings of a [`Batch`]. Each renderer is a small wrapper
//! implementing `Display` so callers can `print!` or `to_string()` it.

use crate::Batch;
use crate::expand::{Anomaly, ExpandedUnit, Expansion};
use crate::money::Money;
use crate::price_list::PriceList;
use crate::reconcile::{Reconciliation, Status};
use chrono::{DateTime, Local};
use itertools::Itertools;
use std::fmt;

const ITEM_PAD: usize = 16;
const NUM_PAD: usize = 8;

/// One tab-separated line per unit: `index, item, main, target, wish`
pub struct Details<'a>(pub &'a [ExpandedUnit]);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in self.0 {
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{}",
                unit.index, unit.item, unit.main_person, unit.target_person, unit.wish
            )?;
        }
        Ok(())
    }
}

/// Quantity and amount per item, sorted by name, with a totals row
pub struct Statistics<'a> {
    expansion: &'a Expansion,
    prices: &'a PriceList,
}

impl<'a> Statistics<'a> {
    pub fn new(expansion: &'a Expansion, prices: &'a PriceList) -> Self {
        Self { expansion, prices }
    }
}

impl fmt::Display for Statistics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:ITEM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$}",
            "Item", "Qty", "Price", "Amount"
        )?;
        for (item, quantity) in &self.expansion.item_quantity {
            let price = self.prices.get(item);
            let amount = self
                .expansion
                .item_amount
                .get(item)
                .copied()
                .unwrap_or_default();
            writeln!(
                f,
                "{item:ITEM_PAD$} | {quantity:>NUM_PAD$} | {price:>NUM_PAD$} | {amount:>NUM_PAD$}"
            )?;
        }
        writeln!(
            f,
            "{:ITEM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$}",
            "Total",
            self.expansion.total_quantity(),
            "-",
            self.expansion.total_amount()
        )
    }
}

/// Orders that repeat an item
pub struct AnomalyReport<'a>(pub &'a [Anomaly]);

impl fmt::Display for AnomalyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No anomalous orders found");
        }
        writeln!(f, "{} anomalous order(s)", self.0.len())?;
        for anomaly in self.0 {
            let duplicates = anomaly.duplicates.iter().join("、");
            let totals = anomaly
                .item_totals
                .iter()
                .map(|(item, quantity)| format!("{item}×{quantity}"))
                .join("、");
            writeln!(
                f,
                "#{} | {} | {} | {} | repeated: {} | {}",
                anomaly.order_index,
                anomaly.items,
                anomaly.main_person,
                anomaly.target_person,
                duplicates,
                totals
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:ITEM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | Status",
            "Item", "System", "Ref", "Diff"
        )?;
        for row in &self.rows {
            let delta = if row.delta > 0 {
                format!("+{}", row.delta)
            } else {
                row.delta.to_string()
            };
            let status = match row.status {
                Status::Matched => "OK",
                Status::Mismatched => "MISMATCH",
            };
            writeln!(
                f,
                "{:ITEM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | {:>NUM_PAD$} | {}",
                row.item, row.system, row.reference, delta, status
            )?;
        }
        if self.is_matched() {
            writeln!(f, "All quantities match")
        } else {
            writeln!(f, "Quantities differ, please check")
        }
    }
}

/// Headline numbers of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub generated_at: DateTime<Local>,
    pub orders: usize,
    pub units: usize,
    pub kinds: usize,
    pub total_amount: Money,
    pub anomalies: usize,
}

impl Summary {
    pub fn new(batch: &Batch, generated_at: DateTime<Local>) -> Self {
        Self {
            generated_at,
            orders: batch.orders.len(),
            units: batch.expansion.units.len(),
            kinds: batch.expansion.item_quantity.len(),
            total_amount: batch.expansion.total_amount(),
            anomalies: batch.expansion.anomalies.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated:    {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Orders:       {}", self.orders)?;
        writeln!(f, "Units:        {}", self.units)?;
        writeln!(f, "Item kinds:   {}", self.kinds)?;
        writeln!(f, "Total amount: {}", self.total_amount)?;
        writeln!(f, "Anomalies:    {}", self.anomalies)
    }
}

/// Summary, details, statistics, optional reconciliation and anomalies
pub struct FullReport<'a> {
    pub batch: &'a Batch,
    pub prices: &'a PriceList,
    pub reconciliation: Option<&'a Reconciliation>,
    pub generated_at: DateTime<Local>,
}

impl fmt::Display for FullReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "---";
        write!(f, "{}", Summary::new(self.batch, self.generated_at))?;
        writeln!(f, "{separator}")?;
        write!(f, "{}", Details(&self.batch.expansion.units))?;
        writeln!(f, "{separator}")?;
        write!(f, "{}", Statistics::new(&self.batch.expansion, self.prices))?;
        if let Some(reconciliation) = self.reconciliation {
            writeln!(f, "{separator}")?;
            write!(f, "{reconciliation}")?;
        }
        writeln!(f, "{separator}")?;
        write!(f, "{}", AnomalyReport(&self.batch.expansion.anomalies))
    }
}
