//! Turns pasted order text into [`OrderRecord`]s.
//!
//! Two dialects are accepted and the caller picks one, nothing is detected:
//!
//! * [`Dialect::Tabbed`]: one order per line, `items<TAB>main<TAB>target<TAB>wish`,
//!   with short rows repaired from the lines that follow.
//! * [`Dialect::Multiline`]: one order over several lines, item line first,
//!   then person lines, then a wish line.
//!
//! Parsing never fails. Rows that cannot be made into an order are dropped.

pub mod multiline;
pub mod tabbed;

use crate::config::WishMarkers;
use crate::order::OrderRecord;
use anyhow::{Error, Result, bail};
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

// optional non-digit run, then a quantity marker and digits: `鬼王x2`, `三鬼頭 * 4`
static ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\d]*?[xX×*]\s*\d+").expect("hardcoded regex should be valid")
});

/// Line looks like the item line that opens an order
pub fn is_item_line(line: &str) -> bool {
    ITEM_LINE.is_match(line.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Tabbed,
    Multiline,
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tabbed" | "tab" => Ok(Dialect::Tabbed),
            "multiline" | "multi" => Ok(Dialect::Multiline),
            other => bail!("{} not a valid dialect", other),
        }
    }
}

/// Parses `text` in the given dialect
pub fn parse(text: &str, dialect: Dialect, markers: &WishMarkers) -> Vec<OrderRecord> {
    let orders = match dialect {
        Dialect::Tabbed => tabbed::parse(text, markers),
        Dialect::Multiline => multiline::parse(text, markers),
    };
    tracing::debug!(?dialect, orders = orders.len(), "parsed order text");
    orders
}
