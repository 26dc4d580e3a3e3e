use crate::expand::Expansion;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n、,，]").expect("hardcoded regex should be valid"));

// tried in order, first match wins
static NAME_MARKER_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*[xX×*]\s*(\d+)$").expect("hardcoded regex should be valid")
});
static QUANTITY_UNIT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*支\s*(.+)$").expect("hardcoded regex should be valid")
});
static NAME_QUANTITY_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*(\d+)\s*支?$").expect("hardcoded regex should be valid")
});

/// Item counts from an outside source, e.g. `87支鬼王、三鬼頭 101 支`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reference(pub BTreeMap<String, u64>);

impl Reference {
    /// A count too large for `u64` counts as no match for that pattern
    fn parse_fragment(fragment: &str) -> Option<(String, u64)> {
        if let Some(caps) = NAME_MARKER_QUANTITY.captures(fragment)
            && let Ok(quantity) = caps[2].parse()
        {
            return Some((caps[1].trim().to_owned(), quantity));
        }
        if let Some(caps) = QUANTITY_UNIT_NAME.captures(fragment)
            && let Ok(quantity) = caps[1].parse()
        {
            return Some((caps[2].trim().to_owned(), quantity));
        }
        if let Some(caps) = NAME_QUANTITY_UNIT.captures(fragment)
            && let Ok(quantity) = caps[2].parse()
        {
            return Some((caps[1].trim().to_owned(), quantity));
        }
        None
    }

    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or_default()
    }
}

/// Never fails, fragments that match no pattern are skipped
impl FromStr for Reference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut counts = BTreeMap::new();
        for fragment in SEPARATORS.split(s).map(str::trim).filter(|f| !f.is_empty()) {
            match Self::parse_fragment(fragment) {
                // a later count for the same item replaces the earlier one
                Some((name, quantity)) => {
                    counts.insert(name, quantity);
                }
                None => tracing::debug!(fragment, "ignoring unreadable reference fragment"),
            }
        }
        Ok(Reference(counts))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Matched,
    Mismatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRow {
    pub item: String,
    pub system: u64,
    pub reference: u64,
    /// system minus reference, clamped to the `i64` range
    pub delta: i64,
    pub status: Status,
}

fn delta(system: u64, reference: u64) -> i64 {
    let difference = i128::from(system) - i128::from(reference);
    i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}

/// Per-item comparison of computed quantities against a [`Reference`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub rows: Vec<ReconciliationRow>,
}

impl Reconciliation {
    /// Compares every item known to either side, sorted by name
    pub fn new(system: &BTreeMap<String, u64>, reference: &Reference) -> Self {
        let names: BTreeSet<&String> = system.keys().chain(reference.0.keys()).collect();
        let rows = names
            .into_iter()
            .map(|name| {
                let system = system.get(name).copied().unwrap_or_default();
                let reference = reference.get(name);
                let delta = delta(system, reference);
                ReconciliationRow {
                    item: name.clone(),
                    system,
                    reference,
                    delta,
                    status: if delta == 0 {
                        Status::Matched
                    } else {
                        Status::Mismatched
                    },
                }
            })
            .collect();
        Reconciliation { rows }
    }

    pub fn from_expansion(expansion: &Expansion, reference: &Reference) -> Self {
        Self::new(&expansion.item_quantity, reference)
    }

    pub fn is_matched(&self) -> bool {
        self.rows.iter().all(|row| row.status == Status::Matched)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &ReconciliationRow> {
        self.rows
            .iter()
            .filter(|row| row.status == Status::Mismatched)
    }
}

#[cfg(test)]
mod reconcile_tests {
    use super::*;
    use indoc::indoc;

    fn reference(text: &str) -> Reference {
        match text.parse() {
            Ok(reference) => reference,
            Err(never) => match never {},
        }
    }

    #[test]
    fn reference_patterns() {
        let parsed = reference("三鬼頭x121、87支鬼王，大鬼頭 101 支,水龍 5");
        dbg!(&parsed);
        assert_eq!(
            parsed,
            Reference(BTreeMap::from([
                ("三鬼頭".to_string(), 121),
                ("鬼王".to_string(), 87),
                ("大鬼頭".to_string(), 101),
                ("水龍".to_string(), 5),
            ]))
        );
    }

    #[test]
    fn reference_lines_and_junk() {
        let parsed = reference(indoc! {"
            鬼王 x 3
            not a count

            象神2支
            鬼王*4
        "});
        assert_eq!(parsed.get("鬼王"), 4);
        assert_eq!(parsed.get("象神"), 2);
        assert_eq!(parsed.0.len(), 2);
        assert_eq!(parsed.get("unknown"), 0);
    }

    #[test]
    fn marker_pattern_checked_first() {
        // would read as name `A x`, quantity 12 under the last pattern
        assert_eq!(reference("A x12").0, BTreeMap::from([("A".to_string(), 12)]));
    }

    #[test]
    fn reconcile_union_of_names() {
        let system = BTreeMap::from([("A".to_string(), 3), ("B".to_string(), 2)]);
        let reconciliation = Reconciliation::new(&system, &reference("A x3、C x1、B x5"));
        dbg!(&reconciliation);
        assert_eq!(
            reconciliation.rows,
            vec![
                ReconciliationRow {
                    item: "A".to_string(),
                    system: 3,
                    reference: 3,
                    delta: 0,
                    status: Status::Matched,
                },
                ReconciliationRow {
                    item: "B".to_string(),
                    system: 2,
                    reference: 5,
                    delta: -3,
                    status: Status::Mismatched,
                },
                ReconciliationRow {
                    item: "C".to_string(),
                    system: 0,
                    reference: 1,
                    delta: -1,
                    status: Status::Mismatched,
                },
            ]
        );
        assert!(!reconciliation.is_matched());
        assert_eq!(reconciliation.mismatches().count(), 2);
    }

    #[test]
    fn huge_reference_counts() {
        let parsed = reference("A x9223372036854775808、B x18446744073709551615");
        assert_eq!(parsed.get("A"), 9223372036854775808);
        assert_eq!(parsed.get("B"), u64::MAX);

        let system = BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 0)]);
        let reconciliation = Reconciliation::new(&system, &parsed);
        dbg!(&reconciliation);
        assert_eq!(reconciliation.rows[0].delta, -i64::MAX);
        assert_eq!(reconciliation.rows[1].delta, i64::MIN);
        assert_eq!(reconciliation.mismatches().count(), 2);

        let reversed = Reconciliation::new(
            &BTreeMap::from([("B".to_string(), u64::MAX)]),
            &Reference::default(),
        );
        assert_eq!(reversed.rows[0].delta, i64::MAX);
        assert_eq!(reversed.rows[0].status, Status::Mismatched);
    }

    #[test]
    fn overflowing_count_falls_through() {
        // too large for every pattern, so the fragment is skipped
        assert_eq!(reference("A x99999999999999999999999").0.len(), 0);
        assert_eq!(reference("99999999999999999999999支A、B 2").get("B"), 2);
    }

    #[test]
    fn reconcile_all_matched() {
        let system = BTreeMap::from([("A".to_string(), 3)]);
        assert!(Reconciliation::new(&system, &reference("3支A")).is_matched());
        assert!(Reconciliation::new(&BTreeMap::new(), &Reference::default()).is_matched());
    }
}
