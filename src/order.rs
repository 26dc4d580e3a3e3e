use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Shown wherever a person field was never given
pub const ABSENT: &str = "—";

// name, then a date starting with a 4 digit year: 1988/6/30, 1988.6.30, 1988-6-30, 19880630
static PERSON_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*(\d{4}[/.\-]?\d{1,2}[/.\-]?\d{1,2})$")
        .expect("hardcoded regex should be valid")
});

/// A person field of an order, e.g. the buyer or the person the order is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Person {
    /// Name followed by a recognized date, date separators normalized to `.`
    Parsed { name: String, date: String },
    /// Free text kept as given
    Unparsed { raw: String },
    Absent,
}

impl Person {
    /// Splits a trailing date off a person line. Never fails, falling back to
    /// the verbatim text.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() || line == ABSENT {
            return Person::Absent;
        }
        if let Some(caps) = PERSON_DATE.captures(line) {
            // `name/1990.1.1` is already normalized, drop the separator
            let name = caps[1].trim().trim_end_matches('/').trim_end();
            if !name.is_empty() {
                return Person::Parsed {
                    name: name.to_owned(),
                    date: caps[2].replace(['/', '-'], "."),
                };
            }
        }
        Person::Unparsed {
            raw: line.to_owned(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Person::Parsed { .. })
    }
}

impl Default for Person {
    fn default() -> Self {
        Person::Absent
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Person::Parsed { name, date } => write!(f, "{name}/{date}"),
            Person::Unparsed { raw } => f.write_str(raw),
            Person::Absent => f.write_str(ABSENT),
        }
    }
}

/// One order as entered, before its items are expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    /// 1-based position in the batch
    pub index: usize,
    pub items: String,
    pub main_person: Person,
    pub target_person: Person,
    pub wish: String,
}

impl OrderRecord {
    /// Returns `None` if there is no item text, which no order can be without.
    pub fn new(
        index: usize,
        items: &str,
        main_person: Person,
        target_person: Person,
        wish: &str,
    ) -> Option<Self> {
        let items = items.trim();
        if items.is_empty() {
            return None;
        }
        Some(OrderRecord {
            index,
            items: items.to_owned(),
            main_person,
            target_person,
            wish: wish.to_owned(),
        })
    }

    /// Renders as one tab-delimited line: `items, main, target, wish`
    pub fn to_tabbed(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.items, self.main_person, self.target_person, self.wish
        )
    }
}

#[cfg(test)]
mod order_tests {
    use super::*;

    fn parsed(name: &str, date: &str) -> Person {
        Person::Parsed {
            name: name.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn person_parse_dates() {
        assert_eq!(Person::parse("王小明 1988/6/30"), parsed("王小明", "1988.6.30"));
        assert_eq!(Person::parse("王小明1988-6-30"), parsed("王小明", "1988.6.30"));
        assert_eq!(Person::parse("陳大文 1990.12.01"), parsed("陳大文", "1990.12.01"));
        assert_eq!(Person::parse("李四 19900101"), parsed("李四", "19900101"));
        assert_eq!(Person::parse("P1 1990/1/1").to_string(), "P1/1990.1.1");
    }

    #[test]
    fn person_already_normalized() {
        let person = Person::parse("王小明/1988.6.30");
        assert_eq!(person, parsed("王小明", "1988.6.30"));
        assert_eq!(person.to_string(), "王小明/1988.6.30");
    }

    #[test]
    fn person_falls_back_to_raw() {
        let person = Person::parse(" 王小明 ");
        assert_eq!(
            person,
            Person::Unparsed {
                raw: "王小明".to_string()
            }
        );
        assert!(!person.is_parsed());
        assert_eq!(person.to_string(), "王小明");
        // date only, nothing left for a name
        assert!(!Person::parse("/1990/1/1").is_parsed());
        assert_eq!(Person::parse(""), Person::Absent);
        assert_eq!(Person::Absent.to_string(), "—");
    }

    #[test]
    fn record_requires_items() {
        assert!(OrderRecord::new(1, "  ", Person::Absent, Person::Absent, "").is_none());
        let record = OrderRecord::new(
            1,
            "鬼王x2",
            Person::parse("王小明 1988/6/30"),
            Person::Absent,
            "發財",
        );
        assert_eq!(
            record.map(|r| r.to_tabbed()),
            Some("鬼王x2\t王小明/1988.6.30\t—\t發財".to_string())
        );
    }
}
