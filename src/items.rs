use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+、,，]").expect("hardcoded regex should be valid"));

// `鬼王x3`, `鬼王 x 3`, `鬼王*3`, `鬼王×3`
static WITH_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.+?)\s*[xX×*]\s*(\d+)").expect("hardcoded regex should be valid")
});

// `鬼王 3`, at most 3 digits so a trailing year is not read as a quantity
static SPACE_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(\d{1,3})$").expect("hardcoded regex should be valid")
});

/// An item name and how many of it were ordered
pub type LineItem = (String, u32);

/// Splits an order's item text into `(name, quantity)` pairs, in order.
///
/// `"鬼王x2+三鬼頭 x 4"` -> `[("鬼王", 2), ("三鬼頭", 4)]`. A fragment without
/// any recognizable quantity counts as one of itself.
pub fn extract_items(items: &str) -> Vec<LineItem> {
    SEPARATORS
        .split(items)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            with_marker(fragment)
                .or_else(|| space_separated(fragment))
                .unwrap_or_else(|| (fragment.to_owned(), 1))
        })
        .collect()
}

fn with_marker(fragment: &str) -> Option<LineItem> {
    let caps = WITH_MARKER.captures(fragment)?;
    let quantity = caps[2].parse().ok()?;
    Some((caps[1].trim().to_owned(), quantity))
}

fn space_separated(fragment: &str) -> Option<LineItem> {
    let caps = SPACE_SEPARATED.captures(fragment)?;
    let name = caps[1].trim();
    let quantity: u32 = caps[2].parse().ok()?;
    if name.is_empty() || !(1..=999).contains(&quantity) {
        return None;
    }
    Some((name.to_owned(), quantity))
}
