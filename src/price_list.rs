use super::money::Money;
use std::collections::HashMap;

/// The shop's standard items and their unit prices
const DEFAULT_PRICES: &[(&str, u64)] = &[
    ("大鬼鎖心", 220),
    ("雙色直立燕通", 300),
    ("徐柱老人", 300),
    ("孔雀王祈願蠟燭", 120),
    ("藥師佛", 350),
    ("象神", 260),
    ("拆散", 250),
    ("拉胡", 260),
    ("三色蠟燭", 450),
    ("財神爺", 300),
    ("大鬼頭", 260),
    ("三鬼頭", 300),
    ("超大鬼頭", 380),
    ("燕通", 300),
    ("招財女神", 300),
    ("人緣鳥", 260),
    ("水龍", 350),
    ("二哥豐", 300),
    ("愛神", 300),
    ("懲罰", 300),
    ("巴拉迪燕通", 300),
    ("行走佛", 300),
    ("依霸", 300),
    ("直立大鬼", 290),
    ("鬼王", 250),
    ("帕猜佛蠟燭", 450),
    ("紅眼帕嬰", 280),
];

/// Static name -> unit price lookup.
///
/// Names missing from the list price at zero so a single unknown item never
/// blocks a batch; it shows up as a `$0` row instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceList(HashMap<String, Money>);

impl PriceList {
    pub fn new() -> Self {
        PriceList(HashMap::with_capacity(32))
    }

    pub fn get(&self, name: &str) -> Money {
        self.0.get(name).copied().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn set_price(&mut self, name: &str, price: Money) -> &mut Self {
        self.0.insert(name.to_owned(), price);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PriceList {
    fn default() -> Self {
        DEFAULT_PRICES
            .iter()
            .map(|(name, price)| (name.to_string(), Money(*price)))
            .collect()
    }
}

impl FromIterator<(String, Money)> for PriceList {
    fn from_iter<I: IntoIterator<Item = (String, Money)>>(iter: I) -> Self {
        PriceList(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod price_list_tests {
    use super::*;

    #[test]
    fn default_prices() {
        let prices = PriceList::default();
        assert_eq!(prices.len(), 27);
        assert_eq!(prices.get("鬼王"), Money(250));
        assert_eq!(prices.get("三鬼頭"), Money(300));
    }

    #[test]
    fn unknown_item_is_free() {
        let mut prices = PriceList::new();
        prices.set_price("A", Money(10));
        assert_eq!(prices.get("A"), Money(10));
        assert_eq!(prices.get("B"), Money::zero());
        assert!(!prices.contains("B"));
    }
}
