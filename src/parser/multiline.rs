//! Multi-line dialect. An order spans several lines with no delimiter:
//!
//! ```text
//! 鬼王x2
//! 王小明 1988/6/30
//! 陳美麗 1990/1/1
//! 願望：事業順利
//! ```
//!
//! Orders are separated by blank lines, or by a new item line once the
//! current order already has its wish line.

use super::is_item_line;
use crate::config::WishMarkers;
use crate::order::{OrderRecord, Person};

/// Where the line buffer is in the life of an order
#[derive(Debug, Clone, PartialEq, Eq)]
enum State<'a> {
    Empty,
    /// Lines of an order without a wish line yet. Item lines cannot end the
    /// order here, they may still belong to it.
    AwaitingWish(Vec<&'a str>),
    /// Order has its wish line. The next item line starts a new order.
    Accumulating(Vec<&'a str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Item,
    Text,
}

/// Splits text into the line groups of individual orders
struct Splitter<'a, 'm> {
    markers: &'m WishMarkers,
    state: State<'a>,
    groups: Vec<Vec<&'a str>>,
}

impl<'a, 'm> Splitter<'a, 'm> {
    fn new(markers: &'m WishMarkers) -> Self {
        Self {
            markers,
            state: State::Empty,
            groups: Vec::new(),
        }
    }

    fn classify(line: &str) -> LineKind {
        if line.is_empty() {
            LineKind::Blank
        } else if is_item_line(line) {
            LineKind::Item
        } else {
            LineKind::Text
        }
    }

    fn open(&self, line: &'a str) -> State<'a> {
        if self.markers.is_wish(line) {
            State::Accumulating(vec![line])
        } else {
            State::AwaitingWish(vec![line])
        }
    }

    fn push(&mut self, line: &'a str) {
        let kind = Self::classify(line);
        let state = std::mem::replace(&mut self.state, State::Empty);
        self.state = match (state, kind) {
            (State::Empty, LineKind::Blank) => State::Empty,
            (State::Empty, _) => self.open(line),
            (State::AwaitingWish(lines) | State::Accumulating(lines), LineKind::Blank) => {
                self.flush(lines);
                State::Empty
            }
            (State::AwaitingWish(mut lines), _) => {
                lines.push(line);
                if self.markers.is_wish(line) {
                    State::Accumulating(lines)
                } else {
                    State::AwaitingWish(lines)
                }
            }
            (State::Accumulating(lines), LineKind::Item) => {
                tracing::trace!(line, "item line after wish starts a new order");
                self.flush(lines);
                self.open(line)
            }
            (State::Accumulating(mut lines), LineKind::Text) => {
                lines.push(line);
                State::Accumulating(lines)
            }
        };
    }

    fn flush(&mut self, lines: Vec<&'a str>) {
        if !lines.is_empty() {
            self.groups.push(lines);
        }
    }

    fn finish(mut self) -> Vec<Vec<&'a str>> {
        match std::mem::replace(&mut self.state, State::Empty) {
            State::Empty => {}
            State::AwaitingWish(lines) | State::Accumulating(lines) => self.flush(lines),
        }
        self.groups
    }
}

pub fn parse(text: &str, markers: &WishMarkers) -> Vec<OrderRecord> {
    let mut splitter = Splitter::new(markers);
    text.lines().map(str::trim).for_each(|line| splitter.push(line));

    let mut orders = Vec::new();
    for lines in splitter.finish() {
        match to_record(orders.len() + 1, &lines, markers) {
            Some(order) => orders.push(order),
            None => tracing::debug!(?lines, "dropping order with fewer than two lines"),
        }
    }
    orders
}

fn to_record(index: usize, lines: &[&str], markers: &WishMarkers) -> Option<OrderRecord> {
    let (items, rest) = match lines {
        [items, rest @ ..] if !rest.is_empty() => (*items, rest),
        _ => return None,
    };

    let (persons, wish) = match rest.iter().position(|line| markers.is_wish(line)) {
        Some(at) => {
            // lines after the wish line continue the wish
            let wish = markers
                .wish_text(rest[at])
                .into_iter()
                .chain(rest[at + 1..].iter().copied())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (&rest[..at], wish)
        }
        None => (rest, String::new()),
    };

    let person = |at: usize| persons.get(at).map_or(Person::Absent, |line| Person::parse(line));
    OrderRecord::new(index, items, person(0), person(1), &wish)
}

/// Re-renders multi-line orders as tab-delimited lines, one per order
pub fn to_tabbed(orders: &[OrderRecord]) -> String {
    orders
        .iter()
        .map(OrderRecord::to_tabbed)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod multiline_tests {
    use super::*;
    use indoc::indoc;

    fn parse_default(text: &str) -> Vec<OrderRecord> {
        parse(text, &WishMarkers::default())
    }

    #[test]
    fn single_order() {
        let text = indoc! {"
            鬼王x2+三鬼頭x1
            王小明 1988/6/30
            陳美麗 1990-1-1
            願望：事業順利
        "};
        let orders = parse_default(text);
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.items, "鬼王x2+三鬼頭x1");
        assert_eq!(order.main_person.to_string(), "王小明/1988.6.30");
        assert_eq!(order.target_person.to_string(), "陳美麗/1990.1.1");
        assert_eq!(order.wish, "事業順利");
    }

    #[test]
    fn stacked_orders_split_after_wish() {
        let orders = parse_default("A x1\nP1 1990/1/1\nWish: x\nB x2\nP2 1991/2/2\nWish: y");
        dbg!(&orders);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].items, "A x1");
        assert_eq!(orders[0].wish, "x");
        assert_eq!(orders[1].index, 2);
        assert_eq!(orders[1].items, "B x2");
        assert_eq!(orders[1].main_person.to_string(), "P2/1991.2.2");
        assert_eq!(orders[1].wish, "y");
    }

    #[test]
    fn item_line_before_wish_stays_in_order() {
        let text = indoc! {"
            A x1
            B x2
            P1 1990/1/1
            Wish: x
        "};
        let orders = parse_default(text);
        dbg!(&orders);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items, "A x1");
        assert_eq!(orders[0].main_person.to_string(), "B x2");
        assert_eq!(orders[0].target_person.to_string(), "P1/1990.1.1");
    }

    #[test]
    fn names_containing_marker_letters_are_persons() {
        let text = indoc! {"
            鬼王x1
            Swisher 1990/1/1
            陳美麗
            願望：平安
        "};
        let orders = parse_default(text);
        dbg!(&orders);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].main_person.to_string(), "Swisher/1990.1.1");
        assert_eq!(orders[0].target_person.to_string(), "陳美麗");
        assert_eq!(orders[0].wish, "平安");
    }

    #[test]
    fn blank_lines_separate_orders() {
        let text = indoc! {"
            A x1
            P1


            B x2
            P2
            T2
        "};
        let orders = parse_default(text);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].target_person, Person::Absent);
        assert_eq!(orders[0].wish, "");
        assert_eq!(orders[1].target_person.to_string(), "T2");
    }

    #[test]
    fn wish_continues_over_lines() {
        let text = indoc! {"
            A x1
            P1 1990/1/1
            願望：身體健康
            萬事如意
            C x3
            P3
        "};
        let orders = parse_default(text);
        dbg!(&orders);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].wish, "身體健康 萬事如意");
        assert_eq!(orders[0].target_person, Person::Absent);
        assert_eq!(orders[1].items, "C x3");
    }

    #[test]
    fn short_groups_dropped() {
        let text = indoc! {"
            A x1

            B x2
            P2
        "};
        let orders = parse_default(text);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].index, 1);
        assert_eq!(orders[0].items, "B x2");
        assert!(parse_default("").is_empty());
    }

    #[test]
    fn converts_to_tabbed() {
        let orders = parse_default("A x1\nP1 1990/1/1\nWish: x\nB x2\nP2\nWish: y");
        assert_eq!(to_tabbed(&orders), "A x1\tP1/1990.1.1\t—\tx\nB x2\tP2\t—\ty");
    }
}
