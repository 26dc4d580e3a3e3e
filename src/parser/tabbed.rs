//! Tab-delimited dialect: `items<TAB>main person<TAB>target person<TAB>wish`.

use super::is_item_line;
use crate::config::WishMarkers;
use crate::order::{ABSENT, OrderRecord, Person};
use regex::Regex;
use std::sync::LazyLock;

const COLUMNS: usize = 4;

// `鬼王 x 2`, `鬼王x2 + 三鬼頭x1`, `鬼王x2、蠟燭` at the start of a column
static LEADING_ITEMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\d+、,，]*?[xX×*]\s*\d+(?:\s*[+、,，]\s*[^\s+、,，]+(?:\s*[xX×*]\s*\d+)?)*")
        .expect("hardcoded regex should be valid")
});

pub fn parse(text: &str, markers: &WishMarkers) -> Vec<OrderRecord> {
    let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
    let mut orders = Vec::new();
    let mut next = 0;

    while next < lines.len() {
        let line_no = next + 1;
        let line = lines[next];
        next += 1;
        if line.is_empty() {
            continue;
        }

        let mut columns = split_columns(line);
        let single_column = columns.len() == 1;
        if single_column {
            // leftover wish from an order that was already closed
            if markers.starts_with_wish(&columns[0]) {
                tracing::trace!(line_no, "skipping orphaned wish line");
                continue;
            }
            columns = split_single_column(&columns[0]);
        }

        let before = next;
        next = repair(&lines, next, &mut columns, single_column, markers);
        if next > before {
            tracing::trace!(line_no, merged = next - before, "merged following lines into row");
        }

        match to_record(orders.len() + 1, &columns) {
            Some(order) => orders.push(order),
            None => tracing::debug!(line_no, ?columns, "dropping row with too few columns"),
        }
    }
    orders
}

fn split_columns(line: &str) -> Vec<String> {
    line.split('\t')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// `鬼王 x 2 王小明 1990/1/1` -> `[鬼王 x 2, 王小明 1990/1/1]`
///
/// The item expression is taken as far as it reaches, falling back to the
/// first whitespace when the column has no quantity marker.
fn split_single_column(column: &str) -> Vec<String> {
    if let Some(m) = LEADING_ITEMS.find(column) {
        let rest = column[m.end()..].trim();
        return if rest.is_empty() {
            vec![column.to_owned()]
        } else {
            vec![m.as_str().trim_end().to_owned(), rest.to_owned()]
        };
    }
    let tokens: Vec<&str> = column.split_whitespace().collect();
    match tokens.as_slice() {
        [items, rest @ ..] if !rest.is_empty() => vec![items.to_string(), rest.join(" ")],
        _ => vec![column.to_owned()],
    }
}

/// Fills a short row from the lines after it. Returns the index of the first
/// line not consumed.
fn repair(
    lines: &[&str],
    mut next: usize,
    columns: &mut Vec<String>,
    single_column: bool,
    markers: &WishMarkers,
) -> usize {
    while columns.len() < COLUMNS && next < lines.len() {
        let line = lines[next];
        if line.is_empty() {
            if single_column {
                next += 1;
                continue;
            }
            break;
        }
        // start of the next order
        if is_item_line(line) || line.contains('\t') {
            break;
        }
        let wish = markers.starts_with_wish(line);
        // a wish right after the main person goes to the wish column
        if wish && columns.len() == 2 {
            columns.push(ABSENT.to_owned());
        }
        columns.push(line.to_owned());
        next += 1;
        if wish {
            break;
        }
    }
    next
}

fn to_record(index: usize, columns: &[String]) -> Option<OrderRecord> {
    match columns {
        [items, main, rest @ ..] => OrderRecord::new(
            index,
            items,
            Person::parse(main),
            rest.first().map_or(Person::Absent, |c| Person::parse(c)),
            rest.get(1).map_or("", String::as_str),
        ),
        _ => None,
    }
}
