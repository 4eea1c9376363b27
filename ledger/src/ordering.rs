//! Display ordering of the badge set.
//!
//! Badges are kept in descending serial order. The comparator is chosen once
//! per sort: numeric when every serial is an integer, lexicographic for the
//! whole set as soon as one serial is not.

use badged_types::Badge;

/// Which comparator a sort used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerialOrder {
    Numeric,
    Lexicographic,
}

/// Sort `badges` by descending serial, returning the comparator used.
///
/// The sort is stable, so badges whose serials compare equal (`"7"` and
/// `"07"`) keep their relative order.
pub fn sort_descending(badges: &mut [Badge]) -> SerialOrder {
    let numeric: Option<Vec<i128>> = badges.iter().map(|b| b.serial.as_number()).collect();
    match numeric {
        Some(_) => {
            badges.sort_by_key(|b| std::cmp::Reverse(b.serial.as_number()));
            SerialOrder::Numeric
        }
        None => {
            badges.sort_by(|a, b| b.serial.as_str().cmp(a.serial.as_str()));
            SerialOrder::Lexicographic
        }
    }
}
