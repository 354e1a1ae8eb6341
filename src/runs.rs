//! Run splitting.
//!
//! Table layout starts from the ascending runs of contiguous symbol values.
//! Sorting is stable so the first-declared name wins among symbols sharing a
//! value, and comparison signedness is decided once for the whole set.

use crate::types::Symbol;

/// Splits symbols into ascending runs of contiguous distinct values.
///
/// The input is sorted by value (signed comparison when any member of the set
/// is signed, unsigned otherwise), duplicate values collapse to the
/// first-declared symbol, and a run ends wherever the next value is not
/// exactly one above the previous.
pub fn split_into_runs(mut symbols: Vec<Symbol>) -> Vec<Vec<Symbol>> {
    let signed = symbols.iter().any(|s| s.signed);
    if signed {
        symbols.sort_by_key(|s| s.value as i64);
    } else {
        symbols.sort_by_key(|s| s.value);
    }
    symbols.dedup_by(|next, prev| next.value == prev.value);

    let mut runs: Vec<Vec<Symbol>> = Vec::new();
    for symbol in symbols {
        match runs.last_mut() {
            Some(run)
                if run
                    .last()
                    .is_some_and(|prev| prev.value.wrapping_add(1) == symbol.value) =>
            {
                run.push(symbol)
            }
            _ => runs.push(vec![symbol]),
        }
    }
    runs
}
