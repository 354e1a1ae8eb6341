//! Packed lookup tables.
//!
//! One table serves one (symbol set, locale) pair. All texts of the locale
//! are packed into a single blob in run order; the encoding that finds a
//! value's region depends only on the set's run count, so every locale of a
//! set shares the same strategy. Lookups slice string regions and never
//! allocate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{catalog::LocaleCatalog, types::Symbol};

/// Most runs still encoded as a scanned switch; above this a hash map takes
/// over.
pub const MAX_SWITCH_RUNS: usize = 10;

/// Encoding family for one symbol set, decided by its run count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStrategy {
    /// One contiguous run: rebase and index.
    Direct,
    /// Up to [`MAX_SWITCH_RUNS`] runs: linear scan of run bounds.
    Switch,
    /// Sparse values: hash map from value to region.
    Map,
}

impl TableStrategy {
    pub fn for_run_count(count: usize) -> TableStrategy {
        match count {
            1 => TableStrategy::Direct,
            2..=MAX_SWITCH_RUNS => TableStrategy::Switch,
            _ => TableStrategy::Map,
        }
    }
}

/// Offsets into the packed blob, stored at the smallest width that holds the
/// final blob length.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OffsetIndex {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl OffsetIndex {
    fn build(offsets: Vec<u32>, blob_len: usize) -> OffsetIndex {
        if blob_len < 1 << 8 {
            OffsetIndex::U8(offsets.into_iter().map(|o| o as u8).collect())
        } else if blob_len < 1 << 16 {
            OffsetIndex::U16(offsets.into_iter().map(|o| o as u16).collect())
        } else {
            OffsetIndex::U32(offsets)
        }
    }

    fn get(&self, i: usize) -> usize {
        match self {
            OffsetIndex::U8(offsets) => offsets[i] as usize,
            OffsetIndex::U16(offsets) => offsets[i] as usize,
            OffsetIndex::U32(offsets) => offsets[i] as usize,
        }
    }

    fn width(&self) -> u8 {
        match self {
            OffsetIndex::U8(_) => 8,
            OffsetIndex::U16(_) => 16,
            OffsetIndex::U32(_) => 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arm {
    /// Run of one value: equality check against a precomputed region, no
    /// index segment.
    Single { value: u64, start: u32, end: u32 },

    /// Contiguous run: rebase into the offset index at `first`.
    Range { lo: u64, hi: u64, first: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Encoding {
    Direct {
        base: u64,
        len: usize,
        index: OffsetIndex,
    },
    Switch {
        arms: Vec<Arm>,
        index: OffsetIndex,
    },
    Map {
        regions: HashMap<u64, (u32, u32)>,
    },
}

/// The packed texts of one (symbol set, locale) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    signed: bool,
    blob: String,
    encoding: Encoding,
}

impl Table {
    /// Packs `runs` against `catalog`. A symbol whose key is absent
    /// contributes its own name; a present-but-empty value stays empty.
    pub(crate) fn build(runs: &[Vec<Symbol>], catalog: &LocaleCatalog, signed: bool) -> Table {
        let strategy = TableStrategy::for_run_count(runs.len());
        let mut blob = String::new();

        let encoding = match strategy {
            TableStrategy::Direct => {
                let run = &runs[0];
                let mut offsets = Vec::with_capacity(run.len() + 1);
                offsets.push(0u32);
                for symbol in run {
                    blob.push_str(text_for(catalog, symbol));
                    offsets.push(blob.len() as u32);
                }
                Encoding::Direct {
                    base: run[0].value,
                    len: run.len(),
                    index: OffsetIndex::build(offsets, blob.len()),
                }
            }
            TableStrategy::Switch => {
                let mut offsets: Vec<u32> = Vec::new();
                let mut arms = Vec::with_capacity(runs.len());
                for run in runs {
                    if let [symbol] = run.as_slice() {
                        let start = blob.len() as u32;
                        blob.push_str(text_for(catalog, symbol));
                        arms.push(Arm::Single {
                            value: symbol.value,
                            start,
                            end: blob.len() as u32,
                        });
                    } else {
                        let first = offsets.len();
                        offsets.push(blob.len() as u32);
                        for symbol in run {
                            blob.push_str(text_for(catalog, symbol));
                            offsets.push(blob.len() as u32);
                        }
                        arms.push(Arm::Range {
                            lo: run[0].value,
                            hi: run[run.len() - 1].value,
                            first,
                        });
                    }
                }
                Encoding::Switch {
                    arms,
                    index: OffsetIndex::build(offsets, blob.len()),
                }
            }
            TableStrategy::Map => {
                let mut regions = HashMap::new();
                for run in runs {
                    for symbol in run {
                        let start = blob.len() as u32;
                        blob.push_str(text_for(catalog, symbol));
                        regions.insert(symbol.value, (start, blob.len() as u32));
                    }
                }
                Encoding::Map { regions }
            }
        };

        Table {
            signed,
            blob,
            encoding,
        }
    }

    /// Returns the text region for `value`, or `None` when the value is not
    /// part of the set. Never allocates.
    pub fn lookup(&self, value: u64) -> Option<&str> {
        match &self.encoding {
            Encoding::Direct { base, len, index } => {
                let i = rebase(value, *base, self.signed)?;
                if i >= *len {
                    return None;
                }
                Some(&self.blob[index.get(i)..index.get(i + 1)])
            }
            Encoding::Switch { arms, index } => {
                for arm in arms {
                    match arm {
                        Arm::Single { value: v, start, end } => {
                            if value == *v {
                                return Some(&self.blob[*start as usize..*end as usize]);
                            }
                        }
                        Arm::Range { lo, hi, first } => {
                            if in_range(value, *lo, *hi, self.signed) {
                                let i = first + value.wrapping_sub(*lo) as usize;
                                return Some(&self.blob[index.get(i)..index.get(i + 1)]);
                            }
                        }
                    }
                }
                None
            }
            Encoding::Map { regions } => regions
                .get(&value)
                .map(|(start, end)| &self.blob[*start as usize..*end as usize]),
        }
    }

    pub fn strategy(&self) -> TableStrategy {
        match &self.encoding {
            Encoding::Direct { .. } => TableStrategy::Direct,
            Encoding::Switch { .. } => TableStrategy::Switch,
            Encoding::Map { .. } => TableStrategy::Map,
        }
    }

    /// Width in bits of the offset index, when the encoding carries one.
    pub fn offset_width(&self) -> Option<u8> {
        match &self.encoding {
            Encoding::Direct { index, .. } | Encoding::Switch { index, .. } => Some(index.width()),
            Encoding::Map { .. } => None,
        }
    }

    /// Total bytes of packed text.
    pub fn blob_len(&self) -> usize {
        self.blob.len()
    }
}

fn text_for<'a>(catalog: &'a LocaleCatalog, symbol: &'a Symbol) -> &'a str {
    catalog.get(&symbol.name).unwrap_or(&symbol.name)
}

/// Distance of `value` above `base` under the set's signedness; `None` when
/// below it or out of address range.
fn rebase(value: u64, base: u64, signed: bool) -> Option<usize> {
    let offset = if signed {
        (value as i64 as i128) - (base as i64 as i128)
    } else {
        (value as i128) - (base as i128)
    };
    if offset < 0 {
        return None;
    }
    usize::try_from(offset).ok()
}

fn in_range(value: u64, lo: u64, hi: u64, signed: bool) -> bool {
    if signed {
        let v = value as i64;
        (lo as i64) <= v && v <= (hi as i64)
    } else {
        lo <= value && value <= hi
    }
}
