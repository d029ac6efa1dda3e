//! Translation table: source ranges and the shift to apply inside them

use std::fmt;

use super::validate::ValidatedLayout;
use crate::domain::Shift;

/// One relocated source range
///
/// `src_end` is inclusive: the end address recorded by the listing is itself
/// treated as relocatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationEntry {
    pub src_start: u64,
    pub src_end: u64,
    pub shift: Shift,
}

impl TranslationEntry {
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        self.src_start <= value && value <= self.src_end
    }

    /// Relocate a value (modulo 2^64; callers truncate to their word width)
    #[must_use]
    pub fn apply(&self, value: u64) -> u64 {
        self.shift.apply(value)
    }
}

impl fmt::Display for TranslationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}..={:#x} shift {}", self.src_start, self.src_end, self.shift)
    }
}

/// Ordered, non-overlapping translation entries
///
/// Lookup is a linear first-match scan, which is plenty for the tens of
/// libraries a process maps.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
}

impl TranslationTable {
    /// Build one entry per matched region pair, groups ordered by key
    #[must_use]
    pub fn from_layout(layout: &ValidatedLayout) -> Self {
        let entries = layout
            .sorted_groups()
            .into_iter()
            .flat_map(|group| group.pairs.iter())
            .map(|(src, dst)| TranslationEntry {
                src_start: src.start,
                src_end: src.end,
                shift: Shift::between(src.start, dst.start),
            })
            .collect();
        Self { entries }
    }

    /// First entry whose inclusive range holds `value`
    #[must_use]
    pub fn lookup(&self, value: u64) -> Option<&TranslationEntry> {
        self.entries.iter().find(|entry| entry.contains(value))
    }

    /// Relocated value, or `None` if `value` is outside every range
    #[must_use]
    pub fn translate(&self, value: u64) -> Option<u64> {
        self.lookup(value).map(|entry| entry.apply(value))
    }

    #[must_use]
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TranslationEntry> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = TranslationEntry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
