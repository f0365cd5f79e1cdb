use rust_decimal::Decimal;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Area, Expense};

/// Lower-case `text` and strip diacritics, so "Café", "cafe" and "CAFÉ" compare equal.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Keyword matcher over a fixed slice of areas. Keywords are normalized once up front.
pub(crate) struct AreaMatcher<'a> {
    areas: &'a [Area],
    keywords: Vec<Vec<String>>,
}

impl<'a> AreaMatcher<'a> {
    pub(crate) fn new(areas: &'a [Area]) -> Self {
        let keywords = areas
            .iter()
            .map(|area| {
                area.keywords
                    .iter()
                    // A blank keyword would be a substring of every text.
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| normalize(k))
                    .collect()
            })
            .collect();
        Self { areas, keywords }
    }

    /// Index of the highest-priority area with a keyword contained in `text`.
    /// Ties go to the area that comes first in input order.
    pub(crate) fn match_index(&self, text: &str) -> Option<usize> {
        let normalized = normalize(text);
        let mut best: Option<usize> = None;

        for (idx, keywords) in self.keywords.iter().enumerate() {
            if !keywords.iter().any(|k| normalized.contains(k.as_str())) {
                continue;
            }
            let wins = match best {
                Some(b) => self.areas[idx].priority > self.areas[b].priority,
                None => true,
            };
            if wins {
                best = Some(idx);
            }
        }

        best
    }

    pub(crate) fn match_text(&self, text: &str) -> Option<&'a Area> {
        self.match_index(text).map(|idx| &self.areas[idx])
    }
}

/// One-shot form of [`AreaMatcher::match_text`].
pub(crate) fn match_to_area<'a>(text: &str, areas: &'a [Area]) -> Option<&'a Area> {
    AreaMatcher::new(areas).match_text(text)
}

/// Records partitioned by area. `by_area[i]` holds the records matched to `areas[i]`.
#[derive(Debug)]
pub(crate) struct Grouped<'r, T> {
    pub(crate) by_area: Vec<Vec<&'r T>>,
    pub(crate) unassigned: Vec<&'r T>,
}

/// Partition `records` by matched area. Every area gets a bucket, even if it stays empty.
pub(crate) fn group_by_area<'r, T, F>(
    records: &'r [T],
    areas: &[Area],
    text_of: F,
) -> Grouped<'r, T>
where
    F: Fn(&T) -> &str,
{
    let matcher = AreaMatcher::new(areas);
    let mut by_area: Vec<Vec<&T>> = vec![Vec::new(); areas.len()];
    let mut unassigned = Vec::new();

    for record in records {
        match matcher.match_index(text_of(record)) {
            Some(idx) => by_area[idx].push(record),
            None => unassigned.push(record),
        }
    }

    debug!(
        records = records.len(),
        areas = by_area.len(),
        unassigned = unassigned.len(),
        "grouped records by area"
    );

    Grouped {
        by_area,
        unassigned,
    }
}

/// Expenses whose description contains any of `terms` (accent- and case-insensitive),
/// with their total. Blank terms are ignored; no usable term returns nothing.
pub(crate) fn search_expenses<'a>(expenses: &'a [Expense], terms: &[&str]) -> (Vec<&'a Expense>, Decimal) {
    let needles: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| normalize(t))
        .collect();
    if needles.is_empty() {
        return (Vec::new(), Decimal::ZERO);
    }
    let hits: Vec<&Expense> = expenses
        .iter()
        .filter(|e| {
            let description = normalize(&e.description);
            needles.iter().any(|n| description.contains(n.as_str()))
        })
        .collect();
    let total = hits.iter().map(|e| e.amount).sum();
    (hits, total)
}

#[cfg(test)]
mod tests;
