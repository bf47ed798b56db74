use crate::annotation::AnnotationSummary;
use std::cmp::Ordering;

/// Vertical distance under which two annotations are considered to sit on the same row.
pub const DEFAULT_ROW_TOLERANCE: f64 = 0.01;

/// Orders annotations top-to-bottom, left-to-right within each page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingOrder {
    row_tolerance: f64,
}

impl Default for ReadingOrder {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_TOLERANCE)
    }
}

impl ReadingOrder {
    pub fn new(row_tolerance: f64) -> Self {
        Self {
            row_tolerance: row_tolerance.abs(),
        }
    }

    pub fn row_tolerance(&self) -> f64 {
        self.row_tolerance
    }

    pub fn compare(&self, a: &AnnotationSummary, b: &AnnotationSummary) -> Ordering {
        if a.page_index != b.page_index {
            return a.page_index.cmp(&b.page_index);
        }
        if (a.y - b.y).abs() > self.row_tolerance {
            return a.y.total_cmp(&b.y);
        }
        a.x.total_cmp(&b.x)
    }

    /// Stable insertion sort.
    ///
    /// The row tolerance makes the comparator non-transitive (a ~ b and b ~ c on the
    /// same row does not imply a ~ c), and `slice::sort_by` may panic on such
    /// orderings. After this returns no adjacent pair compares as `Greater`.
    pub fn sort(&self, entries: &mut [AnnotationSummary]) {
        for i in 1..entries.len() {
            let mut j = i;
            while j > 0 && self.compare(&entries[j - 1], &entries[j]) == Ordering::Greater {
                entries.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    pub fn is_sorted(&self, entries: &[AnnotationSummary]) -> bool {
        entries
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }
}
