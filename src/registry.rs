use crate::annotation::{AnnotationSummary, RawAnnotation};
use crate::reading_order::ReadingOrder;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Annotation summaries kept unique by id and sorted in reading order.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    entries: Vec<AnnotationSummary>,
    order: ReadingOrder,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: ReadingOrder) -> Self {
        Self {
            entries: Vec::new(),
            order,
        }
    }

    /// Inserts a new annotation or replaces the existing entry with the same id.
    ///
    /// New entries go to the front before the re-sort, so among entries the reading
    /// order considers equal the most recently added one comes first.
    pub fn upsert(&mut self, raw: &RawAnnotation) -> UpsertOutcome {
        let summary = AnnotationSummary::from(raw);
        let outcome = match self.position(&summary.id) {
            Some(idx) => {
                self.entries[idx] = summary;
                UpsertOutcome::Updated
            }
            None => {
                self.entries.insert(0, summary);
                UpsertOutcome::Inserted
            }
        };
        self.order.sort(&mut self.entries);

        trace!(
            "Registry {outcome:?} annotation {}, {} entries",
            raw.id,
            self.entries.len()
        );
        outcome
    }

    /// Removes the entry with `id`. Returns false when there was nothing to remove.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            // Neighbours of the removed entry may be out of order relative to each
            // other once it is gone, since the row tolerance is not transitive.
            self.order.sort(&mut self.entries);
        } else {
            debug!("Ignoring removal of unknown annotation {id}");
        }
        removed
    }

    pub fn snapshot(&self) -> &[AnnotationSummary] {
        &self.entries
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&AnnotationSummary> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct kind labels in the order they first appear in the sequence.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !kinds.contains(&entry.kind_name) {
                kinds.push(entry.kind_name.clone());
            }
        }
        kinds
    }

    pub fn order(&self) -> &ReadingOrder {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, page_index: usize, x: f64, y: f64) -> RawAnnotation {
        RawAnnotation {
            id: id.to_string(),
            name: "FreeTextEditor".to_string(),
            page_index,
            x,
            y,
            width: 0.1,
            height: 0.1,
        }
    }

    fn ids(registry: &AnnotationRegistry) -> Vec<&str> {
        registry.snapshot().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_upsert_orders_by_page() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("e1", 2, 0.5, 0.1));
        registry.upsert(&raw("e2", 1, 0.9, 0.9));

        assert_eq!(ids(&registry), vec!["e2", "e1"]);
    }

    #[test]
    fn test_upsert_same_row_breaks_tie_on_x() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("e1", 1, 0.8, 0.500));
        registry.upsert(&raw("e2", 1, 0.2, 0.505));

        assert_eq!(ids(&registry), vec!["e2", "e1"]);
    }

    #[test]
    fn test_upsert_existing_id_replaces_value() {
        let mut registry = AnnotationRegistry::new();
        assert_eq!(
            registry.upsert(&raw("e1", 0, 0.1, 0.1)),
            UpsertOutcome::Inserted
        );
        assert_eq!(
            registry.upsert(&raw("e1", 0, 0.9, 0.1)),
            UpsertOutcome::Updated
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot()[0].x, 0.9);
    }

    #[test]
    fn test_update_moves_entry_when_position_changes() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("a", 0, 0.1, 0.1));
        registry.upsert(&raw("b", 0, 0.1, 0.5));
        registry.upsert(&raw("a", 0, 0.1, 0.9));

        assert_eq!(ids(&registry), vec!["b", "a"]);
    }

    #[test]
    fn test_new_entry_precedes_equal_entries() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("old", 0, 0.5, 0.5));
        registry.upsert(&raw("new", 0, 0.5, 0.5));

        assert_eq!(ids(&registry), vec!["new", "old"]);
    }

    #[test]
    fn test_remove_existing_and_missing() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("a", 0, 0.1, 0.1));
        registry.upsert(&raw("b", 1, 0.1, 0.1));

        assert!(!registry.remove("ghost"));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove("a"));
        assert_eq!(ids(&registry), vec!["b"]);
    }

    #[test]
    fn test_remove_restores_order_across_rows() {
        let mut registry = AnnotationRegistry::new();
        // a and c share a row (c before a by x) but b sits between them.
        registry.upsert(&raw("c", 0, 0.1, 0.010));
        registry.upsert(&raw("b", 0, 0.05, 0.015));
        registry.upsert(&raw("a", 0, 0.9, 0.000));
        assert_eq!(ids(&registry), vec!["a", "b", "c"]);

        registry.remove("b");

        assert_eq!(ids(&registry), vec!["c", "a"]);
    }

    #[test]
    fn test_kind_name_is_stripped() {
        let mut registry = AnnotationRegistry::new();
        registry.upsert(&raw("a", 0, 0.1, 0.1));

        assert_eq!(registry.snapshot()[0].kind_name, "FreeText");
    }

    #[test]
    fn test_kinds_are_distinct_in_reading_order() {
        let mut registry = AnnotationRegistry::new();
        let mut ink = raw("ink", 2, 0.1, 0.1);
        ink.name = "InkEditor".to_string();
        registry.upsert(&ink);
        registry.upsert(&raw("t1", 0, 0.1, 0.1));
        registry.upsert(&raw("t2", 3, 0.1, 0.1));

        assert_eq!(registry.kinds(), vec!["FreeText", "Ink"]);
    }

    #[test]
    fn test_lookup_helpers() {
        let mut registry = AnnotationRegistry::new();
        assert!(registry.is_empty());
        registry.upsert(&raw("a", 0, 0.1, 0.1));

        assert_eq!(registry.position("a"), Some(0));
        assert_eq!(registry.position("b"), None);
        assert_eq!(registry.get(0).map(|e| e.id.as_str()), Some("a"));
        assert!(registry.get(1).is_none());
    }
}
