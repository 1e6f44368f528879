//! Single-element selection.

use crate::element::{Element, ElementId};
use crate::store::ElementStore;

/// At most one selected element, held by id only.
///
/// The selected element is always looked up in the store at the moment of
/// use; a dangling id resolves to "no selection".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<ElementId>,
}

impl Selection {
    /// Replace any prior selection with `id`.
    pub fn select(&mut self, id: ElementId) {
        self.current = Some(id);
    }

    /// Drop the selection if it refers to `id`. Returns whether it did.
    pub fn clear_if(&mut self, id: ElementId) -> bool {
        if self.current == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The selected id if it still names an element in `store`.
    #[must_use]
    pub fn id(&self, store: &ElementStore) -> Option<ElementId> {
        self.current.filter(|id| store.contains(*id))
    }

    /// The selected element, resolved against `store`.
    #[must_use]
    pub fn resolve<'a>(&self, store: &'a ElementStore) -> Option<&'a Element> {
        self.current.and_then(|id| store.get(id))
    }

    /// Whether `id` is the selected element.
    #[must_use]
    pub fn is(&self, id: ElementId) -> bool {
        self.current == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_select_replaces_previous() {
        let mut store = ElementStore::new();
        let a = store.insert_default(ElementType::Text, 0.0, 0.0).id;
        let b = store.insert_default(ElementType::Text, 0.0, 0.0).id;

        let mut selection = Selection::default();
        selection.select(a);
        selection.select(b);

        assert_eq!(selection.id(&store), Some(b));
        assert!(!selection.is(a));
    }

    #[test]
    fn test_dangling_id_resolves_to_none() {
        let mut store = ElementStore::new();
        let a = store.insert_default(ElementType::Image, 0.0, 0.0).id;
        let mut selection = Selection::default();
        selection.select(a);

        store.remove(a);

        assert!(selection.resolve(&store).is_none());
        assert!(selection.id(&store).is_none());
    }

    #[test]
    fn test_clear_if_only_matches_selected() {
        let mut selection = Selection::default();
        let a = ElementId::new();
        selection.select(a);
        assert!(!selection.clear_if(ElementId::new()));
        assert!(selection.clear_if(a));
        assert!(!selection.is(a));
    }
}
