//! The element store: canonical, ordered list of canvas elements.
//!
//! Elements are kept in insertion order. Stacking order is derived on demand by
//! a stable sort on `z_index`, so ties fall back to insertion order and
//! z-indices never need to be contiguous.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind, ElementType};
use crate::patch::{ElementPatch, PatchOutcome};

/// Owned list of elements for one editor session.
///
/// # Example
///
/// ```
/// use letterpress_core::{ElementStore, ElementType};
///
/// let mut store = ElementStore::new();
/// let id = store.insert_default(ElementType::Shape, 40.0, 40.0).id;
/// assert_eq!(store.get(id).map(|e| e.transform.z_index), Some(0));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementStore {
    /// Elements in insertion order.
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element with the given payload at `(x, y)`.
    ///
    /// The element gets its type's default size and `z_index = len()`.
    /// The position is accepted as given.
    pub fn insert(&mut self, kind: ElementKind, x: f32, y: f32) -> &Element {
        let mut element = Element::new(kind).at(x, y);
        element.transform.z_index = i64::try_from(self.elements.len()).unwrap_or(i64::MAX);
        tracing::debug!(
            id = %element.id,
            kind = %element.element_type(),
            z_index = element.transform.z_index,
            "Inserted element"
        );
        let index = self.elements.len();
        self.elements.push(element);
        &self.elements[index]
    }

    /// Insert an element of `element_type` with that type's default payload.
    pub fn insert_default(&mut self, element_type: ElementType, x: f32, y: f32) -> &Element {
        self.insert(ElementKind::defaults(element_type), x, y)
    }

    /// Shallow-merge `patch` onto the element with `id`.
    ///
    /// Returns `None` (and changes nothing) if no such element exists.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> Option<PatchOutcome> {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(%id, "Update ignored: element not found");
            return None;
        };
        let outcome = patch.apply(element);
        if let PatchOutcome::ForeignContentIgnored { patch, element } = outcome {
            tracing::debug!(
                %id,
                patch_type = %patch,
                element_type = %element,
                "Dropped content patch for another variant"
            );
        }
        Some(outcome)
    }

    /// Remove the element with `id`, returning it if it existed.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        tracing::debug!(%id, "Removed element");
        Some(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Whether an element with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// All elements ascending by `z_index`, ties in insertion order.
    ///
    /// This is the single ordering used by rendering and serialization.
    #[must_use]
    pub fn query(&self) -> Vec<&Element> {
        let mut ordered: Vec<_> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.transform.z_index);
        ordered
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// The `index`-th element in insertion order.
    #[must_use]
    pub fn nth_inserted(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Lowest and highest `z_index`, or `None` when empty.
    #[must_use]
    pub fn z_range(&self) -> Option<(i64, i64)> {
        let mut z = self.elements.iter().map(|e| e.transform.z_index);
        let first = z.next()?;
        Some(z.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Topmost element whose bounding box contains `(x, y)`.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.query()
            .into_iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
