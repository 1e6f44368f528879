//! Marker-based sync of the rendered canvas into a document.
//!
//! The canvas owns exactly one region of the document, delimited by
//! [`CONTENT_START`] and [`CONTENT_END`]. Everything outside that region is
//! preserved byte for byte.

use std::borrow::Cow;

use letterpress_core::ElementStore;

use crate::error::{RenderError, RenderResult};
use crate::html::render_fragment;

/// Comment opening the canvas region.
pub const CONTENT_START: &str = "<!-- VISUAL_EDITOR_CONTENT_START -->";

/// Comment closing the canvas region.
pub const CONTENT_END: &str = "<!-- VISUAL_EDITOR_CONTENT_END -->";

/// Shared prefix of both region markers.
const MARKER_PREFIX: &str = "<!-- VISUAL_EDITOR_CONTENT_";

/// Escaped form of [`MARKER_PREFIX`]; contains no `<`, so it can never start a marker.
const ESCAPED_MARKER_PREFIX: &str = "&lt;!-- VISUAL_EDITOR_CONTENT_";

/// Surround `fragment` with the region markers.
///
/// Marker text inside the fragment is escaped so the block always holds
/// exactly one start and one end marker.
#[must_use]
pub fn wrap(fragment: &str) -> String {
    let fragment = neutralise_markers(fragment);
    format!("{CONTENT_START}\n{fragment}\n{CONTENT_END}")
}

fn neutralise_markers(fragment: &str) -> Cow<'_, str> {
    if fragment.contains(MARKER_PREFIX) {
        tracing::warn!("Fragment contains canvas region markers; escaping them");
        Cow::Owned(fragment.replace(MARKER_PREFIX, ESCAPED_MARKER_PREFIX))
    } else {
        Cow::Borrowed(fragment)
    }
}

/// Byte range of the first complete marker region in `document`.
///
/// The region ends at the first end marker that has a start marker before it
/// and begins at the closest such start marker. Orphaned markers are skipped.
#[must_use]
pub fn find_region(document: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    loop {
        let end = document[from..].find(CONTENT_END)? + from;
        if let Some(start) = document[..end].rfind(CONTENT_START) {
            return Some((start, end + CONTENT_END.len()));
        }
        from = end + CONTENT_END.len();
    }
}

/// Replace the canvas region of `document` with `fragment`, or append one.
///
/// Only the first region is replaced; later ones are kept and a warning is
/// logged. Applying the same fragment twice yields the same document.
#[must_use]
pub fn sync(document: &str, fragment: &str) -> String {
    let block = wrap(fragment);

    if let Some((start, end)) = find_region(document) {
        let rest = &document[end..];
        if find_region(rest).is_some() {
            tracing::warn!("Document has more than one canvas region; only the first is replaced");
        }
        tracing::debug!(start, end, "Replacing canvas region");
        return format!("{}{block}{rest}", &document[..start]);
    }

    if document.trim().is_empty() {
        tracing::debug!("Document empty; writing canvas region only");
        return block;
    }

    tracing::debug!("No canvas region; appending");
    format!("{}\n\n{block}", document.trim_end())
}

/// Render `store` and sync it into `document`.
///
/// # Errors
///
/// Returns [`RenderError::NothingToSync`] if the store is empty; the caller
/// keeps its document unchanged.
pub fn sync_store(document: &str, store: &ElementStore) -> RenderResult<String> {
    if store.is_empty() {
        tracing::info!("Nothing to sync: canvas is empty");
        return Err(RenderError::NothingToSync);
    }
    let synced = sync(document, &render_fragment(store));
    tracing::info!(
        elements = store.len(),
        before = document.len(),
        after = synced.len(),
        "Synced canvas into document"
    );
    Ok(synced)
}
