//! # Letterpress Renderer
//!
//! Turns a canvas into newsletter HTML and merges it into the document the
//! newsletter is edited in.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   render    ┌──────────────┐    sync    ┌──────────────┐
//! │ ElementStore │ ──────────► │   Fragment   │ ─────────► │   Document   │
//! │ (z-ordered)  │             │ (abs. boxes) │  markers   │ (one region) │
//! └──────────────┘             └──────────────┘            └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod error;
pub mod html;

pub use bridge::{find_region, sync, sync_store, wrap, CONTENT_END, CONTENT_START};
pub use error::{RenderError, RenderResult};
pub use html::{render_fragment, HtmlConfig, HtmlRenderer};

/// Letterpress renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
