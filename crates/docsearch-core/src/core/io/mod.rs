//! Provides reading and writing of rendered pages.
//!
//! Pages produced by the manual generator are plain HTML. This module contains a
//! tolerant reader that builds a [`Document`](crate::core::models::document::Document)
//! from such a page and a writer that serialises the tree back, together with a
//! trait-based interface shared by both directions.

pub(crate) mod entities;
pub mod html;
pub mod traits;
