//! # docsearch Core Library
//!
//! In-page search, highlighting and navigation for rendered manual pages,
//! modelled on an in-memory document tree instead of a live browser DOM.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the page model, the
//! interactive behaviour and the user-facing procedures stay separate.
//!
//! - **[`core`]: The Foundation.** Stateless data structures (`Document`), the
//!   HTML page reader and writer, and the case-insensitive literal matcher.
//!
//! - **[`engine`]: The Logic Core.** The stateful `PageSearchController` with its
//!   configuration, event dispatch, host abstraction for scrolling and location,
//!   highlight marker management and page snapshots.
//!
//! - **[`workflows`]: The Public API.** High-level procedures such as replaying a
//!   scripted user interaction against a page and collecting the outcome.

pub mod core;
pub mod engine;
pub mod workflows;
