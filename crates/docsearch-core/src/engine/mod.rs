//! # Engine Module
//!
//! This module implements the interactive behaviour of a manual page: search
//! filtering with highlight markers, the active side-navigation link, the
//! back-to-top control and smooth anchor scrolling.
//!
//! ## Overview
//!
//! Everything is driven by a single [`controller::PageSearchController`] that
//! owns the page [`Document`](crate::core::models::document::Document) and a
//! [`host::PageHost`]. Host events are routed through one delegated
//! [`controller::PageSearchController::dispatch`] entry point, and every handler
//! runs to completion before the next event is delivered.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Element hooks, thresholds and highlight policy
//! - **Controller** ([`controller`]) - Search, navigation, back-to-top and scrolling
//! - **Events** ([`events`]) - Host events and their outcomes
//! - **Host** ([`host`]) - Location, scroll offset and scroll requests
//! - **State Tracking** ([`state`]) - Search summaries and page snapshots
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub(crate) mod highlight;
pub mod host;
pub(crate) mod navigation;
pub mod progress;
pub mod state;
