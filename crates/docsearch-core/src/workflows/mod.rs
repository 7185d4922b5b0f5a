//! # Workflows Module
//!
//! This module provides the high-level procedures built on top of the page
//! search controller.
//!
//! ## Overview
//!
//! A workflow takes a loaded page, sets up a controller with a simulated host
//! and drives it through a complete interaction, reporting progress as it goes
//! and returning everything a caller needs to present or persist the result.
//!
//! ## Architecture
//!
//! - **Replay Workflow** ([`session`]) - Applies a scripted sequence of user
//!   interactions (typing, scrolling, clicking, navigating) to a page and
//!   collects the final page state.

pub mod session;
