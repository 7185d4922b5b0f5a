//! # Core Module
//!
//! This module provides the data model and the pure algorithms the search
//! controller is built on. Nothing in here knows about events, scrolling or
//! configuration; it only describes pages and how to read, write and match them.
//!
//! ## Architecture
//!
//! - **Page Representation** ([`models`]) - Arena-backed document tree with
//!   traversal and mutation primitives
//! - **Page I/O** ([`io`]) - Reading and writing rendered HTML pages
//! - **Text Matching** ([`utils`]) - Case-insensitive literal substring matching

pub mod io;
pub mod models;
pub mod utils;
