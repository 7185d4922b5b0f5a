//! # Core Models Module
//!
//! This module contains the data structures used to represent a rendered manual
//! page in memory, providing the foundation for every search and navigation
//! operation.
//!
//! ## Overview
//!
//! A page is stored as an arena-backed tree. Nodes never hold references to one
//! another; they hold [`ids::NodeId`] keys into the owning [`document::Document`],
//! so the tree can be mutated in place (markers inserted, text restored) without
//! fighting the borrow checker.
//!
//! ## Key Components
//!
//! - [`ids`] - Key type for nodes in the document arena
//! - [`node`] - Node kinds, elements, attributes and inline style handling
//! - [`document`] - The document tree with traversal and mutation primitives
//! - [`builder`] - Fluent construction of documents for fixtures and tests
//!
//! ## Usage
//!
//! ```ignore
//! use docsearch::core::models::document::Document;
//!
//! let mut doc = Document::new();
//! let body = doc.create_element("body");
//! doc.append_child(doc.root(), body)?;
//! let section = doc.create_element("section");
//! doc.element_mut(section)?.set_attribute("class", "section");
//! doc.append_child(body, section)?;
//! ```

pub mod builder;
pub mod document;
pub mod ids;
pub mod node;
