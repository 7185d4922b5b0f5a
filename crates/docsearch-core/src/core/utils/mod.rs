//! Small, dependency-free helpers shared by the search engine.

pub mod matching;
