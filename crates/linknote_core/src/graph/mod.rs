//! Wikilink graph derived from note contents.
//!
//! # Responsibility
//! - Project a note collection snapshot into a directed link graph.
//! - Offer a swappable layout seam for renderers.
//!
//! # Invariants
//! - The graph is never persisted or cached; it is rebuilt per query.

pub mod layout;
pub mod link_graph;
