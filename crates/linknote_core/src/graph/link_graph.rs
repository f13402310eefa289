//! Link graph builder.
//!
//! # Responsibility
//! - Extract `[[target]]` references from note content.
//! - Resolve references against the collection and emit directed edges.
//!
//! # Invariants
//! - One node per note, in collection order, including notes without links.
//! - Dangling references are dropped silently.
//! - Repeated references produce repeated edges.
//! - A node is isolated iff it is neither source nor target of any edge.

use crate::model::note::{note_key, Note};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static WIKILINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("valid wikilink regex"));

/// One note in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    /// No incoming and no outgoing edge. Layouts usually render these apart.
    pub isolated: bool,
}

/// Directed reference `source -> target`, both note names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEdge {
    pub source: String,
    pub target: String,
}

/// Directed note-to-note graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<LinkEdge>,
}

impl LinkGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LinkEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Targets linked from `name`, one entry per edge.
    pub fn outgoing(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.source == name)
            .map(|edge| edge.target.as_str())
            .collect()
    }

    /// Sources linking to `name`, one entry per edge.
    pub fn incoming(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.target == name)
            .map(|edge| edge.source.as_str())
            .collect()
    }

    pub fn isolated_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.isolated)
    }
}

/// Returns every link target in `content`, left to right.
///
/// Inner text is trimmed and empty targets are skipped. There is no alias,
/// escape or nesting syntax: `[[a|b]]` targets the literal `a|b`.
pub fn extract_link_targets(content: &str) -> Vec<String> {
    WIKILINK_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|inner| inner.as_str().trim())
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the link graph for one collection snapshot.
pub fn build_link_graph(notes: &[Note]) -> LinkGraph {
    let mut nodes: Vec<GraphNode> = notes
        .iter()
        .map(|note| GraphNode {
            name: note.name.clone(),
            isolated: true,
        })
        .collect();

    // First occurrence wins if a collaborator ever lists a key twice.
    let mut index_by_key: HashMap<String, usize> = HashMap::with_capacity(notes.len());
    for (index, note) in notes.iter().enumerate() {
        index_by_key.entry(note.key()).or_insert(index);
    }

    let mut edges = Vec::new();
    for (source_index, note) in notes.iter().enumerate() {
        for target in extract_link_targets(&note.content) {
            let Some(&target_index) = index_by_key.get(&note_key(&target)) else {
                continue;
            };
            edges.push(LinkEdge {
                source: note.name.clone(),
                target: notes[target_index].name.clone(),
            });
            nodes[source_index].isolated = false;
            nodes[target_index].isolated = false;
        }
    }

    LinkGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::{build_link_graph, extract_link_targets, LinkEdge};
    use crate::model::note::Note;

    #[test]
    fn extraction_is_lazy_and_trims() {
        assert_eq!(
            extract_link_targets("[[ a ]] then [[b]]]] and [[]] [[   ]]"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn extraction_keeps_alias_text_literal() {
        assert_eq!(extract_link_targets("[[target|label]]"), vec!["target|label"]);
    }

    #[test]
    fn extraction_does_not_span_lines() {
        assert!(extract_link_targets("[[open\nclose]]").is_empty());
    }

    #[test]
    fn self_link_is_an_edge() {
        let graph = build_link_graph(&[Note::new("loop", "me: [[loop]]")]);
        assert_eq!(
            graph.edges(),
            &[LinkEdge {
                source: "loop".to_string(),
                target: "loop".to_string(),
            }]
        );
        assert!(!graph.nodes()[0].isolated);
    }

    #[test]
    fn outgoing_and_incoming_follow_edges() {
        let graph = build_link_graph(&[
            Note::new("A", "[[B]] [[C]]"),
            Note::new("B", "[[C]]"),
            Note::new("C", ""),
        ]);
        assert_eq!(graph.outgoing("A"), vec!["B", "C"]);
        assert_eq!(graph.incoming("C"), vec!["A", "B"]);
        assert_eq!(graph.isolated_nodes().count(), 0);
    }
}
