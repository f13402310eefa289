//! Case-insensitive substring search over a note collection.
//!
//! # Invariants
//! - A note matches when its name or its content contains the query.
//! - An empty query matches every note.
//! - Results keep collection order; there is no ranking.

use crate::model::note::Note;

/// Returns the notes matching `query`, in collection order.
///
/// This is a linear scan over names and full contents on every call.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return notes.iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| {
            contains_folded(&note.name, &needle) || contains_folded(&note.content, &needle)
        })
        .collect()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

#[cfg(test)]
mod tests {
    use super::search_notes;
    use crate::model::note::Note;

    fn names<'a>(hits: &[&'a Note]) -> Vec<&'a str> {
        hits.iter().map(|note| note.name.as_str()).collect()
    }

    #[test]
    fn matches_content_case_insensitively() {
        let notes = vec![Note::new("Alpha", "Hello World")];
        assert_eq!(names(&search_notes(&notes, "hello")), vec!["Alpha"]);
        assert!(search_notes(&notes, "zzz").is_empty());
    }

    #[test]
    fn matches_name_and_keeps_collection_order() {
        let notes = vec![
            Note::new("groceries", "milk"),
            Note::new("Recipes", "bread and MILK"),
            Note::new("travel", "passport"),
        ];
        assert_eq!(
            names(&search_notes(&notes, "Milk")),
            vec!["groceries", "Recipes"]
        );
        assert_eq!(names(&search_notes(&notes, "TRAV")), vec!["travel"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let notes = vec![Note::new("a", ""), Note::new("b", "x")];
        assert_eq!(search_notes(&notes, "").len(), 2);
    }

    #[test]
    fn folds_non_ascii_letters() {
        let notes = vec![Note::new("Über", "Straße")];
        assert_eq!(search_notes(&notes, "über").len(), 1);
        assert_eq!(search_notes(&notes, "STRASSE").len(), 0);
        assert_eq!(search_notes(&notes, "STRAßE").len(), 1);
    }
}
