//! Case-insensitive substring filter over the note list.
//!
//! # Invariants
//! - Output is a subsequence of the input; relative order is kept.
//! - An empty query returns every note.
//! - The query is not trimmed; whitespace is matched literally.

use crate::model::note::Note;

/// Returns the notes whose content contains `query`, ignoring case.
///
/// Linear scan with no ranking. Filtering an already filtered list with the
/// same query yields the same list.
pub fn filter_notes<'a, I>(query: &str, notes: I) -> Vec<&'a Note>
where
    I: IntoIterator<Item = &'a Note>,
{
    if query.is_empty() {
        return notes.into_iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .into_iter()
        .filter(|note| note.content.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_notes;
    use crate::model::note::Note;

    fn sample() -> Vec<Note> {
        vec![
            Note::new("Call Mom"),
            Note::new("buy MILK and eggs"),
            Note::new("milkshake recipe"),
            Note::new("  spaced  "),
        ]
    }

    fn contents<'a>(notes: &[&'a Note]) -> Vec<&'a str> {
        notes.iter().map(|note| note.content.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let notes = sample();
        let filtered = filter_notes("", &notes);
        assert_eq!(filtered.len(), notes.len());
        assert!(filtered.iter().zip(&notes).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn matches_ignoring_case_and_keeps_order() {
        let notes = sample();
        let filtered = filter_notes("Milk", &notes);
        assert_eq!(
            contents(&filtered),
            vec!["buy MILK and eggs", "milkshake recipe"]
        );
    }

    #[test]
    fn whitespace_query_is_matched_literally() {
        let notes = sample();
        assert_eq!(contents(&filter_notes("  s", &notes)), vec!["  spaced  "]);
        assert_eq!(filter_notes(" ", &notes).len(), 4);
    }

    #[test]
    fn filtering_is_idempotent() {
        let notes = sample();
        let once = filter_notes("mom", &notes);
        let twice = filter_notes("mom", once.iter().copied());
        assert_eq!(contents(&once), contents(&twice));
    }

    #[test]
    fn no_match_yields_empty() {
        let notes = sample();
        assert!(filter_notes("zebra", &notes).is_empty());
    }
}
