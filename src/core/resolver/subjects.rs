//! Ordering of taught subjects for read-only views

use std::collections::HashSet;

/// Order taught subjects so that main subjects come first.
///
/// Subjects present in both lists come first, then the remaining taught subjects, each
/// group in `taught` order with duplicates removed. Subjects only in `main` are dropped.
#[must_use]
pub fn partition_ordered_subjects<T, M>(taught: &[T], main: &[M]) -> Vec<String>
where
    T: AsRef<str>,
    M: AsRef<str>,
{
    let main: HashSet<&str> = main.iter().map(AsRef::as_ref).collect();
    let mut seen = HashSet::new();

    let (primary, secondary): (Vec<&str>, Vec<&str>) = taught
        .iter()
        .map(AsRef::as_ref)
        .filter(|subject| seen.insert(*subject))
        .partition(|subject| main.contains(subject));

    primary
        .into_iter()
        .chain(secondary)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_subjects_first() {
        assert_eq!(
            partition_ordered_subjects(&["math", "sci", "art"], &["sci"]),
            vec!["sci", "math", "art"]
        );
    }

    #[test]
    fn test_main_only_subjects_are_dropped() {
        assert_eq!(
            partition_ordered_subjects(&["math"], &["history", "math"]),
            vec!["math"]
        );
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(
            partition_ordered_subjects(&["art", "sci", "art", "sci"], &["sci"]),
            vec!["sci", "art"]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let none: [&str; 0] = [];
        assert!(partition_ordered_subjects(&none, &["sci"]).is_empty());
        assert_eq!(partition_ordered_subjects(&["a", "b"], &none), vec!["a", "b"]);
    }
}
