//! Candidate filtering for the dropdown.

use crate::form::{OptionValue, SelectOption};

/// Options to offer for `filter_text`.
///
/// An option is a candidate if it has a label containing the filter text
/// (case-insensitive) and is not already selected. Source order is kept.
pub fn candidates<'a>(
    filter_text: &str,
    options: &'a [SelectOption],
    selection: &[OptionValue],
) -> Vec<&'a SelectOption> {
    let needle = filter_text.to_lowercase();
    options
        .iter()
        .filter(|option| {
            option
                .label
                .as_ref()
                .map(|label| label.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .filter(|option| !selection.contains(&option.value))
        .collect()
}

/// Check whether any option is still unselected.
///
/// Only picks the dropdown's empty-state message.
pub fn has_remaining_options<T>(selected: &[T], options: &[SelectOption]) -> bool {
    selected.len() < options.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("a", "Alpha"),
            SelectOption::new("b", "Beta"),
            SelectOption::new("c", "Gamma"),
            SelectOption::unlabelled("d"),
        ]
    }

    fn values(candidates: &[&SelectOption]) -> Vec<String> {
        candidates.iter().map(|o| o.value.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_offers_all_labelled() {
        let options = options();
        let result = candidates("", &options, &[]);
        assert_eq!(values(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_substring_match() {
        let options = options();
        let result = candidates("mm", &options, &[]);
        assert_eq!(values(&result), vec!["c"]);
    }

    #[test]
    fn test_case_insensitive() {
        let options = options();
        let upper = candidates("ALP", &options, &[]);
        let lower = candidates("alp", &options, &[]);
        assert_eq!(upper, lower);
        assert_eq!(values(&upper), vec!["a"]);
    }

    #[test]
    fn test_selected_values_excluded() {
        let options = options();
        let selection = vec![OptionValue::from("a"), OptionValue::from("c")];

        for text in ["", "a", "ET", "zzz"] {
            let result = candidates(text, &options, &selection);
            assert!(result.iter().all(|o| !selection.contains(&o.value)));
        }
        assert_eq!(values(&candidates("a", &options, &selection)), vec!["b"]);
    }

    #[test]
    fn test_unlabelled_options_excluded() {
        let options = options();
        let result = candidates("", &options, &[]);
        assert!(result.iter().all(|o| o.label.is_some()));
    }

    #[test]
    fn test_no_match() {
        let options = options();
        assert!(candidates("xyz", &options, &[]).is_empty());
    }

    #[test]
    fn test_has_remaining_options() {
        let options = options();
        assert!(has_remaining_options::<()>(&[], &options));
        assert!(has_remaining_options(&[1, 2, 3], &options));
        assert!(!has_remaining_options(&[1, 2, 3, 4], &options));
        assert!(!has_remaining_options::<()>(&[], &[]));
    }
}
