//! Projection of selected identifiers onto resolved options.

use crate::form::{OptionValue, SelectOption};

/// Map each selected identifier, in order, to its resolved option.
///
/// Identifiers that no longer resolve are dropped; they stay in the host's
/// value untouched and reappear if the option set changes back.
pub fn project<'a>(
    selection: &[OptionValue],
    options: &'a [SelectOption],
) -> Vec<&'a SelectOption> {
    selection
        .iter()
        .filter_map(|value| options.iter().find(|option| &option.value == value))
        .collect()
}
