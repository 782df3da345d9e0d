//! Splitting of free-text "resolved by" fields into credited names.

/// Split a comma-separated resolver field into normalized names.
///
/// Segments are trimmed, empty ones dropped, and each survivor is
/// normalized with [`normalize_name`]. Every returned name earns one full
/// credit for the ticket.
#[must_use]
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(normalize_name)
        .collect()
}

/// Lower-case a name, then upper-case its first character.
#[must_use]
pub fn normalize_name(segment: &str) -> String {
    let lowered = segment.trim().to_lowercase();
    let mut chars = lowered.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
