//! "Did you mean" suggestions for mistyped sprite names

use crate::models::Sheet;

/// Largest edit distance still offered as a suggestion.
pub const MAX_DISTANCE: usize = 3;

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }

    // two rolling rows of the edit matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Up to three candidates within `max_distance` of `query`, closest first.
///
/// Comparison ignores case; ties keep the candidates' original order.
pub fn suggest<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Vec<&'a str> {
    let query = query.to_lowercase();
    let mut scored: Vec<(&str, usize)> = candidates
        .into_iter()
        .map(|candidate| (candidate, levenshtein_distance(&query, &candidate.to_lowercase())))
        .filter(|(_, distance)| *distance <= max_distance)
        .collect();
    scored.sort_by_key(|(_, distance)| *distance);
    scored.into_iter().take(3).map(|(candidate, _)| candidate).collect()
}

/// Format a "did you mean?" hint, or `None` without suggestions.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    match suggestions {
        [] => None,
        [one] => Some(format!("Did you mean '{}'?", one)),
        [first, second] => Some(format!("Did you mean '{}' or '{}'?", first, second)),
        [first, second, third, ..] => {
            Some(format!("Did you mean '{}', '{}', or '{}'?", first, second, third))
        }
    }
}

/// Error text for a sprite name that is not in `sheet`, with a hint when
/// a similar name exists.
pub fn unknown_sprite_message(sheet: &Sheet, name: &str) -> String {
    let names = sheet.sprite_names();
    let suggestions = suggest(name, names.iter().map(String::as_str), MAX_DISTANCE);
    match format_suggestion(&suggestions) {
        Some(hint) => format!("no sprite named '{}'. {}", name, hint),
        None if names.is_empty() => format!("no sprite named '{}' (the sheet is empty)", name),
        None => format!("no sprite named '{}' (sprites: {})", name, names.join(", ")),
    }
}
