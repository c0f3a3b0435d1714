/// Mood chips and the template tags each one selects.
pub const MOOD_TABLE: &[(&str, &[&str])] = &[
    (
        "roast",
        &["roast", "mocking", "funny", "side-eye", "judgmental", "clown", "insult", "sarcastic"],
    ),
    (
        "cool",
        &["cool", "slang", "confident", "chill", "w", "drip", "based", "respect"],
    ),
    (
        "cute",
        &["cute", "love", "wholesome", "happy", "aww", "sweet", "excited", "friendly"],
    ),
    (
        "work",
        &["tired", "exhausted", "confused", "dead", "stress", "monday", "bored", "work"],
    ),
    ("random", &[]),
];

fn mood_tags(mood: &str) -> Option<&'static [&'static str]> {
    MOOD_TABLE
        .iter()
        .find(|(name, _)| *name == mood)
        .map(|(_, tags)| *tags)
}

/// Expand a mood selector (`"roast"`, `"roast, cute"`, `"sleepy"`) into target tags.
///
/// Known moods expand through [`MOOD_TABLE`]; anything else is kept as a literal tag. An empty
/// result means "no constraint".
pub fn expand_mood(selector: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for part in selector.split(',') {
        let mood = part.trim().to_lowercase();
        if mood.is_empty() {
            continue;
        }
        match mood_tags(&mood) {
            Some(expanded) => tags.extend(expanded.iter().map(|t| t.to_string())),
            None => tags.push(mood),
        }
    }
    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/moods.rs"]
mod tests;
