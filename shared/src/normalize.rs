/// Canonical join key for a free-text region name.
///
/// Strips punctuation (anything neither alphanumeric nor whitespace),
/// collapses whitespace runs to a single space, trims, and lowercases.
/// Total on all input and idempotent: normalizing an already-normalized
/// key is a no-op.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
