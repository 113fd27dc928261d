/// Split text into maximal non-space substrings, borrowing from the input.
///
/// Runs of spaces are discarded; empty input yields an empty vector.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// Owned-token variant of [`split_into_words`]; segmentation is identical.
pub fn split_into_owned_words(text: &str) -> Vec<String> {
    split_into_words(text)
        .into_iter()
        .map(str::to_owned)
        .collect()
}
