/// Cheap deterministic token estimate: `max(ceil(len/4), word_count)`.
///
/// The len/4 term tracks typical subword tokenizers on English text;
/// the word-count floor keeps short, dense payloads (code, identifiers)
/// from being undercounted. An explicit caller-supplied estimate always
/// overrides this.
pub fn estimate_tokens(text: &str) -> u64 {
    let by_length = (text.len() as u64).div_ceil(4);
    let by_words = text.split_whitespace().count() as u64;
    by_length.max(by_words)
}
