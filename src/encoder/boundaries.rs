/// Characters that close a word as far as a whole-word contraction is concerned
pub const BOUNDARY_CHARS: [char; 8] = [',', ':', '.', '!', '\'', '-', ')', '"'];

/// A word starts on a letter that is preceded by nothing or by whitespace
pub fn word_start(prev: Option<char>, current: Option<char>) -> bool {
    match (prev, current) {
        (None, Some(c)) => c.is_alphabetic(),
        (Some(p), Some(c)) => c.is_alphabetic() && p.is_whitespace(),
        (_, None) => false,
    }
}

/// A word ends after a letter that is followed by nothing, whitespace or boundary punctuation
pub fn word_end(prev: Option<char>, current: Option<char>) -> bool {
    match (prev, current) {
        (Some(p), None) => p.is_alphabetic(),
        (Some(p), Some(c)) => p.is_alphabetic() && is_boundary(c),
        (None, _) => false,
    }
}

/// Whitespace or one of the [`BOUNDARY_CHARS`]
pub fn is_boundary(c: char) -> bool {
    c.is_whitespace() || BOUNDARY_CHARS.contains(&c)
}

/// Nothing or whitespace in front of the current character
pub fn after_space(prev: Option<char>) -> bool {
    prev.is_none_or(char::is_whitespace)
}
