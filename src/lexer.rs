//! Lexical analysis for the shell: splitting an input line into word tokens.

/// Split a raw input line into word tokens.
///
/// Runs of whitespace of any length act as a single delimiter and leading or
/// trailing whitespace is ignored, so no produced token is empty or
/// whitespace-only. There is no quoting, escaping, or variable expansion.
///
/// An empty or all-whitespace line yields an empty vector; callers treat
/// that as a no-op rather than an error.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
