//! Pure pattern matching functions for cache keys.
//!
//! Patterns follow the Redis `SCAN MATCH` subset used by this crate: `*`
//! matches any sequence, `?` matches one character and `\` escapes the next
//! character. Character classes are not supported; `[` and `]` are literals.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnySequence,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '*' => Token::AnySequence,
            '?' => Token::AnyChar,
            // A trailing backslash matches itself
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        };
        // Adjacent wildcards behave like a single one
        if token == Token::AnySequence && tokens.last() == Some(&Token::AnySequence) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use subtrack_core::cache::pattern_matches;
///
/// assert!(pattern_matches("summary:u1:*", "summary:u1:Netflix:01-2025-"));
/// assert!(pattern_matches("summary:?1:*", "summary:u1::-"));
/// assert!(!pattern_matches("summary:u1:*", "summary:u2::-"));
/// assert!(pattern_matches(r"summary:a\*:*", "summary:a*::-"));
/// assert!(!pattern_matches(r"summary:a\*:*", "summary:ab::-"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let tokens = tokenize(pattern);
    let key: Vec<char> = key.chars().collect();

    let (mut t, mut k) = (0, 0);
    // Position of the last `*` and the key index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match tokens.get(t) {
            Some(Token::AnySequence) => {
                backtrack = Some((t, k));
                t += 1;
            }
            Some(Token::AnyChar) => {
                t += 1;
                k += 1;
            }
            Some(Token::Literal(c)) if *c == key[k] => {
                t += 1;
                k += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    backtrack = Some((star, matched + 1));
                    t = star + 1;
                    k = matched + 1;
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnySequence)
}

/// Escapes glob metacharacters so `text` only matches itself.
pub fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '?' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
