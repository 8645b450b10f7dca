//! Hint extraction

/// At most this many hints are returned.
pub const MAX_HINTS: usize = 4;

/// Returned when the generator produced no usable line.
pub const FALLBACK_HINTS: [&str; 3] = [
    "Think about the fundamental physics principles involved.",
    "Check if you have all the given values.",
    "Draw a diagram to visualize the problem.",
];

/// One hint per non-blank line, at most [`MAX_HINTS`].
pub fn parse_hints(text: &str) -> Vec<String> {
    let hints: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(MAX_HINTS)
        .map(str::to_string)
        .collect();

    if hints.is_empty() {
        FALLBACK_HINTS.iter().map(|h| h.to_string()).collect()
    } else {
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hint_per_line() {
        let hints = parse_hints("1. Draw the forces\n\n2. Use F = ma\n   \n3. Mind the angle\n4. Units\n5. Extra");
        assert_eq!(
            hints,
            vec!["1. Draw the forces", "2. Use F = ma", "3. Mind the angle", "4. Units"]
        );
    }

    #[test]
    fn test_blank_response_falls_back() {
        assert_eq!(parse_hints("  \n\n"), FALLBACK_HINTS.to_vec());
        assert_eq!(parse_hints("").len(), 3);
    }
}
