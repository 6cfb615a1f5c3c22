/// Make a game name safe for use as a file name.
///
/// Colons become " - " (common in game titles, illegal on Windows); the
/// remaining filename-hostile characters are stripped outright.
pub fn sanitize_name(name: &str) -> String {
    name.replace(':', " - ")
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_name("Tetris"), "Tetris");
    }

    #[test]
    fn test_sanitize_colon() {
        assert_eq!(sanitize_name("Metroid: Zero"), "Metroid -  Zero");
        assert_eq!(sanitize_name("A:B"), "A - B");
    }

    #[test]
    fn test_sanitize_hostile_characters() {
        assert_eq!(sanitize_name("What?/Why\\*"), "WhatWhy");
        assert_eq!(sanitize_name("\"Quoted\" <Game>"), "Quoted Game");
    }
}
