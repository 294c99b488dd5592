//! Shared utility functions for name and date formatting.

/// Capitalizes a term the way the crash-stats UI labels process types:
/// first character uppercased, the rest lowercased.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("content"), "Content");
        assert_eq!(capitalize("gpu"), "Gpu");
        assert_eq!(capitalize("BROWSER"), "Browser");
        assert_eq!(capitalize(""), "");
    }
}
