use unicode_normalization::UnicodeNormalization;

/// Normalize verse text to NFC and collapse whitespace onto a single line.
///
/// Markup line breaks and no-break spaces become single spaces, so every
/// verse occupies exactly one line of the chapter file. Accented Spanish
/// letters (á, é, í, ó, ú, ñ) always end up precomposed.
pub fn normalize_verse(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nfc() {
        // o + combining acute accent -> ó (precomposed)
        let decomposed = "creo\u{0301}";
        assert_eq!(normalize_verse(decomposed), "creó");
    }

    #[test]
    fn test_collapse_whitespace() {
        let input = "\u{a0} Y dijo Dios:\n    Sea la luz;\r\n y fue la luz.  ";
        assert_eq!(normalize_verse(input), "Y dijo Dios: Sea la luz; y fue la luz.");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_verse(" \n\t\u{a0}"), "");
    }
}
