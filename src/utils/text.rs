use std::borrow::Cow;

/// Decode file contents as UTF-8, falling back to Windows-1252 for legacy
/// station lists that carry accented names in a single-byte encoding.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

/// Lower-case a string and upper-case the first letter of every word, where
/// a word starts after any non-alphabetic character.
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut previous_alphabetic = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_alphabetic {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            result.push(c);
            previous_alphabetic = false;
        }
    }

    result
}

/// Slice a fixed-width field by byte offsets, clamped to the line length.
/// Returns `None` when the field starts past the end of the line or the
/// offsets do not fall on character boundaries.
pub fn fixed_field(line: &str, start: usize, end: usize) -> Option<&str> {
    if start >= line.len() {
        return None;
    }
    line.get(start..end.min(line.len()))
}

/// Escape the XML special characters of a text node
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("LONDON/HEATHROW"), "London/Heathrow");
        assert_eq!(title_case("st. john's"), "St. John'S");
        assert_eq!(title_case("  mt washington"), "  Mt Washington");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_decode_text_falls_back_to_windows_1252() {
        assert_eq!(decode_text(b"plain ascii"), "plain ascii");
        // 0xE9 is 'é' in Windows-1252 and invalid as a lone UTF-8 byte
        assert_eq!(decode_text(&[b'C', b'a', b'f', 0xE9]), "Café");
        assert_eq!(decode_text("Zürich".as_bytes()), "Zürich");
    }

    #[test]
    fn test_fixed_field() {
        let line = "ABCDEFGHIJ 2000";
        assert_eq!(fixed_field(line, 0, 10), Some("ABCDEFGHIJ"));
        assert_eq!(fixed_field(line, 11, 15), Some("2000"));
        assert_eq!(fixed_field(line, 11, 40), Some("2000"));
        assert_eq!(fixed_field(line, 15, 20), None);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Plain"), "Plain");
        assert_eq!(escape_xml("A & B <C>"), "A &amp; B &lt;C&gt;");
    }
}
