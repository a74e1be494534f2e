use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched by [`escape`]. Everything else, including the
/// grammar delimiters `(`, `)`, `,` and `*`, is percent-encoded.
const VALUE_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Percent-encode a literal filter value so it can be embedded in the grammar
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, VALUE_ESCAPE_SET).to_string()
}

/// Reverse [`escape`].
///
/// Also accepts the legacy `%uXXXX` form and single-byte Latin-1 escapes
/// (`%E9`) so strings bookmarked from older producers still decode.
pub fn unescape(value: &str) -> String {
    let normalized = expand_legacy_unicode_escapes(value);
    let bytes: Vec<u8> = percent_decode_str(&normalized).collect();

    // Bytes that are not valid UTF-8 are read as Latin-1, one at a time
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
        decoded.extend(chunk.invalid().iter().copied().map(char::from));
    }
    decoded
}

/// Rewrite every run of `%uXXXX` units into UTF-8 percent escapes.
fn expand_legacy_unicode_escapes(value: &str) -> String {
    if !value.contains("%u") {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut units: Vec<u16> = Vec::new();
    let mut rest = value;

    while !rest.is_empty() {
        if let Some(unit) = legacy_unit(rest) {
            units.push(unit);
            rest = &rest[6..];
            continue;
        }
        flush_units(&mut units, &mut out);
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    flush_units(&mut units, &mut out);

    out
}

fn legacy_unit(s: &str) -> Option<u16> {
    let hex = s.strip_prefix("%u")?.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    let decoded: String = char::decode_utf16(units.drain(..))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    out.push_str(&utf8_percent_encode(&decoded, NON_ALPHANUMERIC).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape("a(b),c*d"), "a%28b%29%2Cc%2Ad");
        assert_eq!(escape("true"), "true");
        assert_eq!(escape("cpu-time_1.5/s@x+y"), "cpu-time_1.5/s@x+y");
        assert_eq!(escape("wrong "), "wrong%20");
    }

    #[test]
    fn test_escape_roundtrip() {
        for value in [
            "",
            "(",
            ")",
            ",",
            "*",
            "%",
            "%u0041",
            "a,b(c)d",
            "false(reach)",
            "héllo wörld",
            "日本語",
            "emoji 🎉",
            "  trailing  ",
        ] {
            assert_eq!(unescape(&escape(value)), value, "value: {value:?}");
        }
    }

    #[test]
    fn test_unescape_legacy_forms() {
        assert_eq!(unescape("%u65E5%u672C"), "日本");
        assert_eq!(unescape("%uD83C%uDF89"), "🎉");
        assert_eq!(unescape("h%E9llo"), "héllo");
        assert_eq!(unescape("%C3%A9%E9"), "éé");
        assert_eq!(unescape("%E9t%C3%A9"), "été");
        assert_eq!(unescape("%3A1120"), ":1120");
    }

    #[test]
    fn test_unescape_leaves_incomplete_sequences() {
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%uZZZZ"), "%uZZZZ");
    }

    #[test]
    fn test_lone_surrogate_becomes_replacement_char() {
        assert_eq!(unescape("%uD83Cx"), "\u{FFFD}x");
    }
}
