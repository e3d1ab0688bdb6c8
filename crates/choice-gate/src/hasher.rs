//! Locator fingerprints

/// 32-bit rolling hash over UTF-16 code units (`hash * 31 + unit`, wrapping).
///
/// Distinct strings may collide; colliding locators share one placeholder.
pub fn fingerprint(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(fingerprint("a"), 97);
        assert_eq!(fingerprint("ab"), 97 * 31 + 98);
        assert_eq!(fingerprint("hello"), 99162322);
    }

    #[test]
    fn test_wraps_to_32_bits() {
        // Long inputs overflow; the result must match 32-bit truncating arithmetic
        let url = "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&rel=0";
        let expected = url
            .encode_utf16()
            .fold(0i64, |h, u| ((h * 31 + i64::from(u)) as i32).into());
        assert_eq!(i64::from(fingerprint(url)), expected);
    }

    #[test]
    fn test_deterministic() {
        let url = "https://maps.example.com/embed?pb=!1m18";
        assert_eq!(fingerprint(url), fingerprint(url));
        assert_ne!(fingerprint(url), fingerprint("https://maps.example.com/embed"));
    }

    #[test]
    fn test_non_ascii_uses_utf16_units() {
        // U+1F600 is a surrogate pair: 0xD83D 0xDE00
        let expected = (0xD83Di32 * 31).wrapping_add(0xDE00);
        assert_eq!(fingerprint("\u{1F600}"), expected);
    }
}
