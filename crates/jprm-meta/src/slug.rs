//! Display name to URL-safe slug conversion

/// Convert a display name to a lowercase, hyphenated ASCII slug.
///
/// Non-ASCII text is transliterated first, characters without a
/// transliteration are dropped.
///
/// `"Kodi Sync Queue"` -> `"kodi-sync-queue"`, `"Café"` -> `"cafe"`
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode_with_tofu(name, "");
    let mut result = String::with_capacity(ascii.len());
    let mut last_was_dash = true; // Start true to skip leading dashes

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if c == '\'' {
            // Apostrophes vanish: "Bob's" -> "bobs"
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
