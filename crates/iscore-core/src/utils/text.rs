//! Text helpers used when building labels and HTML fragments.

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use iscore_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("publication date"), "Publication date");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result = c.to_uppercase().to_string();
        result.extend(chars);
        result
    })
}

/// Derives a human-readable label from an identifier (`first_name` -> `first name`).
pub fn verbose_from_name(name: &str) -> String {
    name.replace('_', " ")
}

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their entity equivalents.
///
/// ```
/// use iscore_core::utils::text::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
