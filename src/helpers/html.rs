//! HTML escaping helpers

/// Escape text for use in element content
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

/// Escape text for XML documents such as the feed
pub fn escape_xml(s: &str) -> String {
    escape_attr(s).replace('\'', "&apos;")
}

/// Strip HTML tags from content
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}
