use time::OffsetDateTime;

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace("&", "&amp;")
        .replace("<", "&lt;")
        .replace(">", "&gt;")
        .replace("\"", "&quot;")
        .replace("'", "&#39;")
}

/// Generate last modified metadata HTML
pub fn last_modified_html(modified: OffsetDateTime) -> String {
    let fmt = time::format_description::well_known::Rfc3339;
    match modified.format(&fmt) {
        Ok(s) => format!("<p class=\"meta\">Last modified: {}</p>", escape_html(&s)),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn last_modified_uses_rfc3339() {
        let html = last_modified_html(datetime!(2023-11-05 08:00:01 UTC));
        assert_eq!(html, "<p class=\"meta\">Last modified: 2023-11-05T08:00:01Z</p>");
    }
}
