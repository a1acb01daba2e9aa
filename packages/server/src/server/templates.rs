//! Embedded HTML templates.
//!
//! Templates use `{{name}}` placeholders. Values are HTML-escaped unless the
//! placeholder is listed as raw by the caller.

use rust_embed::RustEmbed;

use crate::server::error::ErrorDetails;

#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct Templates;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not embedded: {0}")]
    Missing(String),

    #[error("template {0} is not valid UTF-8")]
    Encoding(String),
}

/// Escape text for inclusion in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render `name`, escaping every value in `vars` and inserting `raw` as-is.
pub fn render(
    name: &str,
    vars: &[(&str, &str)],
    raw: &[(&str, &str)],
) -> Result<String, TemplateError> {
    let file = Templates::get(name).ok_or_else(|| TemplateError::Missing(name.to_string()))?;
    let mut html = std::str::from_utf8(&file.data)
        .map_err(|_| TemplateError::Encoding(name.to_string()))?
        .to_string();

    for (key, value) in vars {
        html = html.replace(&format!("{{{{{key}}}}}"), &escape_html(value));
    }
    for (key, value) in raw {
        html = html.replace(&format!("{{{{{key}}}}}"), value);
    }
    Ok(html)
}

pub fn render_index(port: u16, version: &str) -> Result<String, TemplateError> {
    let port = port.to_string();
    render("index.html", &[("port", &port), ("version", version)], &[])
}

pub fn render_error_page(details: &ErrorDetails) -> Result<String, TemplateError> {
    let code = details.status.as_u16().to_string();
    let status_text = details.status.canonical_reason().unwrap_or("Error");
    let suggestions: String = details
        .suggestions()
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    let timestamp = chrono::Utc::now().to_rfc3339();

    render(
        "error.html",
        &[
            ("status_code", &code),
            ("status_text", status_text),
            ("message", &details.message),
            ("details", &details.details),
            ("timestamp", &timestamp),
        ],
        &[("suggestions", &suggestions)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_index_renders_port() {
        let html = render_index(8123, "1.2.3").unwrap();
        assert!(html.contains("8123"));
        assert!(html.contains("1.2.3"));
        assert!(!html.contains("{{port}}"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let details = ErrorDetails {
            status: StatusCode::NOT_FOUND,
            error_type: "not_found",
            message: "<script>x</script>".to_string(),
            details: "Error type: not_found".to_string(),
            retry_after: None,
        };
        let html = render_error_page(&details).unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<li>Make sure the post is public</li>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_missing_template() {
        assert!(matches!(
            render("nope.html", &[], &[]),
            Err(TemplateError::Missing(_))
        ));
    }
}
