use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How plain text is treated when rendered into the HTML fallback body.
pub enum EscapePolicy {
    /// Interpolate the text as-is, matching the gateway flow's historical
    /// behavior. Unsafe when the text comes from an untrusted source: any
    /// markup in it ends up live in the HTML body.
    #[default]
    Raw,
    /// Escape `&`, `<`, `>`, `"` and `'` before interpolation.
    Escape,
}

/// Best-effort HTML rendering of a plain-text body: the text wrapped in a
/// minimal document/paragraph shell.
pub fn html_from_text(text: &str, policy: EscapePolicy) -> String {
    let body: Cow<'_, str> = match policy {
        EscapePolicy::Raw => Cow::Borrowed(text),
        EscapePolicy::Escape => Cow::Owned(escape(text)),
    };
    format!("<!DOCTYPE html><html><body><p>{body}</p></body></html>")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
