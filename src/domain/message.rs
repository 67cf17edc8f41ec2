use crate::domain::value::Recipient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Body content type of a parsed message.
///
/// The gateway flow only carries plain text; HTML source messages are not
/// supported, so this is a single-variant enum rather than a free-form
/// string.
pub enum ContentType {
    #[default]
    TextPlain,
}

impl ContentType {
    /// MIME type string as used in message headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalized view of a raw email message: the fields the gateway needs and
/// nothing else.
///
/// Immutable after construction. Recipients keep header order (`To` before
/// `Cc`) and may contain duplicates; de-duplication is a caller concern.
pub struct ParsedMessage {
    /// Subject header value, empty string when the header is absent.
    pub subject: String,
    /// Addresses collected from the `To` and `Cc` headers, trimmed.
    pub recipients: Vec<Recipient>,
    /// Always [`ContentType::TextPlain`].
    pub content_type: ContentType,
    /// Decoded body of the first `text/plain` part, empty when none exists.
    pub body: String,
}
