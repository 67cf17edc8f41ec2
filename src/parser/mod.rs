//! Message parser: raw RFC 5322 text to a [`ParsedMessage`] (no I/O).
//!
//! Recipients are collected from the `To` and `Cc` headers in that order;
//! `Bcc` is rejected outright because the gateway has no blind-copy
//! delivery primitive and dropping those recipients silently would lose
//! data. The body is the first `text/plain` part in document order,
//! decoded per its declared charset (utf-8 when unspecified). A
//! non-multipart message with another content type contributes its single
//! decoded payload as-is; a multipart message with no `text/plain` part
//! has an empty body.

use mail_parser::MessageParser;

use crate::domain::{ContentType, ParsedMessage, Recipient};

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("input could not be parsed as an email message")]
    Malformed,

    #[error("unsupported message feature: {feature}")]
    UnsupportedFeature { feature: &'static str },

    /// The single payload of a non-multipart message is not valid text.
    #[error("message body could not be decoded as text")]
    Decode,
}

/// Parse a raw email message into the normalized shape the gateway needs.
///
/// An empty recipient list is valid (the caller may supply recipients via
/// another channel), as is a missing body or subject.
pub fn parse_message(raw: &str) -> Result<ParsedMessage, MessageError> {
    let parsed = MessageParser::default()
        .parse(raw.as_bytes())
        .ok_or(MessageError::Malformed)?;

    if !address_list(parsed.bcc()).is_empty() {
        return Err(MessageError::UnsupportedFeature {
            feature: "bcc recipients",
        });
    }

    let mut addresses = address_list(parsed.to());
    addresses.extend(address_list(parsed.cc()));
    let recipients = fmt_recipients(addresses);

    let subject = parsed.subject().unwrap_or_default().to_owned();

    // First text/plain part wins. A non-multipart message with a different
    // content type passes its single decoded payload through verbatim; a
    // multipart message without a text/plain part has no body.
    let body = match first_text_plain(&parsed) {
        Some(text) => text,
        None => match parsed.parts.as_slice() {
            [only] => single_part_contents(only)?,
            _ => String::new(),
        },
    };

    Ok(ParsedMessage {
        subject,
        recipients,
        content_type: ContentType::TextPlain,
        body,
    })
}

/// Trim a list of raw addresses into validated recipients, dropping blanks.
///
/// Idempotent: feeding the output back through produces the same list.
pub fn fmt_recipients<I, S>(addresses: I) -> Vec<Recipient>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    addresses
        .into_iter()
        .filter_map(|addr| Recipient::new(addr).ok())
        .collect()
}

/// First `text/plain` part in document order, if the message has one.
///
/// `text_body` also indexes html parts that mail_parser would convert to
/// plain text on demand; that conversion is not wanted here, so only parts
/// that really are text are considered.
fn first_text_plain(parsed: &mail_parser::Message<'_>) -> Option<String> {
    parsed
        .text_body
        .iter()
        .find_map(|&id| match parsed.parts.get(id as usize).map(|part| &part.body) {
            Some(mail_parser::PartType::Text(text)) => Some(text.as_ref().to_owned()),
            _ => None,
        })
}

/// Decoded payload of the only part of a non-multipart message.
fn single_part_contents(part: &mail_parser::MessagePart<'_>) -> Result<String, MessageError> {
    match &part.body {
        mail_parser::PartType::Text(text) | mail_parser::PartType::Html(text) => {
            Ok(text.as_ref().to_owned())
        }
        mail_parser::PartType::Binary(data) | mail_parser::PartType::InlineBinary(data) => {
            std::str::from_utf8(data.as_ref())
                .map(str::to_owned)
                .map_err(|_| MessageError::Decode)
        }
        _ => Ok(String::new()),
    }
}

/// Flatten a mail_parser address header into bare address strings.
fn address_list(addr: Option<&mail_parser::Address<'_>>) -> Vec<String> {
    let Some(addr) = addr else {
        return Vec::new();
    };
    match addr {
        mail_parser::Address::List(addrs) => addrs
            .iter()
            .filter_map(|a| a.address.as_ref().map(|s| s.to_string()))
            .collect(),
        mail_parser::Address::Group(groups) => groups
            .iter()
            .flat_map(|g| {
                g.addresses
                    .iter()
                    .filter_map(|a| a.address.as_ref().map(|s| s.to_string()))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_part_message_keeps_recipient_order() {
        let raw = "From: s@x.com\r\n\
                   To: a@x.com, b@x.com\r\n\
                   Subject: greetings\r\n\
                   \r\n\
                   hello there\r\n";
        let msg = parse_message(raw).unwrap();

        let addrs: Vec<&str> = msg.recipients.iter().map(Recipient::as_str).collect();
        assert_eq!(addrs, ["a@x.com", "b@x.com"]);
        assert_eq!(msg.subject, "greetings");
        assert_eq!(msg.content_type, ContentType::TextPlain);
        assert_eq!(msg.body.trim_end(), "hello there");
    }

    #[test]
    fn cc_recipients_follow_to_recipients() {
        let raw = "To: a@x.com\r\n\
                   Cc: c@x.com, d@x.com\r\n\
                   Subject: order\r\n\
                   \r\n\
                   body\r\n";
        let msg = parse_message(raw).unwrap();

        let addrs: Vec<&str> = msg.recipients.iter().map(Recipient::as_str).collect();
        assert_eq!(addrs, ["a@x.com", "c@x.com", "d@x.com"]);
    }

    #[test]
    fn non_empty_bcc_is_rejected() {
        let raw = "To: a@x.com\r\n\
                   Bcc: hidden@x.com\r\n\
                   Subject: secret\r\n\
                   \r\n\
                   body\r\n";
        let err = parse_message(raw).unwrap_err();
        assert!(matches!(
            err,
            MessageError::UnsupportedFeature {
                feature: "bcc recipients"
            }
        ));
    }

    #[test]
    fn multipart_takes_first_text_plain_part() {
        let raw = "To: a@x.com\r\n\
                   Subject: alt\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
                   \r\n\
                   --sep\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>rich body</p>\r\n\
                   --sep\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   plain body\r\n\
                   --sep--\r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.body.trim_end(), "plain body");
        assert!(!msg.body.contains("rich"));
    }

    #[test]
    fn multipart_without_text_plain_yields_empty_body() {
        let raw = "To: a@x.com\r\n\
                   Subject: html only\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
                   \r\n\
                   --sep\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>rich body</p>\r\n\
                   --sep--\r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.body, "");
    }

    #[test]
    fn single_part_html_message_keeps_the_raw_payload() {
        let raw = "To: a@x.com\r\n\
                   Subject: rich\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>rich body</p>\r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.body.trim_end(), "<p>rich body</p>");
    }

    #[test]
    fn undecodable_single_part_payload_is_a_decode_error() {
        let raw = "To: a@x.com\r\n\
                   Subject: blob\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: application/octet-stream\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   /w==\r\n";
        let err = parse_message(raw).unwrap_err();
        assert!(matches!(err, MessageError::Decode));
    }

    #[test]
    fn missing_subject_defaults_to_empty_string() {
        let raw = "To: a@x.com\r\n\
                   \r\n\
                   body\r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.subject, "");
    }

    #[test]
    fn missing_body_yields_empty_string() {
        let raw = "To: a@x.com\r\n\
                   Subject: headers only\r\n\
                   \r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.body, "");
    }

    #[test]
    fn empty_recipient_headers_are_valid() {
        let raw = "Subject: floating\r\n\
                   \r\n\
                   body\r\n";
        let msg = parse_message(raw).unwrap();
        assert!(msg.recipients.is_empty());
    }

    #[test]
    fn declared_charset_is_decoded() {
        let raw = "To: a@x.com\r\n\
                   Subject: accents\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: text/plain; charset=\"iso-8859-1\"\r\n\
                   Content-Transfer-Encoding: quoted-printable\r\n\
                   \r\n\
                   caf=E9 cr=E8me\r\n";
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.body.trim_end(), "café crème");
    }

    #[test]
    fn fmt_recipients_trims_and_is_idempotent() {
        let first = fmt_recipients([" a@x.com ", "b@x.com"]);
        let addrs: Vec<&str> = first.iter().map(Recipient::as_str).collect();
        assert_eq!(addrs, ["a@x.com", "b@x.com"]);

        let again = fmt_recipients(first.iter().map(|r| r.as_str().to_owned()));
        assert_eq!(again, first);
    }

    #[test]
    fn fmt_recipients_drops_blank_entries() {
        let out = fmt_recipients(["a@x.com", "   ", ""]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_str(), "a@x.com");
    }
}
