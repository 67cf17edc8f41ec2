use serde::Serialize;

use crate::domain::{Recipient, SenderAddress};
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shape of the `to` field in the sendmail payload.
///
/// The gateway's canonical endpoint takes a bare address string; some
/// deployments sit in front of back ends that expect the structured
/// `{"emailAddress": {"address": ...}}` record instead. The format is an
/// explicit, swappable serialization step, selected on the client builder.
pub enum RecipientFormat {
    #[default]
    Bare,
    Structured,
}

impl RecipientFormat {
    /// Render one recipient in this format.
    pub fn encode(self, recipient: &Recipient) -> serde_json::Value {
        match self {
            Self::Bare => serde_json::Value::String(recipient.as_str().to_owned()),
            Self::Structured => {
                let mut address = serde_json::Map::new();
                address.insert(
                    "address".to_owned(),
                    serde_json::Value::String(recipient.as_str().to_owned()),
                );
                let mut outer = serde_json::Map::new();
                outer.insert("emailAddress".to_owned(), serde_json::Value::Object(address));
                serde_json::Value::Object(outer)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMailJsonRequest<'a> {
    from: &'a str,
    #[serde(rename = "fromName")]
    from_name: &'a str,
    to: serde_json::Value,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    // Attachments are unsupported; the gateway still expects the key.
    files: [&'a str; 0],
}

#[allow(clippy::too_many_arguments)]
pub fn encode_send_mail_request(
    sender: &SenderAddress,
    from_name: &str,
    recipient: &Recipient,
    format: RecipientFormat,
    subject: &str,
    text: &str,
    html: &str,
) -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::to_value(SendMailJsonRequest {
        from: sender.as_str(),
        from_name,
        to: format.encode(recipient),
        subject,
        text,
        html,
        files: [],
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(format: RecipientFormat) -> serde_json::Value {
        let sender = SenderAddress::new("noreply@x.com").unwrap();
        let recipient = Recipient::new("a@x.com").unwrap();
        encode_send_mail_request(
            &sender,
            "Spider",
            &recipient,
            format,
            "hello",
            "plain body",
            "<p>plain body</p>",
        )
        .unwrap()
    }

    #[test]
    fn bare_format_sends_plain_address_string() {
        let value = encode(RecipientFormat::Bare);
        assert_eq!(value["from"], "noreply@x.com");
        assert_eq!(value["fromName"], "Spider");
        assert_eq!(value["to"], "a@x.com");
        assert_eq!(value["subject"], "hello");
        assert_eq!(value["text"], "plain body");
        assert_eq!(value["html"], "<p>plain body</p>");
        assert_eq!(value["files"], serde_json::json!([]));
    }

    #[test]
    fn structured_format_wraps_address_record() {
        let value = encode(RecipientFormat::Structured);
        assert_eq!(value["to"]["emailAddress"]["address"], "a@x.com");
    }
}
