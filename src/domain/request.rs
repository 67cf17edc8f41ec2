use crate::domain::message::ContentType;
use crate::domain::validation::ValidationError;
use crate::domain::value::{Recipient, SenderAddress, SmsRecipient, SmsSenderId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One mail send request: fan-out over recipients happens client-side, one
/// HTTP call per entry, in the order given here.
///
/// An empty recipient list is valid at this level (the call becomes a no-op
/// batch); whether that is an operator error is decided by the command-line
/// front end.
pub struct SendMail {
    recipients: Vec<Recipient>,
    subject: String,
    content_type: ContentType,
    body: String,
    sender: SenderAddress,
    html: Option<String>,
}

impl SendMail {
    /// Build a mail request from already-validated parts.
    ///
    /// `html` overrides the client's plain-text fallback rendering when set.
    pub fn new(
        recipients: Vec<Recipient>,
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: SenderAddress,
    ) -> Self {
        Self {
            recipients,
            subject: subject.into(),
            content_type: ContentType::TextPlain,
            body: body.into(),
            sender,
            html: None,
        }
    }

    /// Supply an explicit HTML rendering instead of the generated fallback.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn sender(&self) -> &SenderAddress {
        &self.sender
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One SMS send request: a single recipient, single HTTP call.
pub struct SendSms {
    recipient: SmsRecipient,
    text: String,
    sender: SmsSenderId,
}

impl SendSms {
    /// Build an SMS request; the text must not be blank.
    pub fn new(
        recipient: SmsRecipient,
        text: impl Into<String>,
        sender: SmsSenderId,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        Ok(Self {
            recipient,
            text,
            sender,
        })
    }

    pub fn recipient(&self) -> &SmsRecipient {
        &self.recipient
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> &SmsSenderId {
        &self.sender
    }
}
