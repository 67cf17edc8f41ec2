//! Transport layer: JSON wire formats for the gateway endpoints.

mod html;
mod login;
mod send_mail;
mod send_sms;

pub use html::{EscapePolicy, html_from_text};
pub use login::{decode_login_response, encode_login_request};
pub use send_mail::{RecipientFormat, encode_send_mail_request};
pub use send_sms::encode_send_sms_request;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("login response carries no access token")]
    MissingToken,
}
