use serde::Serialize;

use crate::domain::SendSms;
use crate::transport::TransportError;

#[derive(Debug, Serialize)]
struct SendSmsJsonRequest<'a> {
    sender: &'a str,
    recipient: &'a str,
    text: &'a str,
}

pub fn encode_send_sms_request(request: &SendSms) -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::to_value(SendSmsJsonRequest {
        sender: request.sender().as_str(),
        recipient: request.recipient().as_str(),
        text: request.text(),
    })?)
}
