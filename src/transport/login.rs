use serde::{Deserialize, Serialize};

use crate::domain::{BearerToken, Password, Username};
use crate::transport::TransportError;

#[derive(Debug, Serialize)]
struct LoginJsonRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginJsonResponse {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

pub fn encode_login_request(
    username: &Username,
    password: &Password,
) -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::to_value(LoginJsonRequest {
        username: username.as_str(),
        password: password.as_str(),
    })?)
}

pub fn decode_login_response(json: &str) -> Result<BearerToken, TransportError> {
    let parsed: LoginJsonResponse = serde_json::from_str(json)?;
    let token = parsed.access_token.ok_or(TransportError::MissingToken)?;
    BearerToken::new(token).map_err(|_| TransportError::MissingToken)
}
