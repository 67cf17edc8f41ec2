//! Domain layer: strong types with validation and invariants (no I/O).

mod message;
mod request;
mod validation;
mod value;

pub use message::{ContentType, ParsedMessage};
pub use request::{SendMail, SendSms};
pub use validation::ValidationError;
pub use value::{
    BearerToken, Password, Recipient, SenderAddress, SmsPhoneNumber, SmsRecipient, SmsSenderId,
    Username,
};
