use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Spider gateway account login.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// JSON field name used by the gateway login endpoint (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Spider gateway account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// JSON field name used by the gateway login endpoint (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender mail address (`from`).
///
/// Invariant: non-empty after trimming. The address must be enabled on the
/// gateway account; the client does not verify this locally.
pub struct SenderAddress(String);

impl SenderAddress {
    /// JSON field name used by the gateway sendmail endpoint (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mail recipient address (`to`).
///
/// Invariant: non-empty after trimming. Construction trims surrounding
/// whitespace and is idempotent: re-wrapping an already-trimmed value is a
/// no-op.
pub struct Recipient(String);

impl Recipient {
    /// JSON field name used by the gateway sendmail endpoint (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (trimmed, non-empty) recipient address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the trimmed address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque bearer token returned by the gateway login endpoint.
///
/// Invariant: non-empty after trimming. Valid until process exit; the
/// gateway flow has no refresh or expiry handling.
pub struct BearerToken(String);

impl BearerToken {
    /// JSON field name carrying the token in the login response (`accessToken`).
    pub const FIELD: &'static str = "accessToken";

    /// Create a validated [`BearerToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS sender identifier (`sender`).
///
/// Invariant: non-empty after trimming. This is a gateway-side identifier
/// (short code or alphanumeric id), not a mail address.
pub struct SmsSenderId(String);

impl SmsSenderId {
    /// JSON field name used by the gateway sendsms endpoint (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`SmsSenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated SMS recipient as sent to the gateway (`recipient`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you
/// want E.164 normalization, parse into [`SmsPhoneNumber`] and convert it
/// into [`SmsRecipient`].
pub struct SmsRecipient(String);

impl SmsRecipient {
    /// JSON field name used by the gateway sendsms endpoint (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Create a validated (non-empty) raw SMS recipient.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SmsPhoneNumber> for SmsRecipient {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: SmsPhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed SMS phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct SmsPhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl SmsPhoneNumber {
    /// JSON field name used by the gateway sendsms endpoint (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Parse an ISO 3166 alpha-2 region code (`fr`, `FR`) into the default
    /// region accepted by [`SmsPhoneNumber::parse`].
    pub fn region(input: &str) -> Result<country::Id, ValidationError> {
        let trimmed = input.trim();
        trimmed
            .to_uppercase()
            .parse()
            .map_err(|_| ValidationError::InvalidRegion {
                input: trimmed.to_owned(),
            })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for SmsPhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for SmsPhoneNumber {}

impl std::hash::Hash for SmsPhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let username = Username::new(" user ").unwrap();
        assert_eq!(username.as_str(), "user");
        assert!(Username::new("").is_err());

        let password = Password::new(" secret ").unwrap();
        assert_eq!(password.as_str(), " secret ");
        assert!(Password::new("").is_err());

        let sender = SenderAddress::new(" noreply@x.com ").unwrap();
        assert_eq!(sender.as_str(), "noreply@x.com");
        assert!(SenderAddress::new("  ").is_err());

        let token = BearerToken::new(" abc123 ").unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert!(BearerToken::new("  ").is_err());
    }

    #[test]
    fn recipient_trimming_is_idempotent() {
        let first = Recipient::new(" a@x.com ").unwrap();
        assert_eq!(first.as_str(), "a@x.com");

        let second = Recipient::new(first.as_str()).unwrap();
        assert_eq!(second, first);
        assert!(Recipient::new("   ").is_err());
    }

    #[test]
    fn sms_recipient_trims_and_exposes_raw() {
        let raw = SmsRecipient::new(" +33612345678 ").unwrap();
        assert_eq!(raw.as_str(), "+33612345678");
        assert!(SmsRecipient::new("").is_err());
    }

    #[test]
    fn sms_phone_number_parsing_and_equality_use_e164() {
        let p1 = SmsPhoneNumber::parse(None, "+33612345678").unwrap();
        let p2 = SmsPhoneNumber::parse(None, "+33 6 12 34 56 78").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+33612345678");
        assert_eq!(p1.raw(), "+33612345678");

        let raw: SmsRecipient = p1.clone().into();
        assert_eq!(raw.as_str(), "+33612345678");
        assert!(SmsPhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn sms_phone_number_uses_default_region() {
        let pn = SmsPhoneNumber::parse(Some(phonenumber::country::Id::FR), "0612345678").unwrap();
        assert_eq!(pn.e164(), "+33612345678");
    }

    #[test]
    fn region_codes_parse_case_insensitively() {
        assert_eq!(
            SmsPhoneNumber::region("fr").unwrap(),
            phonenumber::country::Id::FR
        );
        assert_eq!(
            SmsPhoneNumber::region(" RU ").unwrap(),
            phonenumber::country::Id::RU
        );
        assert!(matches!(
            SmsPhoneNumber::region("nowhere"),
            Err(ValidationError::InvalidRegion { .. })
        ));
    }
}
