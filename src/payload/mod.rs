//! Wi-Fi configuration payload formatting and parsing
//!
//! The canonical form written by [`format`] is
//! `WIFI:T:<type>;S:<ssid>;P:<password>;H:<true|false>;;` with the `P:` field
//! left out for open networks. [`unformat`] accepts fields in any order.

/// Backslash escaping of reserved characters
pub mod escape;

use std::fmt;

use crate::error::{EncodeError, ParseError};
use crate::models::{Credentials, SecurityType};

pub use escape::{escape, unescape};

/// Longest SSID in bytes
pub const MAX_SSID_BYTES: usize = 32;
/// Longest pre-shared key in bytes
pub const MAX_PASSWORD_BYTES: usize = 63;

const PREFIX: &str = "WIFI:";

/// Formatted Wi-Fi payload, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    /// Payload text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Payload bytes as fed to the segmenter
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty (never true for a formatted payload)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Check the length and presence rules on credentials
pub fn validate(credentials: &Credentials) -> Result<(), EncodeError> {
    let ssid_len = credentials.ssid.len();
    if ssid_len == 0 {
        return Err(EncodeError::invalid("ssid", "must not be empty"));
    }
    if ssid_len > MAX_SSID_BYTES {
        return Err(EncodeError::invalid(
            "ssid",
            format!("is {ssid_len} bytes, limit is {MAX_SSID_BYTES}"),
        ));
    }

    match (credentials.security, credentials.password.as_deref()) {
        (SecurityType::Open, None) => Ok(()),
        (SecurityType::Open, Some(_)) => Err(EncodeError::invalid(
            "password",
            "must be absent for an open network",
        )),
        (security, None | Some("")) => Err(EncodeError::invalid(
            "password",
            format!("is required for {security} networks"),
        )),
        (_, Some(password)) if password.len() > MAX_PASSWORD_BYTES => Err(EncodeError::invalid(
            "password",
            format!(
                "is {} bytes, limit is {MAX_PASSWORD_BYTES}",
                password.len()
            ),
        )),
        (_, Some(_)) => Ok(()),
    }
}

/// Build the canonical payload for `credentials`
pub fn format(credentials: &Credentials) -> Result<Payload, EncodeError> {
    validate(credentials)?;

    let mut out = String::with_capacity(32 + 2 * credentials.ssid.len());
    out.push_str(PREFIX);
    out.push_str("T:");
    out.push_str(credentials.security.field_value());
    out.push(';');
    out.push_str("S:");
    out.push_str(&escape(&credentials.ssid));
    out.push(';');
    if let Some(password) = credentials.password_str() {
        out.push_str("P:");
        out.push_str(&escape(password));
        out.push(';');
    }
    out.push_str("H:");
    out.push_str(if credentials.hidden { "true" } else { "false" });
    out.push_str(";;");

    Ok(Payload(out))
}

/// Parse a payload back into credentials
///
/// Field values are unescaped. No length validation is applied; pass the
/// result to [`validate`] if needed.
pub fn unformat(payload: &str) -> Result<Credentials, ParseError> {
    let body = payload
        .strip_prefix(PREFIX)
        .ok_or(ParseError::MissingPrefix)?;
    let fields = split_fields(body)?;

    let mut security: Option<SecurityType> = None;
    let mut ssid: Option<String> = None;
    let mut password: Option<String> = None;
    let mut hidden: Option<bool> = None;

    for field in fields {
        let (key, raw_value) = split_key(field)?;
        let value = unescape(raw_value);
        match key {
            'T' => {
                if security.is_some() {
                    return Err(ParseError::DuplicateField { key });
                }
                let parsed = value
                    .parse::<SecurityType>()
                    .map_err(|_| ParseError::InvalidValue { key, value })?;
                security = Some(parsed);
            }
            'S' => {
                if ssid.replace(value).is_some() {
                    return Err(ParseError::DuplicateField { key });
                }
            }
            'P' => {
                if password.replace(value).is_some() {
                    return Err(ParseError::DuplicateField { key });
                }
            }
            'H' => {
                if hidden.is_some() {
                    return Err(ParseError::DuplicateField { key });
                }
                let parsed = match value.to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(ParseError::InvalidValue { key, value }),
                };
                hidden = Some(parsed);
            }
            other => {
                return Err(ParseError::UnknownField {
                    key: other.to_string(),
                });
            }
        }
    }

    let security = security.ok_or(ParseError::MissingField { key: 'T' })?;
    let ssid = ssid.ok_or(ParseError::MissingField { key: 'S' })?;
    let password = password.filter(|p| !p.is_empty());
    if security == SecurityType::Open {
        if let Some(value) = password {
            return Err(ParseError::InvalidValue { key: 'P', value });
        }
    }

    Ok(Credentials {
        ssid,
        password,
        security,
        hidden: hidden.unwrap_or(false),
    })
}

/// Split on unescaped `;`, requiring the body to end with the empty `;;` field
fn split_fields(body: &str) -> Result<Vec<&str>, ParseError> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ';' => {
                fields.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if escaped {
        return Err(ParseError::DanglingEscape);
    }
    if start != body.len() || fields.last() != Some(&"") {
        return Err(ParseError::MissingTerminator);
    }
    fields.pop();

    if let Some(empty) = fields.iter().find(|f| f.is_empty()) {
        return Err(ParseError::MalformedField {
            field: (*empty).to_string(),
        });
    }
    Ok(fields)
}

fn split_key(field: &str) -> Result<(char, &str), ParseError> {
    let (key, value) = field
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedField {
            field: field.to_string(),
        })?;
    let key = match key {
        "T" => 'T',
        "S" => 'S',
        "P" => 'P',
        "H" => 'H',
        _ => {
            return Err(ParseError::UnknownField {
                key: key.to_string(),
            });
        }
    };
    Ok((key, value))
}
