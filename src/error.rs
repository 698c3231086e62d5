//! Error types for encoding, payload parsing and matrix reading.

use thiserror::Error;

use crate::models::{ECLevel, Version};

/// Error during credential encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Malformed or oversized SSID/password, or a missing password on a secured network.
    #[error("invalid credentials: {field} {reason}")]
    InvalidCredentials {
        /// `"ssid"` or `"password"`
        field: &'static str,
        /// What is wrong with the field
        reason: String,
    },

    /// No version up to `max_version` holds the data at `ec_level`.
    #[error("payload of {data_len} bytes does not fit any version up to {max_version} at EC level {ec_level}")]
    PayloadTooLarge {
        /// Payload length in bytes
        data_len: usize,
        /// Requested EC level
        ec_level: ECLevel,
        /// Largest version that was tried
        max_version: Version,
    },

    /// Internal consistency check failed during assembly; this is a bug.
    #[error("internal assembly invariant violated: {detail}")]
    InvariantViolation {
        /// Which check failed
        detail: String,
    },
}

impl EncodeError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EncodeError::InvalidCredentials {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!(%detail, "assembly invariant violated");
        EncodeError::InvariantViolation { detail }
    }
}

/// Error while parsing a `WIFI:` payload back into credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Text does not begin with `WIFI:`
    #[error("payload does not start with WIFI:")]
    MissingPrefix,

    /// Text does not end with the empty `;;` field
    #[error("payload is not terminated with ;;")]
    MissingTerminator,

    /// A field without a `key:` prefix
    #[error("field {field:?} has no ':' separator")]
    MalformedField {
        /// Raw field text
        field: String,
    },

    /// A key other than `T`, `S`, `P` or `H`
    #[error("unknown field key {key:?}")]
    UnknownField {
        /// Key as written
        key: String,
    },

    /// The same key given twice
    #[error("field {key} appears more than once")]
    DuplicateField {
        /// Repeated key
        key: char,
    },

    /// `T` or `S` is absent
    #[error("missing required field {key}")]
    MissingField {
        /// Missing key
        key: char,
    },

    /// A value the key does not accept
    #[error("invalid value {value:?} for field {key}")]
    InvalidValue {
        /// Field key
        key: char,
        /// Unescaped value
        value: String,
    },

    /// Backslash as the last character
    #[error("dangling escape character at end of payload")]
    DanglingEscape,
}

/// Error while reading a module matrix back into data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Not square, or a side that is not 17 + 4v for v in 1..=40
    #[error("matrix of {width}x{height} modules is not a valid QR symbol size")]
    InvalidSize {
        /// Columns
        width: usize,
        /// Rows
        height: usize,
    },

    /// Neither version block decodes to the version implied by the size
    #[error("version information does not match symbol size (expected {expected})")]
    VersionMismatch {
        /// Version implied by the size
        expected: Version,
    },

    /// Neither format copy is within three bit errors of a valid word
    #[error("format information is unreadable")]
    FormatInfo,

    /// More errors in a block than its EC codewords can repair
    #[error("Reed-Solomon block {block} is uncorrectable: {reason}")]
    Uncorrectable {
        /// Block index in reading order
        block: usize,
        /// Decoder stage that gave up
        reason: &'static str,
    },

    /// Kanji, ECI, FNC1 or structured append
    #[error("unsupported segment mode indicator {mode:#06b}")]
    UnsupportedMode {
        /// 4-bit mode indicator
        mode: u8,
    },

    /// Data codewords ran out inside a segment
    #[error("bit stream ended while reading {context}")]
    Truncated {
        /// What was being read
        context: &'static str,
    },

    /// A numeric or alphanumeric value outside its character set
    #[error("segment data is malformed: {context}")]
    MalformedSegment {
        /// What was being decoded
        context: &'static str,
    },
}
