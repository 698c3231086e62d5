//! Staged encoding flow: format, segment, error correction, assembly.
//!
//! Each stage consumes the previous stage's output; any failure aborts the
//! whole run without partial output.

use tracing::{debug, debug_span};

use crate::config::EncodeOptions;
use crate::encoder::{assemble, blocks, interleave, segment};
use crate::error::EncodeError;
use crate::models::{Credentials, QrMatrix};
use crate::payload::{self, Payload};

/// A Wi-Fi join code: the payload text and the matrix that carries it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiQr {
    /// `WIFI:` payload encoded in the matrix
    pub payload: Payload,
    /// Finished symbol with quiet zone
    pub matrix: QrMatrix,
}

/// Encode credentials with environment defaults
pub fn encode_credentials(credentials: &Credentials) -> Result<WifiQr, EncodeError> {
    encode_credentials_with(credentials, &EncodeOptions::default())
}

/// Encode credentials with explicit options
pub fn encode_credentials_with(
    credentials: &Credentials,
    options: &EncodeOptions,
) -> Result<WifiQr, EncodeError> {
    let span = debug_span!(
        "encode_credentials",
        security = %credentials.security,
        hidden = credentials.hidden
    );
    let _guard = span.enter();

    let payload = payload::format(credentials)?;
    debug!(bytes = payload.len(), "formatted payload");
    let matrix = encode_bytes(payload.as_bytes(), options)?;
    Ok(WifiQr { payload, matrix })
}

/// Encode arbitrary bytes into a finished matrix
pub fn encode_bytes(data: &[u8], options: &EncodeOptions) -> Result<QrMatrix, EncodeError> {
    let span = debug_span!("encode_bytes", len = data.len());
    let _guard = span.enter();

    let segmented = segment(data, options)?;
    let (version, ec_level) = (segmented.version, segmented.ec_level);
    let data_codewords = segmented.data_codewords();

    let blocks = blocks::encode(&data_codewords, version, ec_level)?;
    let interleaved = interleave(&blocks);
    debug!(
        version = version.number(),
        ec_level = %ec_level,
        blocks = blocks.len(),
        codewords = interleaved.len(),
        "computed error correction"
    );

    assemble(&interleaved, version, ec_level, options)
}
