//! wifi_qr - Wi-Fi join QR codes from network credentials
//!
//! Turns an SSID, password and security type into the standard
//! `WIFI:T:..;S:..;P:..;H:..;;` payload and encodes it as a QR Model 2 symbol
//! (versions 1-40, EC levels L/M/Q/H). The finished matrix can be rendered to
//! a grayscale image, SVG or terminal text, and read back for verification.
//!
//! ```no_run
//! use wifi_qr::{Credentials, encode_credentials, render};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode_credentials(&Credentials::wpa("HomeNet", "s3cr3t!"))?;
//! println!("{}", qr.payload);
//! render::to_luma_image(&qr.matrix, 8).save("homenet.png")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Encoding defaults and per-call options
pub mod config;
/// QR encoding stages (segmentation, Reed-Solomon, assembly)
pub mod encoder;
/// Error types
pub mod error;
/// Core data structures (Credentials, BitMatrix, QrMatrix, Version, etc.)
pub mod models;
/// `WIFI:` payload formatting and parsing
pub mod payload;
/// Matrix reader used to verify finished symbols
pub mod reader;
/// Image, SVG and text output
pub mod render;

mod pipeline;

pub use config::EncodeOptions;
pub use error::{EncodeError, ParseError, ReadError};
pub use models::{BitMatrix, Credentials, ECLevel, MaskPattern, QrMatrix, SecurityType, Version};
pub use payload::Payload;
pub use pipeline::{WifiQr, encode_bytes, encode_credentials, encode_credentials_with};
pub use reader::{ReadResult, read_matrix, read_symbol};
