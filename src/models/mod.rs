/// Wi-Fi credentials
pub mod credentials;
/// Packed bit matrix
pub mod matrix;
/// Version, EC level, mask and finished symbol types
pub mod qr_code;

pub use credentials::{Credentials, SecurityType};
pub use matrix::BitMatrix;
pub use qr_code::{ECLevel, MaskPattern, QrMatrix, Version};
