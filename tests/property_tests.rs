//! Property tests for payload formatting and the encode/read round trip.

mod common;

use common::{init_test_logging, test_proptest_config};
use proptest::prelude::*;
use wifi_qr::payload::{self, escape, unescape};
use wifi_qr::{Credentials, ECLevel, EncodeOptions, SecurityType, encode_bytes, read_matrix};

fn arb_ssid() -> impl Strategy<Value = String> {
    // Printable ASCII covers every reserved character; the second arm adds
    // multi-byte text that stays within 32 bytes.
    prop_oneof!["[ -~]{1,32}", "\\PC{1,8}"]
}

fn arb_password() -> impl Strategy<Value = String> {
    prop_oneof!["[ -~]{1,63}", "\\PC{1,15}"]
}

fn arb_credentials() -> impl Strategy<Value = Credentials> {
    (
        arb_ssid(),
        arb_password(),
        prop::sample::select(vec![SecurityType::Wpa, SecurityType::Wep, SecurityType::Open]),
        any::<bool>(),
    )
        .prop_map(|(ssid, password, security, hidden)| Credentials {
            ssid,
            password: (security != SecurityType::Open).then_some(password),
            security,
            hidden,
        })
}

/// Any shape of credentials, including empty and misplaced passwords
fn arb_unchecked_credentials() -> impl Strategy<Value = Credentials> {
    (
        arb_ssid(),
        prop::option::of(prop_oneof![Just(String::new()), arb_password()]),
        prop::sample::select(vec![SecurityType::Wpa, SecurityType::Wep, SecurityType::Open]),
        any::<bool>(),
    )
        .prop_map(|(ssid, password, security, hidden)| Credentials {
            ssid,
            password,
            security,
            hidden,
        })
}

fn arb_ec_level() -> impl Strategy<Value = ECLevel> {
    prop::sample::select(ECLevel::ALL.to_vec())
}

proptest! {
    #![proptest_config(test_proptest_config(256))]

    /// unformat(format(c)) == c for every valid credential set.
    #[test]
    fn payload_roundtrip(credentials in arb_credentials()) {
        let formatted = payload::format(&credentials).unwrap();
        let parsed = payload::unformat(formatted.as_str()).unwrap();
        prop_assert_eq!(parsed, credentials);
    }

    /// Whatever `format` accepts reads back unchanged.
    #[test]
    fn accepted_credentials_roundtrip(credentials in arb_unchecked_credentials()) {
        if let Ok(formatted) = payload::format(&credentials) {
            let parsed = payload::unformat(formatted.as_str()).unwrap();
            prop_assert_eq!(parsed, credentials);
        }
    }

    /// Escaping is reversible and leaves no bare separator behind.
    #[test]
    fn escape_roundtrip(value in "\\PC{0,40}") {
        let escaped = escape(&value);
        prop_assert_eq!(unescape(&escaped), value.clone());
        prop_assert_eq!(escaped.matches("\\;").count(), value.matches(';').count());
    }
}

proptest! {
    #![proptest_config(test_proptest_config(24))]

    /// Any byte string decodes back from its matrix at any EC level.
    #[test]
    fn encode_read_roundtrip(
        data in prop::collection::vec(any::<u8>(), 0..300),
        ec_level in arb_ec_level(),
    ) {
        init_test_logging();
        let matrix = encode_bytes(&data, &EncodeOptions::new().ec_level(ec_level)).unwrap();
        let read = read_matrix(&matrix).unwrap();
        prop_assert_eq!(read.data, data);
        prop_assert_eq!(read.ec_level, ec_level);
    }

    /// Wi-Fi payloads survive the full pipeline.
    #[test]
    fn credentials_survive_encoding(credentials in arb_credentials()) {
        let qr = wifi_qr::encode_credentials_with(
            &credentials,
            &EncodeOptions::new().ec_level(ECLevel::M),
        ).unwrap();
        let read = read_matrix(&qr.matrix).unwrap();
        let parsed = payload::unformat(read.text().unwrap()).unwrap();
        prop_assert_eq!(parsed, credentials);
    }
}
