use std::fmt;
use std::str::FromStr;

/// Network authentication type as written in the `T:` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecurityType {
    /// WPA/WPA2/WPA3 personal
    #[default]
    Wpa,
    /// Legacy WEP
    Wep,
    /// No password
    Open,
}

impl SecurityType {
    /// Value of the `T:` field (empty for open networks)
    pub fn field_value(&self) -> &'static str {
        match self {
            SecurityType::Wpa => "WPA",
            SecurityType::Wep => "WEP",
            SecurityType::Open => "",
        }
    }

    /// Whether a password is required
    pub fn requires_password(&self) -> bool {
        !matches!(self, SecurityType::Open)
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityType::Open => f.write_str("OPEN"),
            other => f.write_str(other.field_value()),
        }
    }
}

impl FromStr for SecurityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WPA" | "WPA2" | "WPA3" => Ok(SecurityType::Wpa),
            "WEP" => Ok(SecurityType::Wep),
            "OPEN" | "NOPASS" | "" => Ok(SecurityType::Open),
            other => Err(format!("unknown security type: {other}")),
        }
    }
}

/// Wi-Fi network credentials
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Credentials {
    /// Network name (1-32 bytes)
    pub ssid: String,
    /// Pre-shared key (1-63 bytes), `None` for open networks
    pub password: Option<String>,
    /// Authentication type
    pub security: SecurityType,
    /// Whether the network does not broadcast its SSID
    pub hidden: bool,
}

impl Credentials {
    /// WPA-secured network
    pub fn wpa(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: Some(password.into()),
            security: SecurityType::Wpa,
            hidden: false,
        }
    }

    /// WEP-secured network
    pub fn wep(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: Some(password.into()),
            security: SecurityType::Wep,
            hidden: false,
        }
    }

    /// Open network
    pub fn open(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: None,
            security: SecurityType::Open,
            hidden: false,
        }
    }

    /// Mark the network as hidden (or not)
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Password as written to the payload, empty strings treated as absent
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
