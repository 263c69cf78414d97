//! Wscan - Cross-Platform Wireless Scan Orchestrator
//!
//! This library discovers nearby WiFi networks and Bluetooth devices by
//! driving the scanning utilities each operating system already ships
//! (iwlist/nmcli on Linux, the airport utility on macOS, netsh on Windows,
//! hcitool for Bluetooth) and normalizing their text output into a single
//! record format.
//!
//! # Warning
//! This tool is designed for ethical wireless auditing and security
//! assessment purposes only. Users are responsible for ensuring they have
//! proper authorization before scanning any networks or devices.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod executor;
pub mod parsers;
pub mod platform;
pub mod reporting;
pub mod scanner;

pub use error::{Result, ScanError};

/// Common types and traits used throughout the application
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// BSSID/address placeholder when a tool does not report one.
    pub const UNKNOWN_ADDRESS: &str = "Unknown";

    /// Device name placeholder when a peer does not advertise one.
    pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum SecurityProtocol {
        #[serde(rename = "Open")]
        Open,
        #[serde(rename = "WEP")]
        Wep,
        #[serde(rename = "WPA2-PSK")]
        Wpa2Psk,
        #[serde(rename = "WPA3-PSK")]
        Wpa3Psk,
        #[serde(rename = "Unknown")]
        Unknown,
    }

    impl fmt::Display for SecurityProtocol {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let s = match self {
                SecurityProtocol::Open => "Open",
                SecurityProtocol::Wep => "WEP",
                SecurityProtocol::Wpa2Psk => "WPA2-PSK",
                SecurityProtocol::Wpa3Psk => "WPA3-PSK",
                SecurityProtocol::Unknown => "Unknown",
            };
            write!(f, "{}", s)
        }
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum EncryptionCipher {
        #[serde(rename = "AES")]
        Aes,
        #[serde(rename = "WEP")]
        Wep,
        #[serde(rename = "None")]
        None,
        #[serde(rename = "Unknown")]
        Unknown,
    }

    impl From<SecurityProtocol> for EncryptionCipher {
        /// The cipher is fully determined by the security protocol; none of
        /// the scanning tools report it independently.
        fn from(security: SecurityProtocol) -> Self {
            match security {
                SecurityProtocol::Open => EncryptionCipher::None,
                SecurityProtocol::Wep => EncryptionCipher::Wep,
                SecurityProtocol::Wpa2Psk | SecurityProtocol::Wpa3Psk => EncryptionCipher::Aes,
                SecurityProtocol::Unknown => EncryptionCipher::Unknown,
            }
        }
    }

    impl fmt::Display for EncryptionCipher {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let s = match self {
                EncryptionCipher::Aes => "AES",
                EncryptionCipher::Wep => "WEP",
                EncryptionCipher::None => "None",
                EncryptionCipher::Unknown => "Unknown",
            };
            write!(f, "{}", s)
        }
    }

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum FrequencyBand {
        #[serde(rename = "2.4GHz")]
        Band2_4GHz,
        #[serde(rename = "5GHz")]
        Band5GHz,
    }

    impl FrequencyBand {
        /// Channels 1-14 live in the 2.4GHz band, everything above is 5GHz.
        pub fn from_channel(channel: u32) -> Self {
            if channel > 14 {
                FrequencyBand::Band5GHz
            } else {
                FrequencyBand::Band2_4GHz
            }
        }
    }

    impl fmt::Display for FrequencyBand {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let s = match self {
                FrequencyBand::Band2_4GHz => "2.4GHz",
                FrequencyBand::Band5GHz => "5GHz",
            };
            write!(f, "{}", s)
        }
    }

    /// One discovered access point, normalized across tool formats.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub struct WifiNetwork {
        pub ssid: String,
        pub bssid: String,
        pub security: SecurityProtocol,
        pub signal: i32,
        pub channel: u32,
        #[serde(rename = "frequencyBand")]
        pub frequency: FrequencyBand,
        #[serde(rename = "encryptionCipher")]
        pub cipher: EncryptionCipher,
    }

    impl WifiNetwork {
        /// Build a network record, deriving the cipher from the security
        /// protocol and the band from the channel when the tool did not
        /// report one directly.
        pub fn new(
            ssid: String,
            bssid: String,
            security: SecurityProtocol,
            signal: i32,
            channel: u32,
            frequency: Option<FrequencyBand>,
        ) -> Self {
            Self {
                ssid,
                bssid,
                security,
                signal,
                channel,
                frequency: frequency.unwrap_or_else(|| FrequencyBand::from_channel(channel)),
                cipher: EncryptionCipher::from(security),
            }
        }
    }

    /// One discovered Bluetooth peer.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub struct BluetoothDevice {
        pub name: String,
        pub address: String,
        pub rssi: i32,
        pub services: Vec<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct WifiScanResult {
        pub success: bool,
        pub platform: String,
        pub networks: Vec<WifiNetwork>,
        pub timestamp: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BluetoothScanResult {
        pub success: bool,
        pub platform: String,
        pub devices: Vec<BluetoothDevice>,
        pub timestamp: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }
}
