//! Text parsers for the scanning tools' output formats.
//!
//! Every parser is a total function: arbitrary input (including binary
//! garbage) yields a valid, possibly empty, list of records. Malformed
//! lines or blocks are skipped; nothing here panics or returns an error.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::types::{
    BluetoothDevice, FrequencyBand, SecurityProtocol, WifiNetwork, UNKNOWN_ADDRESS,
    UNKNOWN_DEVICE_NAME,
};

lazy_static! {
    static ref RE_ESSID: Regex = Regex::new(r#"ESSID:"([^"]*)""#).unwrap();
    static ref RE_BSSID: Regex =
        Regex::new(r"Address: ([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})").unwrap();
    static ref RE_CHANNEL: Regex = Regex::new(r"Channel:(\d+)").unwrap();
    static ref RE_SIGNAL: Regex = Regex::new(r"Signal level=(-?\d+)").unwrap();
    static ref RE_ENC_KEY: Regex = Regex::new(r"Encryption key:(on|off)").unwrap();
    static ref RE_WPA2: Regex = Regex::new(r"IE: IEEE 802\.11i/WPA2").unwrap();
    static ref RE_WPA3: Regex = Regex::new(r"WPA3").unwrap();
    static ref RE_NETSH_SSID: Regex = Regex::new(r#"SSID name\s*:\s*"(.+)""#).unwrap();
    static ref RE_NETSH_PROFILE: Regex = Regex::new(r"All User Profile\s*:\s*(.+)").unwrap();
    static ref RE_HCITOOL: Regex =
        Regex::new(r"([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})(?:\s+(.*\S))?").unwrap();
}

/// Parse `iwlist scan` output (Linux primary).
///
/// Output is a sequence of access-point blocks, each introduced by a
/// `Cell NN - Address: ...` line. Blocks carrying neither an SSID nor a
/// BSSID are skipped.
pub fn parse_iwlist(raw: &str) -> Vec<WifiNetwork> {
    let mut networks = Vec::new();

    // The text before the first "Cell " is interface chatter.
    for cell in raw.split("Cell ").skip(1) {
        let ssid = RE_ESSID
            .captures(cell)
            .map(|c| c[1].to_string());
        let bssid = RE_BSSID
            .captures(cell)
            .map(|c| c[1].to_uppercase());

        if ssid.is_none() && bssid.is_none() {
            debug!("Skipping iwlist cell without SSID or address");
            continue;
        }

        let channel = RE_CHANNEL
            .captures(cell)
            .and_then(|c| c[1].parse::<u32>().ok())
            .unwrap_or(0);
        let signal = RE_SIGNAL
            .captures(cell)
            .and_then(|c| c[1].parse::<i32>().ok())
            .unwrap_or(-100);

        let security = if RE_WPA3.is_match(cell) {
            SecurityProtocol::Wpa3Psk
        } else if RE_WPA2.is_match(cell) {
            SecurityProtocol::Wpa2Psk
        } else if RE_ENC_KEY
            .captures(cell)
            .map_or(false, |c| &c[1] == "on")
        {
            SecurityProtocol::Wep
        } else {
            SecurityProtocol::Open
        };

        networks.push(WifiNetwork::new(
            ssid.unwrap_or_default(),
            bssid.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            security,
            signal,
            channel,
            None,
        ));
    }

    networks
}

/// Parse the macOS airport utility's `-s` listing.
///
/// Each data line is whitespace-separated columns
/// `[ssid, bssid, security, signal, channel, frequency]`; lines with fewer
/// than six columns are skipped.
pub fn parse_airport(raw: &str) -> Vec<WifiNetwork> {
    let mut networks = Vec::new();

    for line in raw.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }

        let security_column = parts[2];
        let security = if security_column.contains("WPA3") {
            SecurityProtocol::Wpa3Psk
        } else if security_column.contains("WPA2") {
            SecurityProtocol::Wpa2Psk
        } else if security_column.contains("WEP") {
            SecurityProtocol::Wep
        } else {
            SecurityProtocol::Open
        };

        let signal = parts[3].parse::<i32>().unwrap_or(-100);
        let channel = parts[4].parse::<u32>().unwrap_or(0);
        let frequency = if parts[5].contains('5') {
            FrequencyBand::Band5GHz
        } else {
            FrequencyBand::Band2_4GHz
        };

        networks.push(WifiNetwork::new(
            parts[0].to_string(),
            parts[1].to_uppercase(),
            security,
            signal,
            channel,
            Some(frequency),
        ));
    }

    networks
}

/// Parse `netsh wlan show profiles` output (Windows).
///
/// Profile enumeration carries no live radio data, so every entry gets
/// placeholder security/signal values. Both the quoted `SSID name : "..."`
/// form and the `All User Profile : ...` form netsh prints are accepted.
pub fn parse_netsh(raw: &str) -> Vec<WifiNetwork> {
    let mut networks = Vec::new();

    for line in raw.lines() {
        let ssid = if let Some(c) = RE_NETSH_SSID.captures(line) {
            c[1].trim().to_string()
        } else if let Some(c) = RE_NETSH_PROFILE.captures(line) {
            c[1].trim().to_string()
        } else {
            continue;
        };

        if ssid.is_empty() {
            continue;
        }

        networks.push(WifiNetwork::new(
            ssid,
            UNKNOWN_ADDRESS.to_string(),
            SecurityProtocol::Wpa2Psk,
            -50,
            0,
            None,
        ));
    }

    networks
}

/// Parse terse `nmcli -t -f BSSID,SSID,CHAN,SIGNAL,SECURITY dev wifi`
/// output (Linux fallback).
///
/// Fields are colon-separated with `\:` escapes inside the BSSID. Signal
/// is a 0-100 percentage, mapped onto the usual dBm range.
pub fn parse_nmcli(raw: &str) -> Vec<WifiNetwork> {
    let mut networks = Vec::new();

    for line in raw.lines() {
        let fields = split_nmcli_fields(line);
        if fields.len() < 5 {
            continue;
        }

        let bssid = fields[0].to_uppercase();
        let ssid = fields[1].clone();
        if bssid.is_empty() && ssid.is_empty() {
            continue;
        }

        let channel = fields[2].parse::<u32>().unwrap_or(0);
        let signal = fields[3]
            .parse::<i32>()
            .map(|percent| percent.clamp(0, 100) / 2 - 100)
            .unwrap_or(-100);

        let security_column = &fields[4];
        let security = if security_column.contains("WPA3") {
            SecurityProtocol::Wpa3Psk
        } else if security_column.contains("WPA2") {
            SecurityProtocol::Wpa2Psk
        } else if security_column.contains("WEP") {
            SecurityProtocol::Wep
        } else if security_column.trim().is_empty() {
            SecurityProtocol::Open
        } else {
            SecurityProtocol::Unknown
        };

        let bssid = if bssid.is_empty() {
            UNKNOWN_ADDRESS.to_string()
        } else {
            bssid
        };

        networks.push(WifiNetwork::new(ssid, bssid, security, signal, channel, None));
    }

    networks
}

/// Split one terse-mode nmcli line on unescaped colons, resolving the
/// `\:` escapes nmcli uses inside MAC addresses.
fn split_nmcli_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Parse `hcitool scan` output (Linux Bluetooth).
///
/// Device lines are `<address> <name>`; the scanner header and anything
/// else that does not carry a MAC address is ignored. RSSI and service
/// data are not reported by hcitool, so placeholders are used.
pub fn parse_hcitool(raw: &str) -> Vec<BluetoothDevice> {
    let mut devices = Vec::new();

    for line in raw.lines() {
        if let Some(captures) = RE_HCITOOL.captures(line) {
            let name = captures
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_DEVICE_NAME.to_string());

            devices.push(BluetoothDevice {
                name,
                address: captures[1].to_uppercase(),
                rssi: -60,
                services: vec!["Unknown".to_string()],
            });
        }
    }

    devices
}
