use colored::*;

use crate::platform::PlatformReport;
use crate::types::{BluetoothScanResult, SecurityProtocol, WifiScanResult};

/// Enhanced display utilities for clean, colored output and formatting
pub struct DisplayManager {
    use_colors: bool,
    quiet_mode: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self::with_quiet(false)
    }

    pub fn with_quiet(quiet: bool) -> Self {
        // Simple check for color support - assume true for most terminals
        let use_colors = std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map_or(true, |term| term != "dumb");

        Self {
            use_colors,
            quiet_mode: quiet,
        }
    }

    pub fn print_banner(&self, title: &str, subtitle: Option<&str>) {
        if self.quiet_mode {
            return;
        }

        if self.use_colors {
            println!("{}", title.bright_cyan().bold());
            if let Some(sub) = subtitle {
                println!("{}", sub.bright_black());
            }
        } else {
            println!("{}", title);
            if let Some(sub) = subtitle {
                println!("{}", sub);
            }
        }
    }

    pub fn print_section_header(&self, title: &str) {
        if self.quiet_mode {
            return;
        }

        println!();
        if self.use_colors {
            println!("{}", title.bright_white().bold());
            println!("{}", "─".repeat(title.chars().count()).bright_black());
        } else {
            println!("{}", title);
            println!("{}", "-".repeat(title.chars().count()));
        }
    }

    pub fn print_info(&self, message: &str) {
        if self.quiet_mode {
            return;
        }
        if self.use_colors {
            println!("{} {}", "[*]".cyan(), message);
        } else {
            println!("[*] {}", message);
        }
    }

    pub fn print_success(&self, message: &str) {
        if self.quiet_mode {
            return;
        }
        if self.use_colors {
            println!("{} {}", "[+]".green().bold(), message);
        } else {
            println!("[+] {}", message);
        }
    }

    pub fn print_warning(&self, message: &str) {
        if self.quiet_mode {
            return;
        }
        if self.use_colors {
            println!("{} {}", "[!]".yellow().bold(), message.yellow());
        } else {
            println!("[!] {}", message);
        }
    }

    pub fn print_error(&self, message: &str) {
        if self.use_colors {
            eprintln!("{} {}", "[x]".red().bold(), message.red());
        } else {
            eprintln!("[x] {}", message);
        }
    }

    /// Print discovered WiFi networks as a table, or the diagnostic
    /// message when the scan came back empty.
    pub fn print_wifi_result(&self, result: &WifiScanResult) {
        if self.quiet_mode {
            return;
        }

        if result.networks.is_empty() {
            if let Some(message) = &result.message {
                self.print_warning(message);
            }
            return;
        }

        println!(
            "  {:<24} {:<18} {:<10} {:>7} {:>4}  {:<7} {}",
            "SSID", "BSSID", "SECURITY", "SIGNAL", "CHAN", "BAND", "CIPHER"
        );

        for net in &result.networks {
            let ssid = if net.ssid.is_empty() {
                "<hidden>".to_string()
            } else {
                net.ssid.clone()
            };

            if self.use_colors {
                let security = match net.security {
                    SecurityProtocol::Open => net.security.to_string().red().to_string(),
                    SecurityProtocol::Wep => net.security.to_string().yellow().to_string(),
                    _ => net.security.to_string().green().to_string(),
                };
                println!(
                    "  {:<24} {:<18} {:<10} {:>7} {:>4}  {:<7} {}",
                    ssid.bright_white(),
                    net.bssid.bright_black(),
                    security,
                    format!("{} dBm", net.signal),
                    net.channel,
                    net.frequency.to_string(),
                    net.cipher.to_string()
                );
            } else {
                println!(
                    "  {:<24} {:<18} {:<10} {:>7} {:>4}  {:<7} {}",
                    ssid,
                    net.bssid,
                    net.security,
                    format!("{} dBm", net.signal),
                    net.channel,
                    net.frequency,
                    net.cipher
                );
            }
        }

        self.print_success(&format!("{} networks found", result.networks.len()));
    }

    /// Print discovered Bluetooth devices, or the diagnostic message when
    /// the scan came back empty.
    pub fn print_bluetooth_result(&self, result: &BluetoothScanResult) {
        if self.quiet_mode {
            return;
        }

        if result.devices.is_empty() {
            if let Some(message) = &result.message {
                self.print_warning(message);
            }
            return;
        }

        println!("  {:<28} {:<18} {:>7}  {}", "NAME", "ADDRESS", "RSSI", "SERVICES");

        for device in &result.devices {
            if self.use_colors {
                println!(
                    "  {:<28} {:<18} {:>7}  {}",
                    device.name.bright_white(),
                    device.address.bright_black(),
                    format!("{} dBm", device.rssi),
                    device.services.join(", ")
                );
            } else {
                println!(
                    "  {:<28} {:<18} {:>7}  {}",
                    device.name,
                    device.address,
                    format!("{} dBm", device.rssi),
                    device.services.join(", ")
                );
            }
        }

        self.print_success(&format!("{} devices found", result.devices.len()));
    }

    pub fn print_platform_report(&self, report: &PlatformReport) {
        if self.quiet_mode {
            return;
        }

        self.print_info(&format!("Platform: {}", report.platform));
        self.print_info(&format!("Hostname: {}", report.hostname));
        if report.elevated {
            self.print_info("Privileges: elevated");
        } else {
            self.print_warning("Privileges: not elevated (some tools may return nothing)");
        }
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
