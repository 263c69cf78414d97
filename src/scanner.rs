use chrono::Utc;
use log::{debug, info, warn};

use crate::config::Config;
use crate::executor::{CancelToken, SystemRunner, ToolRunner, WirelessTool};
use crate::parsers;
use crate::platform::{has_admin_privileges, PlatformKind};
use crate::types::{BluetoothScanResult, WifiScanResult};
use crate::Result;

/// Orchestrates wireless scans: picks the tool for the requested platform
/// and domain, executes it under a hard timeout, falls back where a
/// secondary tool exists, and parses whatever output was produced.
///
/// Tool failures never surface as errors; a scan always yields a usable
/// result, annotated with a diagnostic message when nothing was found.
/// Caller cancellation is the one exception and propagates as
/// [`crate::ScanError::Cancelled`].
pub struct WirelessScanner {
    config: Config,
    runner: Box<dyn ToolRunner>,
}

impl WirelessScanner {
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Substitute the process-spawning seam, used by tests to simulate
    /// tool failures and timeouts.
    pub fn with_runner(config: Config, runner: Box<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    /// Scan for WiFi networks on the given platform.
    pub async fn scan_wifi(
        &self,
        platform: PlatformKind,
        cancel: &CancelToken,
    ) -> Result<WifiScanResult> {
        info!("Performing WiFi scan on {}", platform);

        let raw = match platform {
            PlatformKind::Linux => {
                // Primary and fallback share the radio; they must run
                // strictly one after the other.
                match self.execute(WirelessTool::Iwlist, cancel).await? {
                    Some(output) => Some((WirelessTool::Iwlist, output)),
                    None => {
                        warn!("iwlist failed, trying nmcli fallback");
                        self.execute(WirelessTool::Nmcli, cancel)
                            .await?
                            .map(|output| (WirelessTool::Nmcli, output))
                    }
                }
            }
            PlatformKind::Macos => self
                .execute(WirelessTool::Airport, cancel)
                .await?
                .map(|output| (WirelessTool::Airport, output)),
            PlatformKind::Windows => self
                .execute(WirelessTool::Netsh, cancel)
                .await?
                .map(|output| (WirelessTool::Netsh, output)),
            PlatformKind::Unknown => {
                return Ok(WifiScanResult {
                    success: true,
                    platform: platform.to_string(),
                    networks: Vec::new(),
                    timestamp: Utc::now(),
                    message: Some("Unsupported platform: no WiFi scanning tool mapping exists.".to_string()),
                });
            }
        };

        let networks = match raw {
            Some((tool, output)) => {
                debug!("Parsing {} bytes of {} output", output.len(), tool.name());
                match tool {
                    WirelessTool::Iwlist => parsers::parse_iwlist(&output),
                    WirelessTool::Nmcli => parsers::parse_nmcli(&output),
                    WirelessTool::Airport => parsers::parse_airport(&output),
                    WirelessTool::Netsh => parsers::parse_netsh(&output),
                    WirelessTool::Hcitool => Vec::new(),
                }
            }
            None => Vec::new(),
        };

        let message = if networks.is_empty() {
            Some(self.wifi_diagnostic(platform))
        } else {
            info!("Found {} networks", networks.len());
            None
        };

        Ok(WifiScanResult {
            success: true,
            platform: platform.to_string(),
            networks,
            timestamp: Utc::now(),
            message,
        })
    }

    /// Scan for Bluetooth devices on the given platform. Only Linux has a
    /// tool mapping (hcitool); everything else short-circuits to an empty
    /// result without attempting execution.
    pub async fn scan_bluetooth(
        &self,
        platform: PlatformKind,
        cancel: &CancelToken,
    ) -> Result<BluetoothScanResult> {
        info!("Performing Bluetooth scan on {}", platform);

        let devices = match platform {
            PlatformKind::Linux => self
                .execute(WirelessTool::Hcitool, cancel)
                .await?
                .map(|output| parsers::parse_hcitool(&output))
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let message = if devices.is_empty() {
            Some(match platform {
                PlatformKind::Linux => {
                    "No Bluetooth devices found. Make sure Bluetooth is enabled and you have the required permissions.".to_string()
                }
                _ => format!("Bluetooth scanning is not supported on {}.", platform),
            })
        } else {
            info!("Found {} devices", devices.len());
            None
        };

        Ok(BluetoothScanResult {
            success: true,
            platform: platform.to_string(),
            devices,
            timestamp: Utc::now(),
            message,
        })
    }

    /// Run one tool invocation. Returns `Some(stdout)` on success, `None`
    /// on any recoverable tool failure; only cancellation escapes as an
    /// error.
    async fn execute(&self, tool: WirelessTool, cancel: &CancelToken) -> Result<Option<String>> {
        let (program, args) = tool.argv(&self.config.tools);

        match self
            .runner
            .run(&program, &args, self.config.tool_timeout(), cancel)
            .await?
        {
            Ok(output) => Ok(Some(output)),
            Err(failure) => {
                warn!("{} scan failed: {}", tool.name(), failure);
                Ok(None)
            }
        }
    }

    fn wifi_diagnostic(&self, platform: PlatformKind) -> String {
        let mut message = "No networks found. Make sure you have the required permissions and tools installed.".to_string();
        if platform == PlatformKind::Linux && !has_admin_privileges() {
            message.push_str(" iwlist scanning typically requires elevated privileges.");
        }
        message
    }
}
