use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::{Config, OutputFormat};
use crate::types::{BluetoothScanResult, WifiScanResult};
use crate::{Result, ScanError};

pub struct ReportGenerator {
    config: Config,
}

impl ReportGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Write one report file per configured format for whatever results
    /// are present; returns the paths of the generated files.
    pub async fn generate_report(
        &self,
        wifi: Option<&WifiScanResult>,
        bluetooth: Option<&BluetoothScanResult>,
    ) -> Result<Vec<PathBuf>> {
        let mut generated_files = Vec::new();

        fs::create_dir_all(&self.config.reporting.output_dir)
            .await
            .map_err(|e| ScanError::Reporting(format!("Failed to create output directory: {}", e)))?;

        let started_at: DateTime<Utc> = wifi
            .map(|r| r.timestamp)
            .or_else(|| bluetooth.map(|r| r.timestamp))
            .unwrap_or_else(Utc::now);
        let base_filename = format!("wscan_report_{}", started_at.format("%Y%m%d_%H%M%S"));

        for format in &self.config.reporting.formats {
            let file_path = match format {
                OutputFormat::Json => {
                    let path = self
                        .config
                        .reporting
                        .output_dir
                        .join(format!("{}.json", base_filename));
                    self.generate_json_report(wifi, bluetooth, &path).await?;
                    path
                }
                OutputFormat::Csv => {
                    let path = self
                        .config
                        .reporting
                        .output_dir
                        .join(format!("{}.csv", base_filename));
                    self.generate_csv_report(wifi, bluetooth, &path).await?;
                    path
                }
            };

            generated_files.push(file_path);
        }

        info!("Generated {} report files", generated_files.len());
        Ok(generated_files)
    }

    async fn generate_json_report(
        &self,
        wifi: Option<&WifiScanResult>,
        bluetooth: Option<&BluetoothScanResult>,
        path: &Path,
    ) -> Result<()> {
        debug!("Generating JSON report: {}", path.display());

        let report = serde_json::json!({
            "wifi": wifi,
            "bluetooth": bluetooth,
        });

        fs::write(path, serde_json::to_string_pretty(&report)?)
            .await
            .map_err(|e| ScanError::Reporting(format!("Failed to write JSON report: {}", e)))?;

        Ok(())
    }

    async fn generate_csv_report(
        &self,
        wifi: Option<&WifiScanResult>,
        bluetooth: Option<&BluetoothScanResult>,
        path: &Path,
    ) -> Result<()> {
        debug!("Generating CSV report: {}", path.display());

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "Type", "Name", "Address", "Security", "Signal", "Channel", "Band", "Cipher",
        ])?;

        if let Some(result) = wifi {
            for net in &result.networks {
                writer.write_record(&[
                    "WifiNetwork".to_string(),
                    net.ssid.clone(),
                    net.bssid.clone(),
                    net.security.to_string(),
                    net.signal.to_string(),
                    net.channel.to_string(),
                    net.frequency.to_string(),
                    net.cipher.to_string(),
                ])?;
            }
        }

        if let Some(result) = bluetooth {
            for device in &result.devices {
                writer.write_record(&[
                    "BluetoothDevice".to_string(),
                    device.name.clone(),
                    device.address.clone(),
                    String::new(),
                    device.rssi.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                ])?;
            }
        }

        let data = writer
            .into_inner()
            .map_err(|e| ScanError::Reporting(format!("Failed to finish CSV report: {}", e)))?;

        fs::write(path, data)
            .await
            .map_err(|e| ScanError::Reporting(format!("Failed to write CSV report: {}", e)))?;

        Ok(())
    }
}
