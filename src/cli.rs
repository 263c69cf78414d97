use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::platform::PlatformKind;

#[derive(Parser)]
#[command(name = "wscan")]
#[command(about = "Cross-platform wireless network and Bluetooth scanner")]
#[command(long_about = r#"
Wscan discovers nearby WiFi networks and Bluetooth devices by driving the
scanning utilities the operating system already ships and normalizing their
output into a single record format.

WARNING: This tool should only be used on networks and devices you own or
have explicit permission to audit. Unauthorized scanning may be illegal.

Simple Usage Examples:
  wscan --wifi                      # Scan for WiFi networks
  wscan --bluetooth                 # Scan for Bluetooth devices
  wscan --all --json                # Both scans, JSON to stdout
  wscan --wifi --timeout 10         # Tighter tool timeout
  wscan --wifi --platform linux     # Override the detected platform
  wscan --detect                    # Report platform and capabilities
"#)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Scan for WiFi networks
    #[arg(long)]
    pub wifi: bool,

    /// Scan for Bluetooth devices
    #[arg(long)]
    pub bluetooth: bool,

    /// Run both WiFi and Bluetooth scans
    #[arg(long)]
    pub all: bool,

    /// Print the platform/capability report and exit
    #[arg(long)]
    pub detect: bool,

    /// Override the detected platform (for testing tool selection)
    #[arg(long, value_enum)]
    pub platform: Option<PlatformKind>,

    /// Tool execution timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print results as raw JSON to stdout instead of tables
    #[arg(long)]
    pub json: bool,

    /// Write report files after scanning
    #[arg(long)]
    pub report: bool,

    /// Output directory for report files
    #[arg(short, long, default_value = "./reports")]
    pub output: PathBuf,

    /// Report file format
    #[arg(long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum ReportFormat {
    Json,
    Csv,
}
