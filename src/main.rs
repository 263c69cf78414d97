use clap::Parser;
use env_logger::Env;
use std::process;
use wscan::{
    cli::{Cli, ReportFormat},
    config::{Config, OutputFormat},
    display::DisplayManager,
    executor::CancelToken,
    platform,
    reporting::ReportGenerator,
    scanner::WirelessScanner,
    Result, ScanError,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    let display = DisplayManager::with_quiet(cli.quiet || cli.json);

    if !(cli.quiet || cli.json) {
        display.print_banner(
            "📡 WSCAN - Wireless Network Scanner",
            Some("Authorized Testing Only"),
        );
        display.print_warning("Ensure you have proper permission before scanning any networks.");
        println!();
    }

    let mut config = if let Some(config_path) = &cli.config {
        match Config::load_from_file(&config_path.to_string_lossy()) {
            Ok(config) => {
                display.print_success(&format!(
                    "Loaded configuration from {}",
                    config_path.display()
                ));
                config
            }
            Err(e) => {
                display.print_warning(&format!(
                    "Failed to load configuration: {}, using defaults",
                    e
                ));
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Apply CLI overrides to config
    config.scan.tool_timeout = cli.timeout;
    config.reporting.output_dir = cli.output.clone();
    config.reporting.formats = vec![match cli.format {
        ReportFormat::Json => OutputFormat::Json,
        ReportFormat::Csv => OutputFormat::Csv,
    }];

    // Platform is detected once and passed down explicitly; --platform
    // overrides it for exercising other tool mappings.
    let platform_kind = cli.platform.unwrap_or_else(platform::detect_platform);

    if cli.detect {
        match platform::platform_report() {
            Ok(report) => {
                if cli.json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            display.print_error(&format!("Failed to serialize report: {}", e));
                            process::exit(1);
                        }
                    }
                } else {
                    display.print_platform_report(&report);
                }
            }
            Err(e) => {
                display.print_error(&format!("Platform detection failed: {}", e));
                process::exit(1);
            }
        }
        return;
    }

    if !(cli.wifi || cli.bluetooth || cli.all) {
        display.print_error("No scan selected. Use --wifi, --bluetooth, --all, or --detect.");
        process::exit(2);
    }

    // Ctrl-C is the caller-side cancellation signal; it terminates any
    // in-flight tool process.
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match run_scans(&cli, &config, &display, platform_kind, &cancel).await {
        Ok(()) => {}
        Err(ScanError::Cancelled) => {
            display.print_warning("Scan cancelled");
            process::exit(130);
        }
        Err(e) => {
            display.print_error(&format!("Scan failed: {}", e));
            process::exit(1);
        }
    }
}

async fn run_scans(
    cli: &Cli,
    config: &Config,
    display: &DisplayManager,
    platform_kind: wscan::platform::PlatformKind,
    cancel: &CancelToken,
) -> Result<()> {
    let scanner = WirelessScanner::new(config.clone());

    let mut wifi_result = None;
    let mut bluetooth_result = None;

    if cli.wifi || cli.all {
        display.print_section_header("📶 WIFI SCAN");
        let result = scanner.scan_wifi(platform_kind, cancel).await?;
        display.print_wifi_result(&result);
        wifi_result = Some(result);
    }

    if cli.bluetooth || cli.all {
        display.print_section_header("🔵 BLUETOOTH SCAN");
        let result = scanner.scan_bluetooth(platform_kind, cancel).await?;
        display.print_bluetooth_result(&result);
        bluetooth_result = Some(result);
    }

    if cli.json {
        let combined = serde_json::json!({
            "wifi": wifi_result,
            "bluetooth": bluetooth_result,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
    }

    if cli.report {
        let generator = ReportGenerator::new(config.clone());
        let files = generator
            .generate_report(wifi_result.as_ref(), bluetooth_result.as_ref())
            .await?;
        for file in files {
            display.print_success(&format!("Report written to {}", file.display()));
        }
    }

    Ok(())
}
