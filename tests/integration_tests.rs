use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use wscan::{
    config::Config,
    executor::{CancelToken, SystemRunner, ToolFailure, ToolOutcome, ToolRunner},
    platform::PlatformKind,
    scanner::WirelessScanner,
    types::{EncryptionCipher, SecurityProtocol},
    Result, ScanError,
};

const IWLIST_OUTPUT: &str = "Cell 01 - Address: AA:BB:CC:DD:EE:FF\n    ESSID:\"TestNet\"\n    Channel:6\n    Signal level=-42 dBm\n    Encryption key:on\n    IE: IEEE 802.11i/WPA2\n";

const NMCLI_OUTPUT: &str = "AA\\:BB\\:CC\\:DD\\:EE\\:FF:FallbackNet:6:84:WPA2\n";

const HCITOOL_OUTPUT: &str = "Scanning ...\n\tAA:BB:CC:DD:EE:FF\tHeadphones\n";

/// Scripted tool runner: one canned outcome per program name, recording
/// the order programs were invoked in.
struct ScriptedRunner {
    outcomes: Mutex<HashMap<String, Vec<ToolOutcome>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn script(self, program: &str, outcome: ToolOutcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push(outcome);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        _args: &[String],
        _execution_timeout: Duration,
        _cancel: &CancelToken,
    ) -> Result<ToolOutcome> {
        self.calls.lock().unwrap().push(program.to_string());

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get_mut(program)
            .and_then(|queue| {
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            });

        Ok(outcome.unwrap_or_else(|| Err(ToolFailure::NotFound(program.to_string()))))
    }
}

/// Runner that emulates a tool hanging past its execution bound.
struct HangingRunner;

#[async_trait]
impl ToolRunner for HangingRunner {
    async fn run(
        &self,
        _program: &str,
        _args: &[String],
        execution_timeout: Duration,
        _cancel: &CancelToken,
    ) -> Result<ToolOutcome> {
        tokio::time::sleep(execution_timeout).await;
        Ok(Err(ToolFailure::TimedOut(execution_timeout)))
    }
}

/// Runner that never completes until the caller cancels.
struct BlockedRunner;

#[async_trait]
impl ToolRunner for BlockedRunner {
    async fn run(
        &self,
        _program: &str,
        _args: &[String],
        _execution_timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ToolOutcome> {
        cancel.cancelled().await;
        Err(ScanError::Cancelled)
    }
}

fn scanner_with(runner: impl ToolRunner + 'static) -> WirelessScanner {
    WirelessScanner::with_runner(Config::default(), Box::new(runner))
}

#[test]
fn test_cipher_derived_from_security() {
    let cases = [
        (SecurityProtocol::Open, EncryptionCipher::None),
        (SecurityProtocol::Wep, EncryptionCipher::Wep),
        (SecurityProtocol::Wpa2Psk, EncryptionCipher::Aes),
        (SecurityProtocol::Wpa3Psk, EncryptionCipher::Aes),
        (SecurityProtocol::Unknown, EncryptionCipher::Unknown),
    ];

    for (security, expected) in cases {
        assert_eq!(EncryptionCipher::from(security), expected);
    }
}

#[tokio::test]
async fn test_linux_wifi_primary_tool_success() -> Result<()> {
    let runner = ScriptedRunner::new().script("iwlist", Ok(IWLIST_OUTPUT.to_string()));
    let scanner = WirelessScanner::with_runner(Config::default(), Box::new(runner));

    let result = scanner
        .scan_wifi(PlatformKind::Linux, &CancelToken::new())
        .await?;

    assert!(result.success);
    assert_eq!(result.platform, "linux");
    assert_eq!(result.networks.len(), 1);
    assert_eq!(result.networks[0].ssid, "TestNet");
    assert_eq!(result.networks[0].security, SecurityProtocol::Wpa2Psk);
    assert!(result.message.is_none());
    Ok(())
}

#[tokio::test]
async fn test_linux_wifi_falls_back_to_nmcli() -> Result<()> {
    let runner = ScriptedRunner::new()
        .script(
            "iwlist",
            Err(ToolFailure::NonZeroExit {
                status: 255,
                stderr: "Operation not permitted".to_string(),
            }),
        )
        .script("nmcli", Ok(NMCLI_OUTPUT.to_string()));

    let scanner = WirelessScanner::with_runner(Config::default(), Box::new(runner));
    let result = scanner
        .scan_wifi(PlatformKind::Linux, &CancelToken::new())
        .await?;

    assert_eq!(result.networks.len(), 1);
    assert_eq!(result.networks[0].ssid, "FallbackNet");
    Ok(())
}

#[tokio::test]
async fn test_linux_wifi_fallback_ordering_and_double_failure() -> Result<()> {
    // Unscripted programs fail with NotFound, so both tools fail here.
    let recording = std::sync::Arc::new(ScriptedRunner::new());
    let scanner = WirelessScanner::with_runner(
        Config::default(),
        Box::new(SharedRunner(recording.clone())),
    );

    let result = scanner
        .scan_wifi(PlatformKind::Linux, &CancelToken::new())
        .await?;

    assert_eq!(recording.calls(), vec!["iwlist", "nmcli"]);
    assert!(result.networks.is_empty());
    assert!(result.message.as_deref().unwrap_or("").contains("No networks found"));
    Ok(())
}

/// Adapter sharing one ScriptedRunner so the test can inspect its call log.
struct SharedRunner(std::sync::Arc<ScriptedRunner>);

#[async_trait]
impl ToolRunner for SharedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        execution_timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ToolOutcome> {
        self.0.run(program, args, execution_timeout, cancel).await
    }
}

#[tokio::test]
async fn test_timeout_is_recovered_within_margin() -> Result<()> {
    let mut config = Config::default();
    config.scan.tool_timeout = 1;

    let scanner = WirelessScanner::with_runner(config, Box::new(HangingRunner));

    let start = Instant::now();
    let result = scanner
        .scan_wifi(PlatformKind::Macos, &CancelToken::new())
        .await?;
    let elapsed = start.elapsed();

    assert!(result.success);
    assert!(result.networks.is_empty());
    assert!(result.message.is_some());
    // One bounded execution, no fallback on macOS.
    assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    Ok(())
}

#[tokio::test]
async fn test_linux_timeout_tries_fallback_then_recovers() -> Result<()> {
    let mut config = Config::default();
    config.scan.tool_timeout = 1;

    let scanner = WirelessScanner::with_runner(config, Box::new(HangingRunner));

    let start = Instant::now();
    let result = scanner
        .scan_wifi(PlatformKind::Linux, &CancelToken::new())
        .await?;
    let elapsed = start.elapsed();

    assert!(result.networks.is_empty());
    assert!(result.message.is_some());
    // Primary and fallback each consume one timeout, sequentially.
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
    Ok(())
}

#[tokio::test]
async fn test_caller_cancellation_propagates() {
    let scanner = scanner_with(BlockedRunner);
    let cancel = CancelToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = scanner.scan_wifi(PlatformKind::Linux, &cancel).await;
    assert!(matches!(result, Err(ScanError::Cancelled)));
}

#[tokio::test]
async fn test_bluetooth_scan_on_linux() -> Result<()> {
    let runner = ScriptedRunner::new().script("hcitool", Ok(HCITOOL_OUTPUT.to_string()));
    let scanner = WirelessScanner::with_runner(Config::default(), Box::new(runner));

    let result = scanner
        .scan_bluetooth(PlatformKind::Linux, &CancelToken::new())
        .await?;

    assert_eq!(result.devices.len(), 1);
    assert_eq!(result.devices[0].name, "Headphones");
    assert!(result.message.is_none());
    Ok(())
}

#[tokio::test]
async fn test_bluetooth_unsupported_platform_short_circuits() -> Result<()> {
    let recording = std::sync::Arc::new(ScriptedRunner::new());
    let scanner = WirelessScanner::with_runner(
        Config::default(),
        Box::new(SharedRunner(recording.clone())),
    );

    let result = scanner
        .scan_bluetooth(PlatformKind::Windows, &CancelToken::new())
        .await?;

    // No process execution may be attempted.
    assert!(recording.calls().is_empty());
    assert!(result.devices.is_empty());
    assert!(result.message.is_some());
    Ok(())
}

#[tokio::test]
async fn test_unknown_platform_wifi_short_circuits() -> Result<()> {
    let recording = std::sync::Arc::new(ScriptedRunner::new());
    let scanner = WirelessScanner::with_runner(
        Config::default(),
        Box::new(SharedRunner(recording.clone())),
    );

    let result = scanner
        .scan_wifi(PlatformKind::Unknown, &CancelToken::new())
        .await?;

    assert!(recording.calls().is_empty());
    assert!(result.networks.is_empty());
    assert!(result.message.as_deref().unwrap_or("").contains("Unsupported platform"));
    Ok(())
}

#[tokio::test]
async fn test_windows_wifi_uses_netsh_profiles() -> Result<()> {
    let netsh = "Profiles on interface Wi-Fi:\n    All User Profile     : OfficeNet\n";
    let runner = ScriptedRunner::new().script("netsh", Ok(netsh.to_string()));
    let scanner = WirelessScanner::with_runner(Config::default(), Box::new(runner));

    let result = scanner
        .scan_wifi(PlatformKind::Windows, &CancelToken::new())
        .await?;

    assert_eq!(result.networks.len(), 1);
    assert_eq!(result.networks[0].ssid, "OfficeNet");
    // Profile enumeration carries no live radio data.
    assert_eq!(result.networks[0].signal, -50);
    assert_eq!(result.networks[0].channel, 0);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_system_runner_kills_overrunning_process() {
    let runner = SystemRunner;
    let start = Instant::now();

    let outcome = runner
        .run(
            "sleep",
            &["30".to_string()],
            Duration::from_secs(1),
            &CancelToken::new(),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, Err(ToolFailure::TimedOut(_))));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.scan.tool_timeout, 30);
    assert!(config.tools.airport_path.contains("airport"));
    assert_eq!(config.reporting.output_dir.to_string_lossy(), "./reports");
}

#[test]
fn test_config_save_and_load() -> Result<()> {
    use tempfile::Builder;

    let config = Config::default();
    let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    let temp_path = temp_file.path().to_str().unwrap();

    config.save_to_file(temp_path)?;
    let loaded_config = Config::load_from_file(temp_path)?;

    assert_eq!(loaded_config.scan.tool_timeout, config.scan.tool_timeout);
    assert_eq!(loaded_config.tools.airport_path, config.tools.airport_path);

    Ok(())
}

#[tokio::test]
async fn test_result_json_shape() -> Result<()> {
    let runner = ScriptedRunner::new().script("iwlist", Ok(IWLIST_OUTPUT.to_string()));
    let scanner = WirelessScanner::with_runner(Config::default(), Box::new(runner));

    let result = scanner
        .scan_wifi(PlatformKind::Linux, &CancelToken::new())
        .await?;
    let json = serde_json::to_value(&result)?;

    assert_eq!(json["success"], true);
    assert_eq!(json["platform"], "linux");
    assert!(json["timestamp"].as_str().unwrap().contains('T'));
    assert_eq!(json["networks"][0]["security"], "WPA2-PSK");
    assert_eq!(json["networks"][0]["encryptionCipher"], "AES");
    assert_eq!(json["networks"][0]["frequencyBand"], "2.4GHz");
    // message is omitted entirely when networks were found.
    assert!(json.get("message").is_none());
    Ok(())
}
