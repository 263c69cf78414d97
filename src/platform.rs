/// Platform detection and privilege probing.
///
/// The orchestrator never reads the ambient OS identifier itself; it takes
/// an explicit [`PlatformKind`] so tests can simulate any platform. The
/// real detection happens once per process and is cached.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::{Result, ScanError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Linux,
    Macos,
    Windows,
    Unknown,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlatformKind::Linux => "linux",
            PlatformKind::Macos => "macos",
            PlatformKind::Windows => "windows",
            PlatformKind::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl PlatformKind {
    /// Map an OS identifier string to a platform kind. Anything
    /// unrecognized resolves to `Unknown` rather than failing.
    pub fn from_os_str(os: &str) -> Self {
        match os {
            "linux" => PlatformKind::Linux,
            "macos" => PlatformKind::Macos,
            "windows" => PlatformKind::Windows,
            _ => PlatformKind::Unknown,
        }
    }
}

static DETECTED: OnceLock<PlatformKind> = OnceLock::new();

/// Detect the host platform. Computed once per process lifetime; safe for
/// concurrent reads afterwards.
pub fn detect_platform() -> PlatformKind {
    *DETECTED.get_or_init(|| PlatformKind::from_os_str(std::env::consts::OS))
}

/// 检查是否具有管理员/root权限
pub fn has_admin_privileges() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
        use windows_sys::Win32::Security::{
            GetTokenInformation, OpenProcessToken, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
        };
        use windows_sys::Win32::System::Threading::GetCurrentProcess;

        unsafe {
            let mut token: HANDLE = 0;
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
                return false;
            }

            let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
            let mut return_length = 0u32;

            let result = GetTokenInformation(
                token,
                TokenElevation,
                &mut elevation as *mut _ as *mut _,
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut return_length,
            );

            CloseHandle(token);

            result != 0 && elevation.TokenIsElevated != 0
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Liveness/capability summary exposed by the CLI's detect mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformReport {
    pub platform: String,
    pub hostname: String,
    pub elevated: bool,
}

pub fn platform_report() -> Result<PlatformReport> {
    let hostname = hostname::get()
        .map_err(|e| ScanError::SystemError(format!("Failed to get hostname: {}", e)))?
        .to_string_lossy()
        .to_string();

    Ok(PlatformReport {
        platform: detect_platform().to_string(),
        hostname,
        elevated: has_admin_privileges(),
    })
}
