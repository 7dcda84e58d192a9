use log::error;
use std::fmt;

/// Coarse platform classification. It decides both which launchers can run
/// and how the spawner starts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    Darwin,
    Nix,
    Unknown,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Windows => "windows",
            OsFamily::Darwin => "darwin",
            OsFamily::Nix => "nix",
            OsFamily::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// Checked in order, first match wins.
const RULES: &[(&str, OsFamily)] = &[
    ("mswin", OsFamily::Windows),
    ("windows", OsFamily::Windows),
    ("darwin", OsFamily::Darwin),
    ("mac os", OsFamily::Darwin),
    ("solaris", OsFamily::Nix),
    ("bsd", OsFamily::Nix),
    ("linux", OsFamily::Nix),
    ("cygwin", OsFamily::Nix),
];

/// Classify a raw platform string, e.g. `x86_64-linux-gnu` or `darwin21`.
///
/// Never fails: anything unrecognized is logged as an error and comes back
/// as [`OsFamily::Unknown`].
pub fn family_for(platform: &str) -> OsFamily {
    let lowered = platform.to_lowercase();
    match RULES.iter().find(|(needle, _)| lowered.contains(needle)) {
        Some((_, family)) => *family,
        None => {
            error!("Unknown OS family for '{platform}'");
            OsFamily::Unknown
        }
    }
}

/// The platform string for the running process.
///
/// This is the Rust target OS name, except that macOS is reported as
/// `darwin` so that it lands in the right family.
pub fn current_platform() -> String {
    match std::env::consts::OS {
        "macos" => "darwin".to_string(),
        os => os.to_string(),
    }
}

/// The family of the running process.
pub fn current_family() -> OsFamily {
    family_for(&current_platform())
}
