use crate::config::Config;
use crate::host::Host;
use log::{debug, warn};
use std::fmt;
use std::process::{Command, Stdio};

/// Desktop environment on a `nix` host. Picks between the desktop-specific
/// openers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesktopEnvironment {
    Kde,
    Gnome,
    Xfce,
    Generic,
}

impl fmt::Display for DesktopEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesktopEnvironment::Kde => "kde",
            DesktopEnvironment::Gnome => "gnome",
            DesktopEnvironment::Xfce => "xfce",
            DesktopEnvironment::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Work out the desktop environment the same way `xdg-open` does: session
/// variables first, then ask the X root window whether xfce is running.
pub fn detect(host: &Host) -> DesktopEnvironment {
    let de = if host.var("KDE_FULL_SESSION").is_some()
        || host.var("KDE_SESSION_UID").is_some()
    {
        DesktopEnvironment::Kde
    } else if host.var("GNOME_DESKTOP_SESSION_ID").is_some() {
        DesktopEnvironment::Gnome
    } else if xprop_says_xfce(host) {
        DesktopEnvironment::Xfce
    } else {
        DesktopEnvironment::Generic
    };
    debug!("desktop environment => {de}");
    de
}

/// [`detect`] against the real environment of this process.
pub fn detect_desktop_environment() -> DesktopEnvironment {
    detect(&Host::current(&Config::default()))
}

fn xprop_says_xfce(host: &Host) -> bool {
    let Some(xprop) = host.find_executable("xprop") else {
        return false;
    };

    let output = Command::new(&xprop)
        .arg("-root")
        .arg("_DT_SAVE_MODE")
        .env_clear()
        .envs(host.vars())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(output) => is_xfce_save_mode(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            warn!("Error running {}: {e}", xprop.display());
            false
        }
    }
}

fn is_xfce_save_mode(xprop_output: &str) -> bool {
    xprop_output
        .lines()
        .any(|line| line.trim_end_matches('\r').ends_with(" = \"xfce\""))
}
