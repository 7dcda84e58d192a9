use crate::config::Config;
use crate::desktop::{self, DesktopEnvironment};
use crate::locate;
use crate::os::{self, OsFamily};
use std::cell::OnceCell;
use std::collections::HashMap;
use log::debug;
use std::path::PathBuf;

/// Everything the launchers need to know about the machine they run on.
///
/// The environment is snapshotted at construction so detection can be
/// driven from tests without touching the real process environment.
#[derive(Debug)]
pub struct Host {
    platform: String,
    family: OsFamily,
    vars: HashMap<String, String>,
    search_path: Vec<PathBuf>,
    desktop: OnceCell<DesktopEnvironment>,
}

impl Host {
    pub fn new(platform: &str, vars: HashMap<String, String>) -> Host {
        let search_path = match vars.get("PATH") {
            Some(path) => std::env::split_paths(path).collect(),
            None => Vec::new(),
        };
        let family = os::family_for(platform);
        debug!("os family for '{platform}' => {family}");
        Host {
            platform: platform.to_string(),
            family,
            vars,
            search_path,
            desktop: OnceCell::new(),
        }
    }

    /// The host this process is running on, with the configured platform
    /// override applied.
    pub fn current(config: &Config) -> Host {
        let platform = match &config.host_os {
            Some(platform) => platform.clone(),
            None => os::current_platform(),
        };
        Host::new(&platform, process_vars())
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn family(&self) -> OsFamily {
        self.family
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Only detected on `nix` hosts, and only once.
    pub fn desktop_environment(&self) -> DesktopEnvironment {
        *self.desktop.get_or_init(|| match self.family {
            OsFamily::Nix => desktop::detect(self),
            _ => DesktopEnvironment::Generic,
        })
    }

    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if self.search_path.is_empty() {
            // An empty list means "use PATH" to the locator; for a host with
            // no PATH that means nothing is installed.
            return None;
        }
        locate::find_executable(name, &self.search_path)
    }
}

/// This process's environment. Variables that aren't valid unicode can't be
/// anything we look at, so they are left out.
pub fn process_vars() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
