use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toml::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Platform string to classify instead of the real one.
    pub host_os: Option<String>,
    /// Program to open URLs with instead of the platform opener.
    pub browser: Option<String>,
    /// Print what would be launched instead of launching it.
    pub dry_run: bool,
}

impl Config {
    /// Apply `OPENIT_HOST_OS`, `OPENIT_BROWSER` and `BROWSER` on top of
    /// whatever the file said.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) {
        if let Some(host_os) = non_empty(vars.get("OPENIT_HOST_OS")) {
            self.host_os = Some(host_os.to_string());
        }
        if let Some(browser) = non_empty(vars.get("OPENIT_BROWSER")) {
            self.browser = Some(browser.to_string());
        } else if self.browser.is_none() {
            // BROWSER may be a list of candidates; we only try the first.
            if let Some(list) = non_empty(vars.get("BROWSER")) {
                self.browser = list
                    .split(':')
                    .map(str::trim)
                    .find(|s| !s.is_empty())
                    .map(str::to_string);
            }
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    use std::io::ErrorKind;

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => match e.kind() {
            ErrorKind::NotFound => return Ok(Config::default()),
            _ => {
                return Err(e).with_context(|| {
                    format!("Error reading {}", path.display())
                })
            }
        },
    };

    let value = contents
        .parse::<Value>()
        .with_context(|| format!("Error parsing {}", path.display()))?;
    parse_config(&value).with_context(|| format!("In {}", path.display()))
}

#[cfg(target_family = "unix")]
fn config_path() -> Option<PathBuf> {
    let xdg_path = xdg::BaseDirectories::with_prefix("openit")
        .ok()
        .and_then(|dirs| dirs.find_config_file("config.toml"));
    xdg_path.or_else(home_config_path)
}

#[cfg(not(target_family = "unix"))]
fn config_path() -> Option<PathBuf> {
    home_config_path()
}

fn home_config_path() -> Option<PathBuf> {
    let mut home = home::home_dir()?;
    home.push(".openit");
    Some(home)
}

fn parse_config(value: &Value) -> Result<Config> {
    match value {
        Value::Table(table) => Ok(Config {
            host_os: get_string(table, "host_os")?,
            browser: get_string(table, "browser")?,
            dry_run: match table.get("dry_run") {
                None => false,
                Some(Value::Boolean(v)) => *v,
                Some(v) => bail!("dry_run: expected true or false, got {:?}", v),
            },
        }),
        _ => bail!("top level must be a table"),
    }
}

fn get_string(table: &toml::value::Table, key: &str) -> Result<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v) => bail!("{key}: expected a string, got {:?}", v),
    }
}
