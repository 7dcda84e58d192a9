use super::{default_opener, platform_opener, Opener};
use crate::host::Host;
use crate::os::OsFamily;
use crate::registry::LauncherHandler;
use crate::spawn::SpawnRequest;
use crate::locate;
use log::{debug, log, Level};
use std::path::Path;
use url::Url;

const SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

// Tried in order when the platform has no opener of its own.
const FALLBACK_BROWSERS: &[&str] = &[
    "firefox",
    "chromium",
    "google-chrome",
    "epiphany",
    "konqueror",
    "opera",
];

/// Opens web (and `file:`) URLs.
#[derive(Debug, Default)]
pub struct Browser {
    configured: Option<String>,
}

impl Browser {
    /// `configured` is a browser command line from the config or the
    /// environment, e.g. `firefox --new-window` or `lynx %s`.
    pub fn new(configured: Option<String>) -> Browser {
        Browser { configured }
    }

    /// `missing` is the level a configured-but-missing browser is logged
    /// at: quiet while deciding, loud when actually launching.
    fn resolve(&self, host: &Host, missing: Level) -> Option<Resolved> {
        if host.family() == OsFamily::Unknown {
            return None;
        }

        if let Some(configured) = &self.configured {
            match configured_browser(host, configured) {
                Some(resolved) => return Some(resolved),
                None => log!(missing, "Configured browser `{configured}` was not found"),
            }
        }

        if let Some(opener) = platform_opener(host) {
            return Some(Resolved::Opener(opener));
        }

        FALLBACK_BROWSERS.iter().find_map(|name| {
            host.find_executable(name)
                .map(|p| Resolved::Opener(Opener::new(p, &[])))
        })
    }
}

#[derive(Debug, PartialEq)]
enum Resolved {
    Opener(Opener),
    // The arguments contain `%s`, to be replaced with the URL.
    Template(std::ffi::OsString, Vec<String>),
}

fn configured_browser(host: &Host, command: &str) -> Option<Resolved> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    let args: Vec<String> = parts.map(str::to_string).collect();

    let found = if Path::new(program).is_absolute() {
        locate::executable_at(Path::new(program))
    } else {
        host.find_executable(program)
    };
    let path = found?;

    if args.iter().any(|a| a.contains("%s")) {
        Some(Resolved::Template(path.into(), args))
    } else {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Some(Resolved::Opener(Opener::new(path, &args)))
    }
}

fn is_browsable(arg: &str) -> bool {
    match Url::parse(arg) {
        Ok(url) => SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

impl LauncherHandler for Browser {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn handles(&self, host: &Host, args: &[String]) -> bool {
        match args {
            [url] if is_browsable(url) => self.resolve(host, Level::Debug).is_some(),
            _ => false,
        }
    }

    fn launch(&self, host: &Host, args: &[String]) -> SpawnRequest {
        let url = args.first().map(String::as_str).unwrap_or_default();
        match self.resolve(host, Level::Warn) {
            Some(Resolved::Opener(opener)) => opener.request(host.family(), url),
            Some(Resolved::Template(program, args)) => {
                let args = args.iter().map(|a| a.replace("%s", url));
                SpawnRequest::new(host.family(), program, args)
            }
            None => {
                debug!("no browser left for {url}, using the platform default");
                default_opener(host.family()).request(host.family(), url)
            }
        }
    }
}
