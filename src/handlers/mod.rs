//! The launchers that ship with openit, and the opener lookup they share.
use crate::config::Config;
use crate::desktop::DesktopEnvironment;
use crate::host::Host;
use crate::os::OsFamily;
use crate::registry::Registry;
use crate::spawn::SpawnRequest;
use std::ffi::OsString;

mod browser;
mod file;

pub use browser::Browser;
pub use file::FileOpener;

impl Registry {
    /// The built-in launchers, most specific first.
    pub fn with_builtin_handlers(config: &Config) -> Registry {
        let mut registry = Registry::new();
        registry.register(Browser::new(config.browser.clone()));
        registry.register(FileOpener);
        registry
    }
}

/// A program, plus any arguments that go before the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Opener {
    program: OsString,
    args: Vec<OsString>,
}

impl Opener {
    pub(crate) fn new<P: Into<OsString>>(program: P, args: &[&str]) -> Opener {
        Opener {
            program: program.into(),
            args: args.iter().map(OsString::from).collect(),
        }
    }

    pub(crate) fn request(self, family: OsFamily, resource: &str) -> SpawnRequest {
        let mut args = self.args;
        args.push(resource.into());
        SpawnRequest::new(family, self.program, args)
    }
}

type Candidate = (&'static str, &'static [&'static str]);

// Desktop-specific openers, tried before `xdg-open`.
const KDE_OPENERS: &[Candidate] = &[("kde-open", &[]), ("kfmclient", &["exec"])];
const GNOME_OPENERS: &[Candidate] = &[("gio", &["open"]), ("gnome-open", &[])];
const XFCE_OPENERS: &[Candidate] = &[("exo-open", &[])];
const XDG_OPEN: Candidate = ("xdg-open", &[]);

fn desktop_openers(de: DesktopEnvironment) -> &'static [Candidate] {
    match de {
        DesktopEnvironment::Kde => KDE_OPENERS,
        DesktopEnvironment::Gnome => GNOME_OPENERS,
        DesktopEnvironment::Xfce => XFCE_OPENERS,
        DesktopEnvironment::Generic => &[],
    }
}

/// The platform's "open this with whatever is registered for it" command,
/// if the host has one installed.
pub(crate) fn platform_opener(host: &Host) -> Option<Opener> {
    match host.family() {
        OsFamily::Windows => Some(default_opener(OsFamily::Windows)),
        OsFamily::Darwin => host.find_executable("open").map(|p| Opener::new(p, &[])),
        OsFamily::Nix => {
            let de = host.desktop_environment();
            desktop_openers(de)
                .iter()
                .chain(std::iter::once(&XDG_OPEN))
                .find_map(|(name, args)| {
                    host.find_executable(name).map(|p| Opener::new(p, args))
                })
        }
        OsFamily::Unknown => None,
    }
}

/// What to run when the lookup that `handles` relied on no longer finds
/// anything. Spawning this reports the missing program.
pub(crate) fn default_opener(family: OsFamily) -> Opener {
    match family {
        // `start` is a cmd builtin; the empty argument is the window title.
        OsFamily::Windows => Opener::new("cmd", &["/C", "start", ""]),
        OsFamily::Darwin => Opener::new("open", &[]),
        OsFamily::Nix | OsFamily::Unknown => Opener::new("xdg-open", &[]),
    }
}
