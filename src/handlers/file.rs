use super::{default_opener, platform_opener};
use crate::host::Host;
use crate::os::OsFamily;
use crate::registry::LauncherHandler;
use crate::spawn::SpawnRequest;
use std::path::Path;

/// Opens an existing file or directory with whatever the desktop has
/// associated with it.
#[derive(Debug, Default)]
pub struct FileOpener;

// `canonicalize` gives `\\?\C:\...` paths on Windows, which `start`
// doesn't reliably understand.
fn absolute(family: OsFamily, path: &str) -> String {
    let resolved = match family {
        OsFamily::Windows => std::path::absolute(path),
        _ => std::fs::canonicalize(path),
    };
    match resolved {
        Ok(p) => p.display().to_string(),
        Err(_) => path.to_string(),
    }
}

impl LauncherHandler for FileOpener {
    fn name(&self) -> &'static str {
        "file"
    }

    fn handles(&self, host: &Host, args: &[String]) -> bool {
        match args {
            [path] if Path::new(path).exists() => platform_opener(host).is_some(),
            _ => false,
        }
    }

    fn launch(&self, host: &Host, args: &[String]) -> SpawnRequest {
        // The opener may run with a different working directory.
        let path = args.first().map(|p| absolute(host.family(), p)).unwrap_or_default();
        let opener = platform_opener(host).unwrap_or_else(|| default_opener(host.family()));
        opener.request(host.family(), &path)
    }
}
