use log::debug;
use std::path::{Path, PathBuf};

/// The directories named by `PATH`, in order.
pub fn search_path() -> Vec<PathBuf> {
    match std::env::var_os("PATH") {
        Some(path) => std::env::split_paths(&path).collect(),
        None => Vec::new(),
    }
}

/// Look for an executable called `name` in each of `dirs`, in order, and
/// return the first one found. An empty `dirs` means "search `PATH`".
pub fn find_executable<P: AsRef<Path>>(name: &str, dirs: &[P]) -> Option<PathBuf> {
    if dirs.is_empty() {
        return find_in(name, &search_path());
    }
    find_in(name, dirs)
}

fn find_in<P: AsRef<Path>>(name: &str, dirs: &[P]) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for dir in dirs {
        // One directory at a time, so the first directory listed wins.
        if let Ok(found) = which::which_in(name, Some(dir.as_ref()), &cwd) {
            debug!("found executable {}", found.display());
            return Some(found);
        }
    }

    let searched: Vec<String> =
        dirs.iter().map(|d| d.as_ref().display().to_string()).collect();
    debug!("unable to find `{name}` in paths {}", searched.join(", "));
    None
}

/// `path` itself, if it names something that can be run. On Windows a
/// missing extension is filled in from `PATHEXT`.
pub(crate) fn executable_at(path: &Path) -> Option<PathBuf> {
    match which::which(path) {
        Ok(found) => Some(found),
        Err(_) => {
            debug!("{} is not an executable", path.display());
            None
        }
    }
}

#[cfg(all(test, target_family = "unix"))]
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))
        .expect("Error writing script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Error marking script executable");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn missing_name_in_missing_dir() {
        assert_eq!(
            find_executable("doesnotexist123", &["/nonexistent/dir"]),
            None
        );
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn first_directory_with_the_binary_wins() {
        let d1 = TempDir::new("locate_d1").expect("Error getting tmpdir");
        let d2 = TempDir::new("locate_d2").expect("Error getting tmpdir");
        let d3 = TempDir::new("locate_d3").expect("Error getting tmpdir");
        let expected = write_script(d2.path(), "tool", "true");
        write_script(d3.path(), "tool", "true");

        let dirs = [d1.path(), d2.path(), d3.path()];
        assert_eq!(find_executable("tool", &dirs), Some(expected));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn non_executable_files_are_skipped() {
        let d1 = TempDir::new("locate_plain").expect("Error getting tmpdir");
        let d2 = TempDir::new("locate_exec").expect("Error getting tmpdir");
        std::fs::write(d1.path().join("tool"), "not a program")
            .expect("Error writing file");
        let expected = write_script(d2.path(), "tool", "true");

        let dirs = [d1.path(), d2.path()];
        assert_eq!(find_executable("tool", &dirs), Some(expected));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn directories_are_not_executables() {
        let d1 = TempDir::new("locate_dir").expect("Error getting tmpdir");
        std::fs::create_dir(d1.path().join("tool")).expect("Error creating dir");

        assert_eq!(find_executable("tool", &[d1.path()]), None);
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn dotted_names_are_found() {
        let d1 = TempDir::new("locate_dotted").expect("Error getting tmpdir");
        let expected = write_script(d1.path(), "python3.11", "true");

        assert_eq!(find_executable("python3.11", &[d1.path()]), Some(expected));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn executable_at_checks_the_exec_bit() {
        let d1 = TempDir::new("locate_at").expect("Error getting tmpdir");
        let plain = d1.path().join("plain");
        std::fs::write(&plain, "not a program").expect("Error writing file");
        let script = write_script(d1.path(), "script", "true");

        assert_eq!(executable_at(&plain), None);
        assert_eq!(executable_at(&d1.path().join("missing")), None);
        assert_eq!(executable_at(&script), Some(script));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn empty_dirs_searches_path() {
        let dirs: [&Path; 0] = [];
        let found = find_executable("sh", &dirs);
        assert!(found.is_some(), "expected `sh` somewhere on PATH");
    }
}
