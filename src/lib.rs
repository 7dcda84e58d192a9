mod config;
mod desktop;
mod error;
mod handlers;
mod host;
mod locate;
mod os;
mod registry;
mod spawn;

#[cfg(test)]
mod test_log;

pub use config::{load_config, Config};
pub use desktop::{detect_desktop_environment, DesktopEnvironment};
pub use error::{Error, Result};
pub use handlers::{Browser, FileOpener};
pub use host::{process_vars, Host};
pub use locate::{find_executable, search_path};
pub use os::{current_family, current_platform, family_for, OsFamily};
pub use registry::{Dispatcher, LauncherHandler, Prepared, Registry};
pub use spawn::{spawn, SpawnRequest, Spawned};
