use crate::error::{Error, Result};
use crate::os::OsFamily;
use log::{debug, warn};
use std::ffi::OsString;
use std::fmt;
use std::process::{Child, Command, ExitStatus, Stdio};

/// A resolved command line and the family it has to be started under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub family: OsFamily,
}

impl SpawnRequest {
    pub fn new<P, I, A>(family: OsFamily, program: P, args: I) -> SpawnRequest
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        SpawnRequest {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            family,
        }
    }

    /// The command line as one string, for logs and dry runs.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for SpawnRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// What happened when we started something.
#[derive(Debug)]
pub enum Spawned {
    /// Ran inline; the caller waited for it. The status is reported but not
    /// judged.
    Completed(ExitStatus),
    /// Running on its own; nobody is waiting for it.
    Detached { pid: u32 },
}

/// Start a request using the strategy for its family.
///
/// Windows and unknown families run inline and block until the command
/// exits. Darwin and nix get a detached child, and this returns as soon as
/// it has been created.
pub fn spawn(request: &SpawnRequest) -> Result<Spawned> {
    debug!("Spawning on {} : {}", request.family, request);
    match request.family {
        OsFamily::Windows | OsFamily::Unknown => run_inline(request),
        OsFamily::Darwin | OsFamily::Nix => run_detached(request),
    }
}

fn spawn_error(request: &SpawnRequest, source: std::io::Error) -> Error {
    Error::Spawn { command: request.command_line(), source }
}

fn run_inline(request: &SpawnRequest) -> Result<Spawned> {
    let status = request
        .command()
        .status()
        .map_err(|e| spawn_error(request, e))?;
    debug!("`{request}` finished with {status}");
    Ok(Spawned::Completed(status))
}

fn run_detached(request: &SpawnRequest) -> Result<Spawned> {
    let mut cmd = request.command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(target_family = "unix")]
    {
        // Own process group, so a ^C meant for us doesn't take it down too.
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = cmd.spawn().map_err(|e| spawn_error(request, e))?;
    let pid = child.id();
    debug!("`{request}` detached as pid {pid}");
    reap_in_background(child);
    Ok(Spawned::Detached { pid })
}

/// Hand the child to a thread whose only job is to collect its exit status,
/// so it doesn't sit around as a zombie while we keep running. If we exit
/// first the child is reparented and the thread simply goes away.
fn reap_in_background(mut child: Child) {
    let pid = child.id();
    let spawned = std::thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!("pid {pid} exited with {status}"),
            Err(e) => warn!("Error waiting for pid {pid}: {e}"),
        });
    if let Err(e) = spawned {
        warn!("Unable to start reaper for pid {pid}: {e}");
    }
}
