use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no launcher handles `{}`", .0.join(" "))]
    NoHandler(Vec<String>),

    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
