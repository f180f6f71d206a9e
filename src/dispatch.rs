//! Launching the configured command

use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::error::{ReceiverError, Result};

/// A command that was started. The receiver never waits on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub pid: Option<u32>,
}

/// Starts a resolved argument vector as an external command.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, argv: &[String]) -> Result<Launched>;
}

/// Spawns commands as child processes of the receiver.
///
/// The child inherits stdout/stderr and gets a null stdin. Its handle is
/// dropped right after spawning; tokio reaps the exit status in the background.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDispatcher;

impl Dispatcher for ProcessDispatcher {
    fn dispatch(&self, argv: &[String]) -> Result<Launched> {
        let (program, args) = argv.split_first().ok_or_else(|| ReceiverError::Launch {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| ReceiverError::Launch {
                program: program.clone(),
                source,
            })?;

        let pid = child.id();
        info!("Started '{}' (pid {:?})", program, pid);
        Ok(Launched { pid })
    }
}
