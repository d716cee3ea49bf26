/*
 * Launches an independent instance of this tool for a given file. Strictly
 * fire-and-forget: no IPC back-channel, no completion signal, and the child
 * is never awaited. Only an immediate spawn failure is reported.
 */
use std::io;
use std::path::Path;
use std::process::Command;

pub trait ProcessLauncherOperations: Send + Sync {
    fn spawn(&self, executable: &Path, argument: &Path) -> io::Result<()>;
}

pub struct CoreProcessLauncher {}

impl CoreProcessLauncher {
    pub fn new() -> Self {
        CoreProcessLauncher {}
    }
}

impl Default for CoreProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncherOperations for CoreProcessLauncher {
    fn spawn(&self, executable: &Path, argument: &Path) -> io::Result<()> {
        log::debug!("CoreProcessLauncher: Spawning {executable:?} with {argument:?}");
        Command::new(executable).arg(argument).spawn()?;
        Ok(())
    }
}
