/*
 * File-open prompt abstraction. The session only ever needs one dialog: ask
 * the user for a file to open, or nothing if they cancel. The concrete
 * implementation is a terminal prompt; a graphical frontend would supply its
 * own implementation of the same trait.
 */
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub trait DialogServiceOperations: Send + Sync {
    fn prompt_for_file_to_open(&self, filter: &str, title: &str) -> Option<PathBuf>;
}

pub struct CoreDialogService {}

impl CoreDialogService {
    pub fn new() -> Self {
        CoreDialogService {}
    }
}

impl Default for CoreDialogService {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogServiceOperations for CoreDialogService {
    // An empty line cancels, mirroring a dismissed file picker.
    fn prompt_for_file_to_open(&self, filter: &str, title: &str) -> Option<PathBuf> {
        eprintln!("{title} [{filter}]");
        eprint!("path> ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    log::debug!("CoreDialogService: Open prompt cancelled.");
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                }
            }
            Err(e) => {
                log::warn!("CoreDialogService: Failed to read from stdin: {e}");
                None
            }
        }
    }
}
