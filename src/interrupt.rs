use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

static IN_FLIGHT: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Exit status used when the user interrupts the session.
pub const INTERRUPTED: i32 = 130;

/// Installs the SIGINT hook. A directory registered by a live
/// [`Scaffolding`] guard is removed before the process exits.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        if let Some(path) = take() {
            tracing::warn!("interrupted, removing {}", path.display());
            let _ = fs::remove_dir_all(&path);
        }
        let _ = console::Term::stderr().show_cursor();
        eprintln!();
        process::exit(INTERRUPTED);
    })
}

/// True when `err` stems from Ctrl-C pressed while a prompt owned the
/// terminal. Raw mode swallows the signal, so it surfaces as a read error.
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|err| err.kind() == io::ErrorKind::Interrupted)
    })
}

fn take() -> Option<PathBuf> {
    IN_FLIGHT.lock().ok().and_then(|mut slot| slot.take())
}

fn register(path: &Path) {
    if let Ok(mut slot) = IN_FLIGHT.lock() {
        *slot = Some(path.to_path_buf());
    }
}

fn release(path: &Path) {
    if let Ok(mut slot) = IN_FLIGHT.lock() {
        if slot.as_deref() == Some(path) {
            *slot = None;
        }
    }
}

/// Ties a directory created by this run to the current scope. Dropping the
/// guard without [`Scaffolding::commit`] removes the directory again.
#[must_use]
pub struct Scaffolding {
    path: PathBuf,
    committed: bool,
}

impl Scaffolding {
    pub fn begin(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        register(&path);
        Self {
            path,
            committed: false,
        }
    }

    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Scaffolding {
    fn drop(&mut self) {
        release(&self.path);
        if self.committed {
            return;
        }
        tracing::debug!("rolling back {}", self.path.display());
        let _ = fs::remove_dir_all(&self.path);
    }
}
