use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, error, info, warn};

use crate::error::LedgerError;
use crate::model::{AuditAppend, AuditEvent, AuditEventList, QueryWindow};
use crate::state::LedgerState;
use crate::traits::{AuditReader, AuditWriter};

/// Append-only JSON Lines ledger.
///
/// Each event is one line. The line is written and synced while the write
/// lock is held, and only then becomes visible to readers. A failed write is
/// truncated away; if that truncation also fails the ledger halts and
/// refuses further appends until it is reopened.
#[derive(Debug)]
pub struct JsonlAuditLedger {
    path: PathBuf,
    inner: RwLock<JsonlState>,
}

#[derive(Debug)]
struct JsonlState {
    file: File,
    ledger: LedgerState,
    halted: Option<String>,
}

impl JsonlAuditLedger {
    /// Open or create the file, reloading and validating any prior history.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;
        let history = read_history(&file)?;
        let ledger = LedgerState::from_history(history)?;

        debug!(path = %path.display(), events = ledger.len(), "Audit ledger opened");
        Ok(Self {
            path,
            inner: RwLock::new(JsonlState {
                file,
                ledger,
                halted: None,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_history(file: &File) -> Result<Vec<AuditEvent>, LedgerError> {
    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|err| LedgerError::Corrupt {
            line: index + 1,
            reason: err.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Byte sink a ledger line is appended to.
trait LineStore: Write {
    fn committed_len(&self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LineStore for File {
    fn committed_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

#[derive(Debug)]
enum AppendError {
    /// Nothing of the line remains in the store.
    RolledBack(io::Error),
    /// Part of the line may remain; the store can no longer be trusted.
    Torn { write: io::Error, rollback: io::Error },
}

/// Append one line so that it is either fully synced or absent.
fn append_line<S: LineStore>(store: &mut S, line: &[u8]) -> Result<(), AppendError> {
    let committed = store.committed_len().map_err(AppendError::RolledBack)?;
    match write_synced(store, line) {
        Ok(()) => Ok(()),
        Err(write) => match store.truncate_to(committed) {
            Ok(()) => Err(AppendError::RolledBack(write)),
            Err(rollback) => Err(AppendError::Torn { write, rollback }),
        },
    }
}

fn write_synced<S: LineStore>(store: &mut S, line: &[u8]) -> io::Result<()> {
    store.write_all(line)?;
    store.flush()?;
    store.sync()
}

impl AuditWriter for JsonlAuditLedger {
    fn append(&self, entry: AuditAppend) -> Result<AuditEvent, LedgerError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("jsonl audit ledger"))?;
        if let Some(reason) = &state.halted {
            return Err(LedgerError::Halted(reason.clone()));
        }
        let event = state.ledger.prepare(entry)?;

        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        match append_line(&mut state.file, &line) {
            Ok(()) => {}
            Err(AppendError::RolledBack(err)) => {
                warn!(id = event.id, error = %err, "Audit append rolled back");
                return Err(err.into());
            }
            Err(AppendError::Torn { write, rollback }) => {
                let reason = format!(
                    "append of id {} failed ({write}) and rollback failed ({rollback})",
                    event.id
                );
                error!(path = %self.path.display(), reason = %reason, "Audit ledger halted");
                state.halted = Some(reason.clone());
                return Err(LedgerError::Halted(reason));
            }
        }
        state.ledger.commit(event.clone());

        info!(
            id = event.id,
            event_type = %event.event_type,
            request_id = %event.request_id,
            "Audit event appended"
        );
        Ok(event)
    }
}

impl AuditReader for JsonlAuditLedger {
    fn query(&self, window: QueryWindow) -> Result<AuditEventList, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("jsonl audit ledger"))?;
        Ok(state.ledger.page(window))
    }

    fn total(&self) -> Result<u64, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("jsonl audit ledger"))?;
        Ok(state.ledger.len() as u64)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("jsonl audit ledger"))?;
        state.ledger.validate()
    }
}
