use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use crate::errors::{HopError, HopResult};
use crate::state::links::{Entry, LinkStore};

/// Serialize the whole map as one self-contained JSON blob.
pub fn encode(entries: &HashMap<String, Entry>) -> HopResult<Vec<u8>> {
    serde_json::to_vec_pretty(entries).map_err(HopError::Encode)
}

/// Inverse of [`encode`]. Zero bytes (or pure whitespace) means "no prior
/// data" and yields an empty map; anything else must parse completely.
pub fn decode(bytes: &[u8]) -> HopResult<HashMap<String, Entry>> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }
    serde_json::from_slice(bytes).map_err(HopError::Decode)
}

/// Persist the current store state to `path`.
///
/// The snapshot goes to a sibling temp file first and is renamed into place,
/// so a snapshot that shrinks cannot leave trailing bytes of its predecessor
/// behind, and a reader of `path` only ever sees one complete blob.
pub fn write_snapshot(path: &Path, store: &LinkStore) -> HopResult<()> {
    let entries = store.snapshot_copy();
    let bytes = encode(&entries)?;

    let tmp: PathBuf = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Rebuild the store from the snapshot at `path`. Returns the number of
/// recovered entries.
///
/// A missing file is a fresh start (the file appears on the first snapshot).
/// Any other failure must abort startup: serving traffic against a
/// half-recovered store loses data silently.
pub fn load_snapshot(path: &Path, store: &LinkStore) -> HopResult<usize> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No snapshot found at startup (path = {})", path.display());
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    let entries = decode(&bytes)?;
    for entry in entries.into_values() {
        store.commit(entry);
    }
    Ok(store.len())
}

/// Handle the request handlers use to hand writes to the persistence worker.
///
/// The channel holds a single entry, so `submit` suspends its caller until
/// the worker side has made room: the caller learns "the worker owns this
/// write now", not "this write is on disk". Durability follows on the
/// worker's snapshot cadence.
#[derive(Clone)]
pub struct SubmitQueue {
    tx: mpsc::Sender<Entry>,
}

impl SubmitQueue {
    pub async fn submit(&self, entry: Entry) -> HopResult<()> {
        self.tx.send(entry).await.map_err(|_| HopError::QueueClosed)
    }
}

/// Spawn the persistence worker: the sole writer of both the store and the
/// snapshot file.
///
/// Every received entry is committed to memory immediately. The snapshot is
/// written lazily, on a commit at most once per `sync_interval`, measured
/// from the previous attempt; a failed write re-arms the timer too and the
/// worker keeps serving, the in-memory store stays authoritative.
///
/// When the last [`SubmitQueue`] is dropped the worker drains whatever it
/// already accepted and writes a final snapshot before exiting.
pub fn start_worker(
    store: LinkStore,
    path: PathBuf,
    sync_interval: Duration,
) -> (SubmitQueue, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(run_worker(rx, store, path, sync_interval));
    (SubmitQueue { tx }, handle)
}

async fn run_worker(
    mut rx: mpsc::Receiver<Entry>,
    store: LinkStore,
    path: PathBuf,
    sync_interval: Duration,
) {
    let mut last_sync = Instant::now();

    while let Some(entry) = rx.recv().await {
        store.commit(entry);

        if last_sync.elapsed() >= sync_interval {
            match write_snapshot(&path, &store) {
                Ok(()) => tracing::info!(
                    "Snapshot saved: {} entries to {}",
                    store.len(),
                    path.display()
                ),
                Err(e) => tracing::warn!("Failed to write snapshot: {e}"),
            }
            last_sync = Instant::now();
        }
    }

    // Queue closed: the server stopped handing out writes. Everything
    // accepted has been committed above, so one last snapshot captures it.
    match write_snapshot(&path, &store) {
        Ok(()) => tracing::info!("Final snapshot saved to {}", path.display()),
        Err(e) => tracing::error!("Failed to write final snapshot: {e}"),
    }
}
