use chrono::Utc;
use std::collections::HashMap;

use crate::errors::HopResult;
use crate::state::app::AppState;
use crate::state::links::Entry;

/// Construct the new entry for `key` and hand it to the persistence worker.
///
/// The returned entry is what `lookup` observes once the worker commits it.
/// The caller resumes as soon as the worker has accepted the write, which is
/// before it is durable.
pub async fn set_link(state: &AppState, key: &str, url: String) -> HopResult<Entry> {
    let entry = state.store.upsert(key, url, Utc::now().timestamp())?;
    state.queue.submit(entry.clone()).await?;
    Ok(entry)
}

/// Retrieve the record for a key, if present.
pub fn get_link(state: &AppState, key: &str) -> Option<Entry> {
    state.store.lookup(key)
}

/// All records, keyed by link key.
pub fn list_links(state: &AppState) -> HashMap<String, Entry> {
    state.store.snapshot_copy()
}

/// Where a visit to a key should send the client.
///
/// Stored urls may omit the scheme. A url is used verbatim only when it
/// starts with `http://` or `https://` (ASCII case-insensitive); everything
/// else, other schemes included, is served with an `http://` prefix.
/// Matching at the scheme position only, never by substring, so a url that
/// merely mentions `http://` in its path or query is still prefixed.
pub fn redirect_target(url: &str) -> String {
    let starts_with = |prefix: &str| {
        url.len() >= prefix.len()
            && url.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    };

    if starts_with("http://") || starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
