use crate::config::AppConfig;
use crate::persistence::SubmitQueue;
use crate::state::links::LinkStore;

/// Shared application state handed to every handler at router build time.
///
/// The submit queue is injected here rather than smuggled through request
/// extensions, so the handler -> worker dependency is visible in the types.
#[derive(Clone)]
pub struct AppState {
    pub store: LinkStore,
    pub queue: SubmitQueue,
    pub config: AppConfig,
}
