use gemini_agent::GeminiClient;
use stepwise_core::store::Store;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(store: Store, gemini: GeminiClient) -> Self {
        Self { store, gemini }
    }
}
