pub mod error;
pub mod handlers;
pub mod models;
pub mod openai;
pub mod routes;
pub mod state;

use tracing::{error, info};

/// Attempts the completion client exactly once. A failure is logged and kept
/// in the state so the server still starts and answers every extraction
/// request with a configuration error.
pub fn build_state() -> state::AppState {
    let completion = openai::init_completion_client();
    match &completion {
        Ok(_) => info!("OpenAI client initialized"),
        Err(err) => error!("error initializing OpenAI client: {}", err),
    }
    state::AppState::new(completion)
}
