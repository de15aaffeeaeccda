use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("no Gemini API key configured: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    #[error("Gemini API error {code} ({status}): {message}")]
    Api {
        code: i32,
        status: String,
        message: String,
    },

    #[error("Gemini returned no usable text candidate")]
    EmptyResponse,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
