mod echo;
mod http;

use crate::language::{Catalog, AUTO_DETECT};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use echo::EchoTranslationApi;
pub use http::HttpTranslationApi;

pub const GENERIC_FAILURE_MESSAGE: &str = "Translation failed. Please try again.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_code: String,
    pub target_code: String,
}

impl TranslationRequest {
    pub fn is_auto_detect(&self) -> bool {
        self.source_code == AUTO_DETECT
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
    pub detected_source_code: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http error {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Message fit for showing next to the output pane.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_owned(),
        }
    }
}

/// The remote translation service.
pub trait TranslationApi: Send + Sync {
    fn source_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>>;

    fn target_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>>;

    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResult, ApiError>>;
}
