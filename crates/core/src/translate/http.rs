use crate::config::ApiBaseUrl;
use crate::language::Catalog;
use crate::translate::{ApiError, TranslationApi, TranslationRequest, TranslationResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const LOG_TARGET: &str = "translate::http";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpTranslationApi {
    client: Client,
    base_url: ApiBaseUrl,
}

impl HttpTranslationApi {
    pub fn new(base_url: ApiBaseUrl) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn with_client(client: Client, base_url: ApiBaseUrl) -> Self {
        Self { client, base_url }
    }

    async fn fetch_catalog(&self, path: &str) -> Result<Catalog, ApiError> {
        let url = self.base_url.endpoint(path);
        tracing::debug!(target: LOG_TARGET, %url, "fetching catalog");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;

        response
            .json::<Catalog>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse catalog: {e}")))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateBody<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateReply {
    translation: String,
    #[serde(default)]
    detected_language: Option<String>,
}

#[derive(Deserialize)]
struct ErrorReply {
    #[serde(default)]
    error: Option<String>,
}

/// Turns a non-2xx response into [`ApiError::Status`], keeping the server's `error` text.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorReply>()
        .await
        .ok()
        .and_then(|reply| reply.error);
    tracing::warn!(target: LOG_TARGET, status = status.as_u16(), ?message, "backend returned error");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl TranslationApi for HttpTranslationApi {
    fn source_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>> {
        self.fetch_catalog("source-languages").boxed()
    }

    fn target_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>> {
        self.fetch_catalog("target-languages").boxed()
    }

    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResult, ApiError>> {
        async move {
            let body = TranslateBody {
                text: &request.text,
                source_lang: &request.source_code,
                target_lang: &request.target_code,
            };

            let response = self
                .client
                .post(self.base_url.endpoint("translate"))
                .json(&body)
                .send()
                .await?;
            let response = ensure_success(response).await?;

            let reply: TranslateReply = response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("failed to parse JSON: {e}")))?;

            Ok(TranslationResult {
                translated_text: reply.translation,
                detected_source_code: reply.detected_language,
            })
        }
        .boxed()
    }
}
