use crate::config::{fallback_source_catalog, fallback_target_catalog};
use crate::language::Catalog;
use crate::translate::{ApiError, TranslationApi, TranslationRequest, TranslationResult};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Offline backend: serves the static catalogs and echoes text back unchanged.
#[derive(Clone)]
pub struct EchoTranslationApi;

impl EchoTranslationApi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoTranslationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationApi for EchoTranslationApi {
    fn source_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>> {
        async { Ok(fallback_source_catalog()) }.boxed()
    }

    fn target_languages(&self) -> BoxFuture<'_, Result<Catalog, ApiError>> {
        async { Ok(fallback_target_catalog()) }.boxed()
    }

    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResult, ApiError>> {
        async move {
            // Pretend everything auto-detected is English.
            let detected_source_code = request.is_auto_detect().then(|| "en".to_owned());
            Ok(TranslationResult {
                translated_text: request.text,
                detected_source_code,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_text_and_reports_detection_only_for_auto() {
        let api = EchoTranslationApi::new();
        let auto = api
            .translate(TranslationRequest {
                text: "buna".into(),
                source_code: "auto".into(),
                target_code: "en".into(),
            })
            .await
            .expect("echo never fails");
        assert_eq!(auto.translated_text, "buna");
        assert_eq!(auto.detected_source_code.as_deref(), Some("en"));

        let fixed = api
            .translate(TranslationRequest {
                text: "hola".into(),
                source_code: "es".into(),
                target_code: "en".into(),
            })
            .await
            .expect("echo never fails");
        assert!(fixed.detected_source_code.is_none());
    }
}
