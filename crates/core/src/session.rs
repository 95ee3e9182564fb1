use crate::catalog::{CatalogOrigin, LoadedCatalogs};
use crate::config::ClientConfig;
use crate::language::{Catalog, AUTO_DETECT};
use crate::swap::resolve_swap;
use crate::translate::{TranslationRequest, TranslationResult};
use serde::{Deserialize, Serialize};

pub const LOADING_MESSAGE: &str = "Translating...";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("language code must not be empty")]
    EmptyCode,
    #[error("`auto` is not a valid target language")]
    AutoDetectTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    Disabled,
}

/// What the output pane shows, in precedence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPane<'a> {
    Loading,
    Error(&'a str),
    Text(&'a str),
}

/// All state of one translation session, plus the catalogs it selects from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub input_text: String,
    pub translated_text: String,
    pub source_code: String,
    pub target_code: String,
    pub detected_code: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub source_catalog: Catalog,
    pub target_catalog: Catalog,
    pub catalog_origin: Option<CatalogOrigin>,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            input_text: String::new(),
            translated_text: String::new(),
            source_code: AUTO_DETECT.to_owned(),
            target_code: config.universal_target.as_str().to_owned(),
            detected_code: None,
            loading: false,
            error: None,
            source_catalog: Catalog::default(),
            target_catalog: Catalog::default(),
            catalog_origin: None,
        }
    }

    /// Returns whether the text actually changed.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        replace_if_changed(&mut self.input_text, text.into())
    }

    pub fn set_source(&mut self, code: impl Into<String>) -> Result<bool, SessionError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SessionError::EmptyCode);
        }
        Ok(replace_if_changed(&mut self.source_code, code))
    }

    pub fn set_target(&mut self, code: impl Into<String>) -> Result<bool, SessionError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SessionError::EmptyCode);
        }
        if code == AUTO_DETECT {
            return Err(SessionError::AutoDetectTarget);
        }
        Ok(replace_if_changed(&mut self.target_code, code))
    }

    /// Installs freshly loaded catalogs. Returns whether the target changed.
    pub fn apply_catalogs(&mut self, loaded: LoadedCatalogs) -> bool {
        self.source_catalog = loaded.source;
        self.target_catalog = loaded.target;
        self.catalog_origin = Some(loaded.origin);
        match loaded.selected_target {
            Some(code) if code != AUTO_DETECT => replace_if_changed(&mut self.target_code, code),
            _ => false,
        }
    }

    /// Marks a request as in flight and snapshots what to send.
    pub fn begin_request(&mut self) -> TranslationRequest {
        self.loading = true;
        self.error = None;
        TranslationRequest {
            text: self.input_text.clone(),
            source_code: self.source_code.clone(),
            target_code: self.target_code.clone(),
        }
    }

    pub fn apply_success(&mut self, request: &TranslationRequest, result: TranslationResult) {
        self.translated_text = result.translated_text;
        self.detected_code = if request.is_auto_detect() {
            result.detected_source_code.filter(|c| !c.is_empty())
        } else {
            None
        };
        self.loading = false;
    }

    /// Keeps the previous translation on screen.
    pub fn apply_failure(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    /// Nothing to translate: blank the output side.
    pub fn clear_output(&mut self) {
        self.translated_text.clear();
        self.detected_code = None;
        self.loading = false;
    }

    pub fn swap(&mut self) -> SwapOutcome {
        let Some(resolved) = resolve_swap(
            &self.source_code,
            &self.target_code,
            &self.source_catalog,
            &self.target_catalog,
        ) else {
            return SwapOutcome::Disabled;
        };
        self.source_code = resolved.source_code;
        self.target_code = resolved.target_code;
        std::mem::swap(&mut self.input_text, &mut self.translated_text);
        SwapOutcome::Swapped
    }

    pub fn swap_enabled(&self) -> bool {
        self.source_code != AUTO_DETECT
    }

    pub fn clear_enabled(&self) -> bool {
        !self.input_text.is_empty()
    }

    pub fn copy_enabled(&self) -> bool {
        !self.translated_text.is_empty()
    }

    pub fn output_pane(&self) -> OutputPane<'_> {
        if self.loading {
            OutputPane::Loading
        } else if let Some(error) = &self.error {
            OutputPane::Error(error)
        } else {
            OutputPane::Text(&self.translated_text)
        }
    }

    /// Display name of the detected language, shown only while auto-detecting.
    pub fn detected_language_name(&self) -> Option<&str> {
        if self.source_code != AUTO_DETECT {
            return None;
        }
        self.detected_code
            .as_deref()
            .map(|code| self.source_catalog.source_display_name(code))
    }

    pub fn source_name(&self) -> &str {
        self.source_catalog.source_display_name(&self.source_code)
    }

    pub fn target_name(&self) -> &str {
        self.target_catalog.display_name(&self.target_code)
    }
}

fn replace_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{fallback_source_catalog, fallback_target_catalog};
    use crate::language::LanguageEntry;

    fn session() -> Session {
        let mut s = Session::new(&ClientConfig::default());
        s.apply_catalogs(LoadedCatalogs {
            source: fallback_source_catalog(),
            target: fallback_target_catalog(),
            selected_target: Some("ro".into()),
            origin: CatalogOrigin::Fallback,
        });
        s
    }

    #[test]
    fn starts_auto_to_universal_default() {
        let s = Session::new(&ClientConfig::default());
        assert_eq!(s.source_code, "auto");
        assert_eq!(s.target_code, "en");
        assert!(!s.swap_enabled());
        assert_eq!(s.output_pane(), OutputPane::Text(""));
    }

    #[test]
    fn target_rejects_sentinel_and_keeps_state() {
        let mut s = session();
        assert_eq!(s.set_target("auto"), Err(SessionError::AutoDetectTarget));
        assert_eq!(s.target_code, "ro");
        assert_eq!(s.set_target("ro"), Ok(false));
        assert_eq!(s.set_target("de"), Ok(true));
    }

    #[test]
    fn success_records_detection_only_for_auto() {
        let mut s = session();
        s.set_input("buna ziua");
        let req = s.begin_request();
        assert!(s.loading);
        s.apply_success(
            &req,
            TranslationResult {
                translated_text: "good day".into(),
                detected_source_code: Some("ro".into()),
            },
        );
        assert!(!s.loading);
        assert_eq!(s.detected_code.as_deref(), Some("ro"));
        assert_eq!(s.detected_language_name(), Some("Romanian"));

        s.set_source("ro").expect("valid code");
        let req = s.begin_request();
        s.apply_success(
            &req,
            TranslationResult {
                translated_text: "good day".into(),
                detected_source_code: Some("ro".into()),
            },
        );
        assert!(s.detected_code.is_none());
        assert!(s.detected_language_name().is_none());
    }

    #[test]
    fn failure_keeps_previous_translation() {
        let mut s = session();
        s.translated_text = "hello".into();
        let _ = s.begin_request();
        assert_eq!(s.output_pane(), OutputPane::Loading);
        s.apply_failure("quota exceeded".into());
        assert!(!s.loading);
        assert_eq!(s.translated_text, "hello");
        assert_eq!(s.output_pane(), OutputPane::Error("quota exceeded"));

        let _ = s.begin_request();
        assert!(s.error.is_none());
    }

    #[test]
    fn swap_exchanges_texts_and_codes() {
        let mut s = session();
        s.set_source("en").expect("valid code");
        s.set_input("hello");
        s.translated_text = "salut".into();

        assert_eq!(s.swap(), SwapOutcome::Swapped);
        assert_eq!(s.input_text, "salut");
        assert_eq!(s.translated_text, "hello");
        assert_eq!(s.source_code, "en");
        assert_eq!(s.target_code, "ro");
    }

    #[test]
    fn swap_is_noop_while_auto_detecting() {
        let mut s = session();
        s.set_input("hello");
        s.translated_text = "salut".into();
        let before = s.clone();
        assert_eq!(s.swap(), SwapOutcome::Disabled);
        assert_eq!(s, before);
    }

    #[test]
    fn empty_remote_target_catalog_keeps_selection() {
        let mut s = Session::new(&ClientConfig::default());
        let changed = s.apply_catalogs(LoadedCatalogs {
            source: Catalog::new(vec![LanguageEntry::auto_detect()]),
            target: Catalog::default(),
            selected_target: None,
            origin: CatalogOrigin::Remote,
        });
        assert!(!changed);
        assert_eq!(s.target_code, "en");
        assert_eq!(s.catalog_origin, Some(CatalogOrigin::Remote));
    }

    #[test]
    fn enabled_flags_follow_texts() {
        let mut s = session();
        assert!(!s.clear_enabled());
        assert!(!s.copy_enabled());
        s.set_input("x");
        s.translated_text = "y".into();
        assert!(s.clear_enabled());
        assert!(s.copy_enabled());
        s.clear_output();
        assert!(!s.copy_enabled());
    }
}
