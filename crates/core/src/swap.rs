//! Exchanging the source and target selections across two catalogs.
//!
//! The catalogs are fetched independently and may use different codes for the
//! same language, so the join between them is the display name.

use crate::language::{Catalog, AUTO_DETECT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapResolution {
    pub source_code: String,
    pub target_code: String,
}

/// Resolves the codes a swap lands on, or `None` while the source is auto-detect.
///
/// The new source is the target-catalog entry named like the current source;
/// the new target is the source-catalog entry named like the current target.
/// Either side keeps its current code when no entry matches. A target that
/// would resolve to the sentinel also keeps its current code.
pub fn resolve_swap(
    source_code: &str,
    target_code: &str,
    source_catalog: &Catalog,
    target_catalog: &Catalog,
) -> Option<SwapResolution> {
    if source_code == AUTO_DETECT {
        return None;
    }

    let source_name = source_catalog.source_display_name(source_code);
    let target_name = target_catalog.display_name(target_code);

    let new_source = target_catalog
        .find_by_name(source_name)
        .map(|e| e.code.as_str())
        .unwrap_or(source_code);
    let new_target = source_catalog
        .find_by_name(target_name)
        .filter(|e| !e.is_auto_detect())
        .map(|e| e.code.as_str())
        .unwrap_or(target_code);

    Some(SwapResolution {
        source_code: new_source.to_owned(),
        target_code: new_target.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{fallback_source_catalog, fallback_target_catalog};
    use crate::language::LanguageEntry;

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        entries
            .iter()
            .map(|(c, n)| LanguageEntry::new(*c, *n))
            .collect()
    }

    #[test]
    fn disabled_for_auto_detect() {
        let source = fallback_source_catalog();
        let target = fallback_target_catalog();
        assert!(resolve_swap("auto", "ro", &source, &target).is_none());
    }

    #[test]
    fn unmatched_names_keep_current_codes() {
        let source = catalog(&[("en", "English")]);
        let target = catalog(&[("en", "English"), ("ro", "Romanian")]);
        let swapped = resolve_swap("en", "ro", &source, &target).expect("enabled");
        assert_eq!(
            swapped,
            SwapResolution {
                source_code: "en".into(),
                target_code: "ro".into(),
            }
        );
    }

    #[test]
    fn joins_on_display_name_not_code() {
        let source = catalog(&[("auto", "Detect language"), ("pt", "Portuguese"), ("en", "English")]);
        let target = catalog(&[("en-US", "English"), ("pt-BR", "Portuguese")]);
        let swapped = resolve_swap("pt", "en-US", &source, &target).expect("enabled");
        assert_eq!(swapped.source_code, "pt-BR");
        assert_eq!(swapped.target_code, "en");
    }

    #[test]
    fn unknown_source_code_matches_nothing() {
        let source = fallback_source_catalog();
        let target = fallback_target_catalog();
        let swapped = resolve_swap("xx", "de", &source, &target).expect("enabled");
        assert_eq!(swapped.source_code, "xx");
        assert_eq!(swapped.target_code, "de");
    }

    #[test]
    fn target_never_becomes_sentinel() {
        let source = catalog(&[("auto", "Detect language"), ("en", "English")]);
        let target = catalog(&[("en", "English"), ("zz", "Detect language")]);
        let swapped = resolve_swap("en", "zz", &source, &target).expect("enabled");
        assert_eq!(swapped.target_code, "zz");
    }
}
