//! One-shot startup load of the source and target catalogs.

use crate::config::ClientConfig;
use crate::language::Catalog;
use crate::translate::{ApiError, TranslationApi};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "catalog";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatalogOrigin {
    Remote,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedCatalogs {
    pub source: Catalog,
    pub target: Catalog,
    /// `None` leaves the current target selection untouched.
    pub selected_target: Option<String>,
    pub origin: CatalogOrigin,
}

/// Fetches both catalogs. Any failure swaps *both* for the static fallback set.
pub async fn load_catalogs<A>(api: &A, config: &ClientConfig) -> LoadedCatalogs
where
    A: TranslationApi + ?Sized,
{
    match fetch_both(api).await {
        Ok((source, target)) => {
            let selected_target = pick_initial_target(&target, config);
            tracing::info!(
                target: LOG_TARGET,
                source_count = source.len(),
                target_count = target.len(),
                selected_target = ?selected_target,
                "catalogs loaded"
            );
            LoadedCatalogs {
                source,
                target,
                selected_target,
                origin: CatalogOrigin::Remote,
            }
        }
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, error = %e, "catalog fetch failed; using fallback languages");
            LoadedCatalogs {
                source: config.fallback_source_catalog.clone(),
                target: config.fallback_target_catalog.clone(),
                selected_target: Some(config.fallback_target.as_str().to_owned()),
                origin: CatalogOrigin::Fallback,
            }
        }
    }
}

async fn fetch_both<A>(api: &A) -> Result<(Catalog, Catalog), ApiError>
where
    A: TranslationApi + ?Sized,
{
    let source = api.source_languages().await?;
    let target = api.target_languages().await?;
    Ok((source, target))
}

/// Preferred code, then the universal default, then the first entry.
pub fn pick_initial_target(target: &Catalog, config: &ClientConfig) -> Option<String> {
    [config.preferred_target.as_str(), config.universal_target.as_str()]
        .into_iter()
        .find(|code| target.contains(code))
        .map(str::to_owned)
        .or_else(|| target.first().map(|e| e.code.clone()))
}
