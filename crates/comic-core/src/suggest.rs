//! Optional scene-suggestion service.
//!
//! Suggestions enrich segmentation; they never gate it. Callers treat any
//! `Err` as "no suggestions" and fall back to placeholder visualization.

use crate::error::EnrichmentError;
use crate::model::VisualizationHint;

/// Source of per-fragment visualization hints, indexed by fragment order.
#[allow(async_fn_in_trait)]
pub trait SceneSuggester {
    async fn suggest_scenes(&self, text: &str) -> Result<Vec<VisualizationHint>, EnrichmentError>;
}

/// Suggester used when no service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggestions;

impl SceneSuggester for NoSuggestions {
    async fn suggest_scenes(&self, _text: &str) -> Result<Vec<VisualizationHint>, EnrichmentError> {
        Err(EnrichmentError::Unavailable("no suggestion service configured".into()))
    }
}

/// Fixed hints, e.g. loaded from a file ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions(pub Vec<VisualizationHint>);

impl SceneSuggester for StaticSuggestions {
    async fn suggest_scenes(&self, _text: &str) -> Result<Vec<VisualizationHint>, EnrichmentError> {
        Ok(self.0.clone())
    }
}
