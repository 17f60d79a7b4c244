//! JSON contract for externally-plugged weighting/scoring strategies.
//!
//! The deriver and scorer each accept a pluggable strategy. A deterministic
//! rule engine is the default, but deployments that delegate the judgment to
//! a text-generation model plug in a strategy that returns this module's
//! JSON payloads. Parsing is tolerant of fenced code blocks and surrounding
//! prose; anything else is a [`StrategyError`], which the caller absorbs
//! into its documented fallback rather than surfacing.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("strategy response parse error: {0}")]
    Parse(String),
    #[error("strategy execution failed: {0}")]
    Execution(String),
}

/// Weight payload: `{"weights": {"price": 0.35, ...}, "reasoning": "..."}`.
#[derive(Debug, Deserialize)]
struct WeightResponseJson {
    weights: HashMap<String, f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Score payload:
/// `{"scores": {"prod_1": {"price": 0.9, ...}, ...}, "reasoning": "..."}`.
#[derive(Debug, Deserialize)]
struct ScoreResponseJson {
    scores: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parse a raw weight response into criterion → raw weight.
///
/// Weights here are pre-normalization: the deriver renormalizes over the
/// criteria set afterwards, so the payload only needs relative magnitudes.
pub fn parse_weight_response(
    raw: &str,
) -> Result<(HashMap<String, f64>, Option<String>), StrategyError> {
    let parsed: WeightResponseJson = serde_json::from_str(extract_json(raw))
        .map_err(|e| StrategyError::Parse(e.to_string()))?;
    if parsed.weights.is_empty() {
        return Err(StrategyError::Parse("empty 'weights' object".into()));
    }
    Ok((parsed.weights, parsed.reasoning))
}

/// Parse a raw score response into alternative id → (criterion → score).
pub fn parse_score_response(
    raw: &str,
) -> Result<(HashMap<String, HashMap<String, f64>>, Option<String>), StrategyError> {
    let parsed: ScoreResponseJson = serde_json::from_str(extract_json(raw))
        .map_err(|e| StrategyError::Parse(e.to_string()))?;
    if parsed.scores.is_empty() {
        return Err(StrategyError::Parse("empty 'scores' object".into()));
    }
    Ok((parsed.scores, parsed.reasoning))
}

/// Extract a JSON object from a response that may carry fences or prose.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find('{') {
        let remainder = &trimmed[start..];
        let mut depth = 0;
        for (i, c) in remainder.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return &remainder[..=i];
                    }
                }
                _ => {}
            }
        }
    }

    trimmed
}
