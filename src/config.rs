use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How the offset joins two straight segments meeting at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    /// Extend both offsets to their intersection; falls back to bevel past
    /// the miter limit.
    #[default]
    Miter,
    /// Connect the offset ends with a straight segment.
    Bevel,
}

/// Settings for a pipeline run.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Segments shorter than this are dropped before deduplication.
    pub min_segment_length: f64,
    /// Offset distance; `0` emits the oriented boundaries unchanged.
    pub offset_distance: f64,
    pub join_style: JoinStyle,
    /// Do not emit offsets for holes.
    pub skip_inner_offset: bool,
    /// Layer excluded from snapping, chaining, nesting and offsetting.
    pub engraving_layer: Option<String>,
    /// Layer receiving the offset curves; created when missing.
    pub offset_layer: String,
    /// Abort the run when a boundary cannot be offset; otherwise skip it.
    pub abort_on_offset_failure: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 0.01,
            offset_distance: 0.05,
            join_style: JoinStyle::Miter,
            skip_inner_offset: false,
            engraving_layer: None,
            offset_layer: "Offset".to_string(),
            abort_on_offset_failure: true,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(ConfigError::from)?)
    }

    /// Rejects negative or non-finite lengths and distances.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_segment_length", self.min_segment_length),
            ("offset_distance", self.offset_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { name, value }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LineworkError;

    #[test]
    fn empty_object_gives_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!((config.min_segment_length - 0.01).abs() < 1e-12);
        assert!((config.offset_distance - 0.05).abs() < 1e-12);
        assert_eq!(config.offset_layer, "Offset");
        assert!(config.abort_on_offset_failure);
    }

    #[test]
    fn partial_override() {
        let config = PipelineConfig::from_json(
            r#"{"offset_distance": 1.0, "join_style": "bevel", "engraving_layer": "Engrave"}"#,
        )
        .unwrap();
        assert!((config.offset_distance - 1.0).abs() < 1e-12);
        assert_eq!(config.join_style, JoinStyle::Bevel);
        assert_eq!(config.engraving_layer.as_deref(), Some("Engrave"));
        assert!(!config.skip_inner_offset);
    }

    #[test]
    fn json_round_trip() {
        let config = PipelineConfig {
            skip_inner_offset: true,
            ..PipelineConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn negative_distance_rejected() {
        let err = PipelineConfig::from_json(r#"{"offset_distance": -1.0}"#).unwrap_err();
        assert!(matches!(
            err,
            LineworkError::Config(ConfigError::Invalid {
                name: "offset_distance",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = PipelineConfig::from_json(r#"{"join_style": "round"}"#).unwrap_err();
        assert!(matches!(err, LineworkError::Config(ConfigError::Parse(_))));
    }
}
