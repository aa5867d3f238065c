// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::{DecodeParams, Error, InferenceEngine, Result, SiamTracker};
use serde::{Deserialize, Serialize};

/// Hyper parameters of a [`SiamTracker`].
///
/// Every field has a default so a configuration file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Side of the template crop fed to the network.
    pub exemplar_size: usize,
    /// Side of the search crop fed to the network.
    pub instance_size: usize,
    /// Side of the square response map.
    pub score_size: usize,
    /// Distance between neighbouring anchors in search crop pixels.
    pub total_stride: usize,
    pub context_amount: f32,
    pub penalty_k: f32,
    pub window_influence: f32,
    pub lr: f32,
    /// Lower bound on the tracked width and height in image pixels.
    pub min_target_size: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            exemplar_size: 127,
            instance_size: 255,
            score_size: 31,
            total_stride: 8,
            context_amount: 0.5,
            penalty_k: 0.04,
            window_influence: 0.44,
            lr: 0.33,
            min_target_size: 10.0,
        }
    }
}

impl TrackerConfig {
    pub fn decode_params(&self) -> DecodeParams {
        DecodeParams {
            penalty_k: self.penalty_k,
            window_influence: self.window_influence,
            lr: self.lr,
        }
    }

    /// Checks the value ranges the tracker relies on.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("exemplar_size", self.exemplar_size),
            ("instance_size", self.instance_size),
            ("score_size", self.score_size),
            ("total_stride", self.total_stride),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        if self.instance_size < self.exemplar_size {
            return Err(Error::InvalidConfig(format!(
                "instance_size {} is smaller than exemplar_size {}",
                self.instance_size, self.exemplar_size
            )));
        }
        if !(0.0..=1.0).contains(&self.window_influence) {
            return Err(Error::InvalidConfig(format!(
                "window_influence {} is outside [0, 1]",
                self.window_influence
            )));
        }
        if !(0.0..=1.0).contains(&self.lr) {
            return Err(Error::InvalidConfig(format!(
                "lr {} is outside [0, 1]",
                self.lr
            )));
        }
        // negated so NaN is rejected too
        if !(self.context_amount >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "context_amount {} must be >= 0",
                self.context_amount
            )));
        }
        if !(self.penalty_k >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "penalty_k {} must be >= 0",
                self.penalty_k
            )));
        }
        if !(self.min_target_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_target_size {} must be > 0",
                self.min_target_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerBuilder {
    config_src: Option<ConfigSource>,
    penalty_k: Option<f32>,
    window_influence: Option<f32>,
    lr: Option<f32>,
    context_amount: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
enum ConfigSource {
    Yaml(String),
    Json(String),
    Config(TrackerConfig),
}

impl TrackerBuilder {
    /// Creates a builder with no configuration source. Building without a
    /// source uses [`TrackerConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the tracker configuration in YAML format. The string is parsed
    /// by `build()`.
    ///
    /// # Examples
    /// ```rust
    /// # use siamtrack_tracker::{TrackerBuilder, Result};
    /// # fn main() -> Result<()> {
    /// let config = TrackerBuilder::new()
    ///     .with_config_yaml_str("instance_size: 287\nscore_size: 25\n".to_string())
    ///     .build_config()?;
    /// assert_eq!(config.instance_size, 287);
    /// assert_eq!(config.exemplar_size, 127);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config_yaml_str(mut self, yaml_str: String) -> Self {
        self.config_src.replace(ConfigSource::Yaml(yaml_str));
        self
    }

    /// Loads the tracker configuration in JSON format. The string is parsed
    /// by `build()`.
    pub fn with_config_json_str(mut self, json_str: String) -> Self {
        self.config_src.replace(ConfigSource::Json(json_str));
        self
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config_src.replace(ConfigSource::Config(config));
        self
    }

    /// Overrides the size and ratio penalty of the loaded configuration.
    pub fn with_penalty_k(mut self, penalty_k: f32) -> Self {
        self.penalty_k = Some(penalty_k);
        self
    }

    /// Overrides the window prior weight of the loaded configuration.
    pub fn with_window_influence(mut self, window_influence: f32) -> Self {
        self.window_influence = Some(window_influence);
        self
    }

    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = Some(lr);
        self
    }

    pub fn with_context_amount(mut self, context_amount: f32) -> Self {
        self.context_amount = Some(context_amount);
        self
    }

    /// Parses the configuration source, applies the overrides and validates
    /// the result.
    pub fn build_config(self) -> Result<TrackerConfig> {
        let mut config = match self.config_src {
            Some(ConfigSource::Json(s)) => serde_json::from_str(&s)?,
            Some(ConfigSource::Yaml(s)) => serde_yaml::from_str(&s)?,
            Some(ConfigSource::Config(c)) => c,
            None => TrackerConfig::default(),
        };
        if let Some(penalty_k) = self.penalty_k {
            config.penalty_k = penalty_k;
        }
        if let Some(window_influence) = self.window_influence {
            config.window_influence = window_influence;
        }
        if let Some(lr) = self.lr {
            config.lr = lr;
        }
        if let Some(context_amount) = self.context_amount {
            config.context_amount = context_amount;
        }
        config.validate()?;
        Ok(config)
    }

    /// Builds a tracker driving `engine`.
    pub fn build<E: InferenceEngine>(self, engine: E) -> Result<SiamTracker<E>> {
        let config = self.build_config()?;
        SiamTracker::new(config, engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerBuilder::new().build_config().unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.score_size, 31);
        assert_eq!(config.decode_params(), DecodeParams::default());
    }

    #[test]
    fn test_json_with_overrides() {
        let json = r#"{ "penalty_k": 0.1, "window_influence": 0.2, "total_stride": 16 }"#;
        let config = TrackerBuilder::new()
            .with_config_json_str(json.to_string())
            .with_window_influence(0.3)
            .with_lr(0.5)
            .build_config()
            .unwrap();
        assert_eq!(config.penalty_k, 0.1);
        assert_eq!(config.window_influence, 0.3);
        assert_eq!(config.lr, 0.5);
        assert_eq!(config.total_stride, 16);
        assert_eq!(config.instance_size, 255);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = TrackerConfig {
            exemplar_size: 111,
            context_amount: 0.25,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = TrackerBuilder::new()
            .with_config_yaml_str(yaml)
            .build_config()
            .unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values() {
        let result = TrackerBuilder::new().with_lr(1.5).build_config();
        assert!(matches!(result, Err(Error::InvalidConfig(e)) if e.starts_with("lr 1.5")));

        let result = TrackerBuilder::new()
            .with_window_influence(-0.1)
            .build_config();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = TrackerBuilder::new()
            .with_context_amount(f32::NAN)
            .build_config();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = TrackerBuilder::new()
            .with_config(TrackerConfig {
                exemplar_size: 300,
                ..Default::default()
            })
            .build_config();
        assert!(matches!(
            result,
            Err(Error::InvalidConfig(e)) if e.contains("smaller than exemplar_size")
        ));

        let result = TrackerBuilder::new()
            .with_config(TrackerConfig {
                score_size: 0,
                ..Default::default()
            })
            .build_config();
        assert!(matches!(result, Err(Error::InvalidConfig(e)) if e == "score_size must be > 0"));
    }

    #[test]
    fn test_malformed_source() {
        let result = TrackerBuilder::new()
            .with_config_json_str("{ \"lr\": ".to_string())
            .build_config();
        assert!(matches!(result, Err(Error::Json(_))));

        let result = TrackerBuilder::new()
            .with_config_yaml_str("lr: [1, 2".to_string())
            .build_config();
        assert!(matches!(result, Err(Error::Yaml(_))));
    }
}
