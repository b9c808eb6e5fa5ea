use anyhow::{Context, Result};
use mesa_core::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub generate: GenerateSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSection {
    pub valid_threshold: i32,
    pub acceptable_threshold: i32,
    pub weekly_variety_bonus: i32,
    pub monthly_variety_bonus: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateSection {
    /// Fixed sampling seed; omit for a different plan every run.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringSection::default(),
            generate: GenerateSection::default(),
        }
    }
}

impl Default for ScoringSection {
    fn default() -> Self {
        let defaults = ScoringConfig::default();
        Self {
            valid_threshold: defaults.valid_threshold,
            acceptable_threshold: defaults.acceptable_threshold,
            weekly_variety_bonus: defaults.weekly_variety_bonus,
            monthly_variety_bonus: defaults.monthly_variety_bonus,
        }
    }
}

impl Config {
    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            valid_threshold: self.scoring.valid_threshold,
            acceptable_threshold: self.scoring.acceptable_threshold,
            weekly_variety_bonus: self.scoring.weekly_variety_bonus,
            monthly_variety_bonus: self.scoring.monthly_variety_bonus,
        }
    }
}

/// Load `mesa.toml`; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core() {
        let cfg = Config::default().scoring_config();
        assert_eq!(cfg, ScoringConfig::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[generate]\nseed = 9\n").unwrap();
        assert_eq!(cfg.generate.seed, Some(9));
        assert_eq!(cfg.scoring.valid_threshold, 60);
    }
}
