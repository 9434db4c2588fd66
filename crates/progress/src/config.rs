//! Tracker configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TrackerError};

/// Configuration for the route progress tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Step the cursor starts at after a route is loaded (1 skips "depart")
    pub start_index: usize,
    /// Geofence radius used for steps without one of their own
    pub geofence_radius_meters: f64,
    /// Language tag passed to the speech announcer
    pub speech_language: String,
    /// Speaking rate passed to the speech announcer
    pub speech_rate: f32,
    /// Spoken and displayed once the last boundary is crossed
    pub arrival_message: String,
    /// Most recent tracker events a navigation session keeps
    pub journal_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            start_index: 1,
            geofence_radius_meters: 20.0,
            speech_language: "en-GB".to_string(),
            speech_rate: 0.5,
            arrival_message: "You have arrived at your destination".to_string(),
            journal_limit: 256,
        }
    }
}

impl TrackerConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.geofence_radius_meters > 0.0) {
            return Err(TrackerError::Config(format!(
                "geofence radius must be positive, got {}",
                self.geofence_radius_meters
            )));
        }
        if !(self.speech_rate > 0.0) {
            return Err(TrackerError::Config(format!(
                "speech rate must be positive, got {}",
                self.speech_rate
            )));
        }
        if self.speech_language.trim().is_empty() {
            return Err(TrackerError::Config("speech language is empty".to_string()));
        }
        if self.journal_limit == 0 {
            return Err(TrackerError::Config("journal limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.start_index, 1);
        assert_eq!(config.geofence_radius_meters, 20.0);
        assert_eq!(config.speech_language, "en-GB");
        assert_eq!(config.speech_rate, 0.5);
        assert_eq!(config.journal_limit, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let config = TrackerConfig {
            geofence_radius_meters: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));

        let config = TrackerConfig {
            geofence_radius_meters: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_journal() {
        let config = TrackerConfig {
            journal_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        tokio::fs::write(&path, r#"{ "start_index": 0, "speech_language": "en-US" }"#)
            .await
            .unwrap();

        let config = TrackerConfig::load(&path).await.unwrap();
        assert_eq!(config.start_index, 0);
        assert_eq!(config.speech_language, "en-US");
        assert_eq!(config.geofence_radius_meters, 20.0);
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(matches!(
            TrackerConfig::load(&path).await,
            Err(TrackerError::Json(_))
        ));
    }
}
