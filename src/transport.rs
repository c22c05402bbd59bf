use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Key of the only mode the traffic adjustment applies to.
pub const CAR_KEY: &str = "car";

const TRAFFIC_MULTIPLIER: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    pub key: String,
    pub label: String,
    pub base_travel_minutes: i64,
}

impl TransportOption {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        base_travel_minutes: i64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            base_travel_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTable {
    options: Vec<TransportOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTableConfig {
    options: Vec<TransportOption>,
}

#[derive(Debug, Clone)]
pub enum TransportConfigError {
    Empty,
    DuplicateKey(String),
    InvalidTravelMinutes { key: String, minutes: i64 },
}

impl fmt::Display for TransportConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportConfigError::Empty => {
                write!(f, "transport table requires at least one option")
            }
            TransportConfigError::DuplicateKey(key) => {
                write!(f, "duplicate transport key '{key}'")
            }
            TransportConfigError::InvalidTravelMinutes { key, minutes } => write!(
                f,
                "transport '{key}' has non-positive base_travel_minutes {minutes}"
            ),
        }
    }
}

impl std::error::Error for TransportConfigError {}

impl Default for TransportTable {
    fn default() -> Self {
        Self {
            options: vec![
                TransportOption::new(CAR_KEY, "Car", 25),
                TransportOption::new("public", "Public transit", 45),
                TransportOption::new("walk", "Walk", 60),
                TransportOption::new("taxi", "Taxi", 20),
            ],
        }
    }
}

impl TransportTable {
    pub fn from_config(config: &TransportTableConfig) -> Result<Self, TransportConfigError> {
        if config.options.is_empty() {
            return Err(TransportConfigError::Empty);
        }
        let mut seen_keys = HashSet::with_capacity(config.options.len());
        for option in &config.options {
            if !seen_keys.insert(option.key.as_str()) {
                return Err(TransportConfigError::DuplicateKey(option.key.clone()));
            }
            if option.base_travel_minutes <= 0 {
                return Err(TransportConfigError::InvalidTravelMinutes {
                    key: option.key.clone(),
                    minutes: option.base_travel_minutes,
                });
            }
        }
        Ok(Self {
            options: config.options.clone(),
        })
    }

    pub fn to_config(&self) -> TransportTableConfig {
        TransportTableConfig {
            options: self.options.clone(),
        }
    }

    pub fn options(&self) -> &[TransportOption] {
        &self.options
    }

    pub fn get(&self, key: &str) -> Option<&TransportOption> {
        self.options.iter().find(|option| option.key == key)
    }

    /// Lookup by display label. History entries store the label rather than
    /// the key, so re-selection goes through here.
    pub fn find_by_label(&self, label: &str) -> Option<&TransportOption> {
        self.options.iter().find(|option| option.label == label)
    }

    /// Estimated travel minutes for a mode. The traffic adjustment
    /// multiplies the car mode by 1.3, rounded half-up; every other mode
    /// ignores the flag.
    pub fn travel_minutes(&self, key: &str, consider_traffic: bool) -> Option<i64> {
        let option = self.get(key)?;
        let minutes = if consider_traffic && option.key == CAR_KEY {
            (option.base_travel_minutes as f64 * TRAFFIC_MULTIPLIER).round() as i64
        } else {
            option.base_travel_minutes
        };
        Some(minutes)
    }
}

impl TransportTableConfig {
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = TransportOption>,
    {
        Self {
            options: options.into_iter().collect(),
        }
    }

    pub fn options(&self) -> &[TransportOption] {
        &self.options
    }
}

impl Default for TransportTableConfig {
    fn default() -> Self {
        TransportTable::default().to_config()
    }
}
