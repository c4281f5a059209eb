// ABOUTME: Image lifecycle policy for batch runs.
// ABOUTME: Supports keep, before, after and both (relative to the suite).

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// When the suite removes the images it built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePolicy {
    /// Never remove managed images.
    Keep,
    /// Remove leftovers from earlier runs before the suite starts.
    #[default]
    Before,
    /// Remove this run's images once the report is written.
    After,
    /// Remove both before and after.
    Both,
}

impl ImagePolicy {
    pub fn cleans_before(&self) -> bool {
        matches!(self, ImagePolicy::Before | ImagePolicy::Both)
    }

    pub fn cleans_after(&self) -> bool {
        matches!(self, ImagePolicy::After | ImagePolicy::Both)
    }
}

impl FromStr for ImagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(ImagePolicy::Keep),
            "before" => Ok(ImagePolicy::Before),
            "after" => Ok(ImagePolicy::After),
            "both" => Ok(ImagePolicy::Both),
            _ => Err(format!(
                "unknown image policy: {} (expected keep, before, after or both)",
                s
            )),
        }
    }
}

impl fmt::Display for ImagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagePolicy::Keep => write!(f, "keep"),
            ImagePolicy::Before => write!(f, "before"),
            ImagePolicy::After => write!(f, "after"),
            ImagePolicy::Both => write!(f, "both"),
        }
    }
}

impl<'de> Deserialize<'de> for ImagePolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for policy in [
            ImagePolicy::Keep,
            ImagePolicy::Before,
            ImagePolicy::After,
            ImagePolicy::Both,
        ] {
            assert_eq!(policy.to_string().parse::<ImagePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn cleanup_points() {
        assert!(ImagePolicy::Before.cleans_before());
        assert!(!ImagePolicy::Before.cleans_after());
        assert!(ImagePolicy::Both.cleans_after());
        assert!(!ImagePolicy::Keep.cleans_before());
    }
}
