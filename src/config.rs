//! Encoding configuration.
//!
//! Process-wide defaults come from the environment and are read once:
//! - `WIFIQR_EC_LEVEL`: default error correction level (`L`, `M`, `Q`, `H`; default `M`)
//! - `WIFIQR_QUIET_ZONE`: quiet zone width in modules (default 4, clamped to 0-16)
//! - `WIFIQR_PARALLEL_MASKS`: score mask candidates on the rayon pool (`0`/`1`, default `1`)
//!
//! [`EncodeOptions`] starts from those defaults and overrides them per call.

use std::sync::OnceLock;

use crate::models::{ECLevel, MaskPattern, Version};

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static DEFAULT_EC_LEVEL: OnceLock<ECLevel> = OnceLock::new();

pub(crate) fn default_ec_level() -> ECLevel {
    *DEFAULT_EC_LEVEL.get_or_init(|| {
        std::env::var("WIFIQR_EC_LEVEL")
            .ok()
            .and_then(|v| v.parse::<ECLevel>().ok())
            .unwrap_or_default()
    })
}

static DEFAULT_QUIET_ZONE: OnceLock<usize> = OnceLock::new();

pub(crate) fn default_quiet_zone() -> usize {
    *DEFAULT_QUIET_ZONE.get_or_init(|| parse_env_usize("WIFIQR_QUIET_ZONE", 4).min(16))
}

static PARALLEL_MASKS: OnceLock<bool> = OnceLock::new();

pub(crate) fn parallel_masks() -> bool {
    *PARALLEL_MASKS.get_or_init(|| parse_env_bool_u8("WIFIQR_PARALLEL_MASKS", true))
}

/// Per-call encoding options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested error correction level
    pub ec_level: ECLevel,
    /// Smallest version to consider
    pub min_version: Version,
    /// Largest version to consider
    pub max_version: Version,
    /// Force a mask instead of picking the lowest-penalty one
    pub mask: Option<MaskPattern>,
    /// Raise the EC level as far as the chosen version allows
    pub boost_ec: bool,
    /// Light border width in modules
    pub quiet_zone: usize,
    /// Score mask candidates in parallel
    pub parallel_masks: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: default_ec_level(),
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ec: false,
            quiet_zone: default_quiet_zone(),
            parallel_masks: parallel_masks(),
        }
    }
}

impl EncodeOptions {
    /// Defaults from the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error correction level
    pub fn ec_level(mut self, ec_level: ECLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    /// Restrict the version search to `min..=max` (swapped if given backwards)
    pub fn version_range(mut self, min: Version, max: Version) -> Self {
        self.min_version = min.min(max);
        self.max_version = min.max(max);
        self
    }

    /// Force a specific mask pattern
    pub fn mask(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Enable or disable EC boosting
    pub fn boost_ec(mut self, boost: bool) -> Self {
        self.boost_ec = boost;
        self
    }

    /// Set the quiet zone width
    pub fn quiet_zone(mut self, modules: usize) -> Self {
        self.quiet_zone = modules;
        self
    }

    /// Enable or disable parallel mask scoring
    pub fn parallel_masks(mut self, parallel: bool) -> Self {
        self.parallel_masks = parallel;
        self
    }
}
