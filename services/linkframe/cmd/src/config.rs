//! Configuration handling for the linkframe tool.
//!
//! Settings come from the `link:` section of a YAML file, then environment
//! variables, then command-line flags.

use anyhow::{bail, Context, Result};
use link_crc::{CrcParams, CrcProfile, CrcStandard};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Default payload capacity for encoding and decoding
pub const DEFAULT_MAX_FRAME_LEN: usize = 4096;

/// Largest payload capacity a configuration may ask for
pub const MAX_FRAME_LEN_LIMIT: usize = 16 * 1024 * 1024;

/// Profile name that disables checksums
pub const NO_CRC: &str = "none";

/// linkframe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Default CRC profile name; `None` frames payloads without a checksum
    pub crc: Option<String>,
    /// Largest payload, checksum excluded, accepted by encode and decode
    pub max_frame_len: usize,
    /// Named custom CRC profiles
    pub profiles: BTreeMap<String, CrcParams>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            crc: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            profiles: BTreeMap::new(),
        }
    }
}

/// Root of the YAML file
#[derive(Debug, Deserialize)]
struct RootConfig {
    link: Option<LinkSection>,
}

#[derive(Debug, Deserialize)]
struct LinkSection {
    crc: Option<String>,
    max_frame_len: Option<usize>,
    #[serde(default)]
    profiles: BTreeMap<String, CrcParams>,
}

impl LinkConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        let mut config = Self::default();

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root) => {
                    config.apply_root_config(root);
                    info!("Loaded configuration from {:?}", path);
                }
                Err(e) => warn!("Failed to parse config file {:?} ({}), using defaults", path, e),
            },
            Err(_) => warn!("Config file {:?} not found, using defaults", path),
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(
            "Final link configuration: crc={}, max_frame_len={}, custom profiles={}",
            config.crc.as_deref().unwrap_or(NO_CRC),
            config.max_frame_len,
            config.profiles.len()
        );

        Ok(config)
    }

    fn apply_root_config(&mut self, root: RootConfig) {
        let Some(link) = root.link else {
            return;
        };

        if link.crc.is_some() {
            self.crc = link.crc;
        }
        if let Some(max_frame_len) = link.max_frame_len {
            self.max_frame_len = max_frame_len;
        }
        self.profiles.extend(link.profiles);
    }

    /// Apply `LINKFRAME_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(crc) = lookup("LINKFRAME_CRC") {
            info!("CRC profile overridden by environment: {}", crc);
            self.crc = Some(crc);
        }

        if let Some(value) = lookup("LINKFRAME_MAX_FRAME_LEN") {
            match value.parse::<usize>() {
                Ok(len) => {
                    self.max_frame_len = len;
                    info!("Max frame length overridden by environment: {}", len);
                }
                Err(_) => warn!("Ignoring invalid LINKFRAME_MAX_FRAME_LEN {:?}", value),
            }
        }
    }

    /// Check the frame limit and that every custom profile builds.
    ///
    /// Run again after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_len > MAX_FRAME_LEN_LIMIT {
            bail!(
                "max_frame_len {} exceeds the limit of {} bytes",
                self.max_frame_len,
                MAX_FRAME_LEN_LIMIT
            );
        }

        for (name, params) in &self.profiles {
            CrcProfile::build(params).with_context(|| format!("invalid CRC profile {:?}", name))?;
        }
        Ok(())
    }

    /// Resolve a profile name, falling back to the configured default.
    ///
    /// Custom profiles shadow registry names. `"none"` selects no checksum.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<Option<Cow<'static, CrcProfile>>> {
        let Some(name) = name.or(self.crc.as_deref()) else {
            return Ok(None);
        };

        if name.eq_ignore_ascii_case(NO_CRC) {
            return Ok(None);
        }

        if let Some(params) = self.profiles.get(name) {
            let profile = CrcProfile::build(params)
                .with_context(|| format!("invalid CRC profile {:?}", name))?;
            return Ok(Some(Cow::Owned(profile)));
        }

        let standard: CrcStandard = name
            .parse()
            .with_context(|| format!("no CRC profile named {:?}", name))?;
        Ok(Some(Cow::Borrowed(standard.profile())))
    }
}
