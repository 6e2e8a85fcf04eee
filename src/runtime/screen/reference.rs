use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::runtime::{error::Result, screen::Screen};

/// Outcome of checking a screen against its stored reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch { expected: String, actual: String },
    /// No reference has been recorded under this name.
    Missing { actual: String },
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// Named reference digests, stored as a JSON object of name to hex digest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceImages {
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(flatten)]
    digests: BTreeMap<String, String>,
}

impl ReferenceImages {
    /// Loads the reference file; a missing file is an empty set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut images = if path.exists() {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<ReferenceImages>(&text)?
        } else {
            debug!("no reference images at {}", path.display());
            ReferenceImages::default()
        };
        images.path = Some(path.to_path_buf());
        Ok(images)
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            warn!("reference images have no file to save to");
            return Ok(());
        };
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.digests.get(name).map(String::as_str)
    }

    /// Stores the digest of `screen` as the reference for `name`.
    pub fn record(&mut self, name: &str, screen: &Screen) {
        self.digests.insert(name.to_string(), screen.digest());
    }

    pub fn check(&self, name: &str, screen: &Screen) -> Comparison {
        let actual = screen.digest();
        match self.digests.get(name) {
            Some(expected) if *expected == actual => Comparison::Match,
            Some(expected) => Comparison::Mismatch {
                expected: expected.clone(),
                actual,
            },
            None => Comparison::Missing { actual },
        }
    }
}
