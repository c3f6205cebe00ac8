use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

pub const FACE: &str = "face";
pub const EYE: &str = "eye";
pub const OCCLUDER: &str = "occluder";
pub const TARGET: &str = "target";
pub const PRISM: &str = "prism";
pub const LIGHT_REFLEX: &str = "lightReflex";

/// Whether a failed load takes the whole view down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCriticality {
    Critical,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub path: String,
    pub criticality: AssetCriticality,
}

impl AssetEntry {
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.criticality == AssetCriticality::Critical
    }
}

/// Static name -> path list supplied by the host. Iteration follows
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    entries: IndexMap<String, AssetEntry>,
}

impl AssetManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The image set of the 2.5D view.
    #[must_use]
    pub fn standard() -> Self {
        const BASE: &str = "/images/2.5D-new";
        let mut manifest = Self::new();
        for (name, file, criticality) in [
            (FACE, "n_face_sm.png", AssetCriticality::Critical),
            (EYE, "n_eye.png", AssetCriticality::Critical),
            ("plainEye", "n_eye_plain.png", AssetCriticality::Optional),
            (OCCLUDER, "n_cover.png", AssetCriticality::Critical),
            (TARGET, "target_stick.png", AssetCriticality::Critical),
            (PRISM, "prism.png", AssetCriticality::Optional),
            (LIGHT_REFLEX, "lightReflex.png", AssetCriticality::Optional),
            ("kidEye", "n_eye_kid.png", AssetCriticality::Optional),
            ("girlEye", "n_eye_girl.png", AssetCriticality::Optional),
            ("faceGirl", "n_face_sm_girl.png", AssetCriticality::Optional),
            ("faceKid", "n_face_sm_kid.png", AssetCriticality::Optional),
            ("facePlain", "n_face_sm_plain.png", AssetCriticality::Optional),
        ] {
            manifest.entries.insert(
                name.to_owned(),
                AssetEntry {
                    name: name.to_owned(),
                    path: format!("{BASE}/{file}"),
                    criticality,
                },
            );
        }
        manifest
    }

    /// Adds an entry. Names must be unique.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        criticality: AssetCriticality,
    ) -> SimResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimError::InvalidData(
                "asset name must not be empty".to_owned(),
            ));
        }
        if self.entries.contains_key(&name) {
            return Err(SimError::InvalidData(format!(
                "duplicate asset name `{name}`"
            )));
        }
        self.entries.insert(
            name.clone(),
            AssetEntry {
                name,
                path: path.into(),
                criticality,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn with_entry(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        criticality: AssetCriticality,
    ) -> Self {
        let name = name.into();
        self.entries.insert(
            name.clone(),
            AssetEntry {
                name,
                path: path.into(),
                criticality,
            },
        );
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AssetEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.values()
    }

    pub fn critical_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|entry| entry.is_critical())
            .map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_manifest_marks_four_critical_images() {
        let manifest = AssetManifest::standard();
        assert_eq!(manifest.len(), 12);
        let critical: Vec<&str> = manifest.critical_names().collect();
        assert_eq!(critical, vec![FACE, EYE, OCCLUDER, TARGET]);
        assert_eq!(
            manifest.get(PRISM).map(|entry| entry.path.as_str()),
            Some("/images/2.5D-new/prism.png")
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut manifest = AssetManifest::new();
        manifest
            .insert("face", "a.png", AssetCriticality::Critical)
            .expect("first insert");
        assert!(manifest.insert("face", "b.png", AssetCriticality::Optional).is_err());
    }
}
