use std::future::Future;

use futures::future::{AbortHandle, abortable};
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{SimError, SimResult};

use super::manifest::{self, AssetEntry, AssetManifest};

/// Decoded image metadata handed back by an [`ImageSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Width over height, `None` for degenerate images.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.width > 0 && self.height > 0)
            .then(|| f64::from(self.width) / f64::from(self.height))
    }
}

/// Fetches and decodes one manifest entry. Loads run concurrently; a source
/// must not assume any completion order.
pub trait ImageSource {
    fn load(&self, entry: &AssetEntry) -> impl Future<Output = SimResult<ImageInfo>>;
}

/// Procedural stand-in for an optional sprite that failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackShape {
    /// Translucent triangle for the prism glyph.
    Triangle,
    /// Small white dot for the corneal light reflex.
    ReflexDot,
    /// Nothing is drawn.
    Omit,
}

impl FallbackShape {
    #[must_use]
    pub fn for_asset(name: &str) -> Self {
        match name {
            manifest::PRISM => FallbackShape::Triangle,
            manifest::LIGHT_REFLEX => FallbackShape::ReflexDot,
            _ => FallbackShape::Omit,
        }
    }
}

/// Resolved once at load time so draw calls never re-check availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteSlot {
    Sprite(ImageInfo),
    Fallback(FallbackShape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    #[must_use]
    pub fn percent(self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.loaded as f64 / self.total as f64 * 100.0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.loaded >= self.total
    }
}

/// Settled assets of one view session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetStore {
    slots: IndexMap<String, SpriteSlot>,
}

impl AssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sprite(&mut self, info: ImageInfo) {
        self.slots.insert(info.name.clone(), SpriteSlot::Sprite(info));
    }

    pub fn insert_fallback(&mut self, name: impl Into<String>) {
        let name = name.into();
        let shape = FallbackShape::for_asset(&name);
        self.slots.insert(name, SpriteSlot::Fallback(shape));
    }

    #[must_use]
    pub fn with_sprite(mut self, name: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert_sprite(ImageInfo::new(name, width, height));
        self
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SpriteSlot> {
        self.slots.get(name)
    }

    #[must_use]
    pub fn sprite(&self, name: &str) -> Option<&ImageInfo> {
        match self.slots.get(name) {
            Some(SpriteSlot::Sprite(info)) => Some(info),
            _ => None,
        }
    }

    /// Slot used when drawing `name`: the sprite if present, else its fallback.
    #[must_use]
    pub fn resolve(&self, name: &str) -> SpriteSlot {
        self.slots
            .get(name)
            .cloned()
            .unwrap_or(SpriteSlot::Fallback(FallbackShape::for_asset(name)))
    }

    /// First critical entry of `manifest` without a usable sprite.
    #[must_use]
    pub fn missing_critical<'m>(&self, manifest: &'m AssetManifest) -> Option<&'m str> {
        manifest
            .critical_names()
            .find(|name| self.sprite(name).and_then(ImageInfo::aspect_ratio).is_none())
    }

    #[must_use]
    pub fn face_aspect_ratio(&self) -> Option<f64> {
        self.sprite(manifest::FACE).and_then(ImageInfo::aspect_ratio)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Loads every manifest entry concurrently.
///
/// `on_progress` fires after each settled entry, including tolerated
/// failures. The first critical failure ends loading with
/// [`SimError::AssetUnavailable`]; loads still outstanding are dropped.
pub async fn load_all<S: ImageSource>(
    source: &S,
    manifest: &AssetManifest,
    mut on_progress: impl FnMut(LoadProgress),
) -> SimResult<AssetStore> {
    let total = manifest.len();
    let mut pending: FuturesUnordered<_> = manifest
        .iter()
        .map(|entry| async move { (entry, source.load(entry).await) })
        .collect();

    let mut store = AssetStore::new();
    let mut loaded = 0;
    while let Some((entry, result)) = pending.next().await {
        let outcome = result.and_then(|info| match info.aspect_ratio() {
            Some(_) => Ok(info),
            None => Err(SimError::AssetLoad {
                name: entry.name.clone(),
                reason: "image has zero size".to_owned(),
            }),
        });
        match outcome {
            Ok(info) => {
                debug!(asset = %entry.name, width = info.width, height = info.height, "asset loaded");
                store.insert_sprite(ImageInfo {
                    name: entry.name.clone(),
                    ..info
                });
            }
            Err(err) if entry.is_critical() => {
                error!(asset = %entry.name, error = %err, "critical asset failed to load");
                return Err(SimError::AssetUnavailable {
                    name: entry.name.clone(),
                });
            }
            Err(err) => {
                warn!(asset = %entry.name, error = %err, "optional asset unavailable, using fallback");
                store.insert_fallback(entry.name.clone());
            }
        }
        loaded += 1;
        on_progress(LoadProgress { loaded, total });
    }

    Ok(store)
}

/// [`load_all`] paired with a handle that discards the result when aborted.
pub fn cancellable_load_all<'a, S: ImageSource>(
    source: &'a S,
    manifest: &'a AssetManifest,
    on_progress: impl FnMut(LoadProgress) + 'a,
) -> (impl Future<Output = SimResult<AssetStore>> + 'a, AbortHandle) {
    let (future, handle) = abortable(load_all(source, manifest, on_progress));
    let guarded = async move {
        match future.await {
            Ok(result) => result,
            Err(_aborted) => {
                debug!("asset loading aborted");
                Err(SimError::LoadCancelled)
            }
        }
    };
    (guarded, handle)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::assets::{AssetCriticality, manifest};

    struct FixedSource;

    impl ImageSource for FixedSource {
        async fn load(&self, entry: &AssetEntry) -> SimResult<ImageInfo> {
            if entry.path.is_empty() {
                return Err(SimError::AssetLoad {
                    name: entry.name.clone(),
                    reason: "missing path".to_owned(),
                });
            }
            Ok(ImageInfo::new(entry.name.clone(), 900, 600))
        }
    }

    #[test]
    fn optional_failure_becomes_fallback() {
        let manifest = AssetManifest::new()
            .with_entry("face", "face.png", AssetCriticality::Critical)
            .with_entry("prism", "", AssetCriticality::Optional);
        let store = block_on(load_all(&FixedSource, &manifest, |_| {})).expect("loads");
        assert_eq!(store.resolve("prism"), SpriteSlot::Fallback(FallbackShape::Triangle));
        assert_eq!(store.face_aspect_ratio(), Some(1.5));
    }

    #[test]
    fn missing_critical_reports_first_absent_or_empty_sprite() {
        let standard = AssetManifest::standard();
        let store = AssetStore::new()
            .with_sprite(manifest::FACE, 900, 600)
            .with_sprite(manifest::EYE, 0, 0);
        assert_eq!(store.missing_critical(&standard), Some(manifest::EYE));

        let store = store
            .with_sprite(manifest::EYE, 120, 120)
            .with_sprite(manifest::OCCLUDER, 200, 200)
            .with_sprite(manifest::TARGET, 130, 570);
        assert_eq!(store.missing_critical(&standard), None);
    }

    #[test]
    fn progress_reaches_one_hundred_percent() {
        let manifest = AssetManifest::new()
            .with_entry("face", "face.png", AssetCriticality::Critical)
            .with_entry("lightReflex", "", AssetCriticality::Optional);
        let mut reports = Vec::new();
        block_on(load_all(&FixedSource, &manifest, |progress| reports.push(progress)))
            .expect("loads");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].percent(), 100.0);
    }

    #[test]
    fn missing_slot_resolves_to_its_fallback() {
        let store = AssetStore::new();
        assert_eq!(store.resolve("lightReflex"), SpriteSlot::Fallback(FallbackShape::ReflexDot));
        assert_eq!(store.resolve("faceKid"), SpriteSlot::Fallback(FallbackShape::Omit));
    }
}
