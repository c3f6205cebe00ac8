//! Raster assets of the view: manifest, concurrent loading and the
//! sprite-or-fallback store the compositor draws from.

pub mod loader;
pub mod manifest;

pub use loader::{
    AssetStore, FallbackShape, ImageInfo, ImageSource, LoadProgress, SpriteSlot,
    cancellable_load_all, load_all,
};
pub use manifest::{AssetCriticality, AssetEntry, AssetManifest};
