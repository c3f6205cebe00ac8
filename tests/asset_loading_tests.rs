use std::collections::HashSet;

use futures::executor::block_on;
use motility_rs::SimError;
use motility_rs::api::{SimulatorConfig, SimulatorEngine, UnavailableReason, ViewStatus};
use motility_rs::assets::{
    AssetEntry, AssetManifest, FallbackShape, ImageInfo, ImageSource, LoadProgress, SpriteSlot,
    cancellable_load_all, load_all, manifest,
};
use motility_rs::core::Viewport;
use motility_rs::interaction::ToolKind;
use motility_rs::render::{DrawCommand, NullRenderer, SurfaceKind};

/// Serves every image at 900x600 except the names listed as broken.
struct StubSource {
    broken: HashSet<&'static str>,
}

impl StubSource {
    fn healthy() -> Self {
        Self {
            broken: HashSet::new(),
        }
    }

    fn failing(names: &[&'static str]) -> Self {
        Self {
            broken: names.iter().copied().collect(),
        }
    }
}

impl ImageSource for StubSource {
    async fn load(&self, entry: &AssetEntry) -> Result<ImageInfo, SimError> {
        if self.broken.contains(entry.name.as_str()) {
            return Err(SimError::AssetLoad {
                name: entry.name.clone(),
                reason: "404".to_owned(),
            });
        }
        Ok(ImageInfo::new(entry.name.clone(), 900, 600))
    }
}

fn engine() -> SimulatorEngine<NullRenderer> {
    let config = SimulatorConfig::new(Viewport::new(900, 600));
    SimulatorEngine::new(NullRenderer::default(), config).expect("engine init")
}

#[test]
fn progress_is_reported_after_every_settled_entry() {
    let manifest = AssetManifest::standard();
    let mut reports = Vec::new();
    let store = block_on(load_all(
        &StubSource::failing(&["kidEye"]),
        &manifest,
        |progress| reports.push(progress),
    ))
    .expect("only an optional asset failed");

    assert_eq!(reports.len(), manifest.len());
    assert!(reports.windows(2).all(|pair| pair[0].loaded < pair[1].loaded));
    let last = reports.last().copied().expect("at least one report");
    assert_eq!(last, LoadProgress { loaded: 12, total: 12 });
    assert_eq!(last.percent(), 100.0);
    assert_eq!(store.len(), 12);
    assert_eq!(store.resolve("kidEye"), SpriteSlot::Fallback(FallbackShape::Omit));
}

#[test]
fn failing_face_makes_the_view_unavailable() {
    let mut engine = engine();
    let err = block_on(engine.load_assets(
        &StubSource::failing(&[manifest::FACE]),
        &AssetManifest::standard(),
    ))
    .expect_err("face is critical");

    assert!(matches!(err, SimError::AssetUnavailable { ref name } if name == "face"));
    assert_eq!(
        engine.status(),
        &ViewStatus::Unavailable(UnavailableReason::CriticalAsset {
            name: "face".to_owned()
        })
    );
    assert_eq!(
        engine.status().unavailable_copy(),
        Some(("2.5D View Unavailable", motility_rs::api::UNAVAILABLE_HINT))
    );
    assert_eq!(engine.tick(), motility_rs::api::TickOutcome::Halted);
}

#[test]
fn failing_prism_still_reaches_ready_with_a_triangle() {
    let mut engine = engine();
    block_on(engine.load_assets(
        &StubSource::failing(&[manifest::PRISM]),
        &AssetManifest::standard(),
    ))
    .expect("prism is optional");
    assert!(engine.status().is_ready());

    engine.set_active_tool(Some(ToolKind::Prism));
    let frame = engine.compose_frame().expect("compose");
    let tools: Vec<&DrawCommand> = frame.commands(SurfaceKind::Tools).collect();
    assert!(tools.iter().any(|command| matches!(command, DrawCommand::Polygon(_))));
    assert!(!tools.iter().any(
        |command| matches!(command, DrawCommand::Image(image) if image.sprite == manifest::PRISM)
    ));
}

#[test]
fn healthy_load_brings_geometry_online() {
    let mut engine = engine();
    assert!(engine.geometry().is_none());
    block_on(engine.load_assets(&StubSource::healthy(), &AssetManifest::standard()))
        .expect("all assets load");

    assert!(engine.status().is_ready());
    let geometry = engine.geometry().expect("geometry");
    assert_eq!(geometry.scale_x, 1.0);
    assert_eq!(engine.assets().map(|assets| assets.len()), Some(12));
}

#[test]
fn aborted_load_is_discarded_on_unmount() {
    let mut engine = engine();
    let manifest = AssetManifest::standard();
    let source = StubSource::healthy();
    let (load, handle) = cancellable_load_all(&source, &manifest, |_| {});
    engine.track_asset_load(handle);

    engine.unmount();
    let result = block_on(load);
    assert!(matches!(result, Err(SimError::LoadCancelled)));
    if let Err(err) = &result {
        engine.fail_assets(err);
    }
    assert_eq!(engine.status(), &ViewStatus::Unmounted);

    let late = motility_rs::assets::AssetStore::new().with_sprite(manifest::FACE, 900, 600);
    engine.apply_assets(late).expect("late assets are ignored");
    assert_eq!(engine.status(), &ViewStatus::Unmounted);
    assert!(engine.geometry().is_none());
}

#[test]
fn assets_without_a_face_are_rejected() {
    let mut engine = engine();
    let err = engine
        .apply_assets(motility_rs::assets::AssetStore::new())
        .expect_err("face missing");
    assert!(matches!(err, SimError::AssetUnavailable { .. }));
    assert!(engine.status().is_terminal());
}

#[test]
fn host_store_must_carry_every_critical_sprite() {
    let mut engine = engine();
    let store = motility_rs::assets::AssetStore::new()
        .with_sprite(manifest::FACE, 900, 600)
        .with_sprite(manifest::EYE, 120, 120)
        .with_sprite(manifest::TARGET, 130, 570);
    let err = engine.apply_assets(store).expect_err("occluder missing");

    assert!(matches!(&err, SimError::AssetUnavailable { name } if name == manifest::OCCLUDER));
    assert_eq!(
        engine.status(),
        &ViewStatus::Unavailable(UnavailableReason::CriticalAsset {
            name: manifest::OCCLUDER.to_owned(),
        })
    );
    assert!(engine.geometry().is_none());
}

#[test]
fn zero_sized_critical_image_is_fatal() {
    struct EmptyFace;

    impl ImageSource for EmptyFace {
        async fn load(&self, entry: &AssetEntry) -> Result<ImageInfo, SimError> {
            let size = if entry.name == manifest::FACE { 0 } else { 10 };
            Ok(ImageInfo::new(entry.name.clone(), size, size))
        }
    }

    let result = block_on(load_all(&EmptyFace, &AssetManifest::standard(), |_| {}));
    assert!(matches!(result, Err(SimError::AssetUnavailable { ref name }) if name == "face"));
}
