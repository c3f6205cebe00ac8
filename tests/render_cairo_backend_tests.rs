#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use motility_rs::SimError;
use motility_rs::api::{SimulatorConfig, SimulatorEngine, TickOutcome};
use motility_rs::assets::{AssetStore, manifest};
use motility_rs::core::{EyeSide, Viewport};
use motility_rs::render::{CairoRenderer, SurfaceKind};

fn engine_with(renderer: CairoRenderer) -> SimulatorEngine<CairoRenderer> {
    let config = SimulatorConfig::new(Viewport::new(900, 600));
    let mut engine = SimulatorEngine::new(renderer, config).expect("engine init");
    engine
        .apply_assets(
            AssetStore::new()
                .with_sprite(manifest::FACE, 900, 600)
                .with_sprite(manifest::EYE, 120, 120)
                .with_sprite(manifest::OCCLUDER, 200, 200)
                .with_sprite(manifest::TARGET, 130, 570),
        )
        .expect("assets apply");
    engine
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, SimError::InvalidData(_)));
}

#[test]
fn cairo_renderer_rasterises_each_surface() {
    let mut renderer = CairoRenderer::new(900, 600).expect("renderer");
    let face = ImageSurface::create(Format::ARgb32, 90, 60).expect("sprite surface");
    renderer.register_sprite(manifest::FACE, face);
    let mut engine = engine_with(renderer);

    assert_eq!(engine.tick(), TickOutcome::Drawn);
    let stats = engine.renderer().last_stats();
    assert_eq!(stats.images_drawn, 1);
    assert_eq!(stats.images_missing, 0);
    assert_eq!(stats.texts_drawn, 4);
    // Two eyes of iris, pupil and reflex dot, plus the readout panel.
    assert_eq!(stats.shapes_drawn, 7);

    let renderer = engine.into_renderer();
    assert_eq!(renderer.surface(SurfaceKind::Overlay).width(), 900);
    let composite = renderer.composite().expect("composite");
    assert_eq!(composite.height(), 600);
}

#[test]
fn missing_sprite_pixels_are_counted_not_fatal() {
    let mut engine = engine_with(CairoRenderer::new(900, 600).expect("renderer"));
    engine.set_occluder_position(Some(EyeSide::Right));

    assert_eq!(engine.tick(), TickOutcome::Drawn);
    let stats = engine.renderer().last_stats();
    // Neither the face nor the occluder has registered pixels.
    assert_eq!(stats.images_missing, 2);
    assert_eq!(stats.shapes_drawn, 4);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let mut engine = engine_with(CairoRenderer::new(900, 600).expect("renderer"));
    let surface = ImageSurface::create(Format::ARgb32, 900, 600).expect("surface");
    let context = Context::new(&surface).expect("context");

    engine
        .render_on_cairo_context(&context)
        .expect("render on context");
    assert_eq!(engine.frames_drawn(), 1);
    assert_eq!(engine.renderer().last_stats().texts_drawn, 4);
}
