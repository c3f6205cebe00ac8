use approx::assert_relative_eq;
use motility_rs::api::{SimulatorConfig, SimulatorEngine};
use motility_rs::assets::{AssetStore, manifest};
use motility_rs::core::{EyeSide, Point, Viewport};
use motility_rs::interaction::{PrismState, PrismTuning, ToolKind};
use motility_rs::render::NullRenderer;
use proptest::prelude::*;

fn prism_engine(width: u32, height: u32) -> SimulatorEngine<NullRenderer> {
    let config = SimulatorConfig::new(Viewport::new(width, height));
    let mut engine = SimulatorEngine::new(NullRenderer::default(), config).expect("engine init");
    engine
        .apply_assets(
            AssetStore::new()
                .with_sprite(manifest::FACE, 900, 600)
                .with_sprite(manifest::EYE, 120, 120)
                .with_sprite(manifest::OCCLUDER, 200, 200)
                .with_sprite(manifest::TARGET, 130, 570),
        )
        .expect("assets apply");
    engine.set_active_tool(Some(ToolKind::Prism));
    engine
}

#[test]
fn dragging_to_the_right_edge_reaches_full_strength_at_axis_zero() {
    let mut engine = prism_engine(900, 600);
    assert!(engine.pointer_down(450.0, 300.0).expect("pointer"));
    engine.pointer_move(900.0, 300.0).expect("pointer");

    let prism = engine.prism();
    assert_eq!(prism.value, 20);
    assert_eq!(prism.axis, 0);
    let gaze = engine.eye_displacement(EyeSide::Left);
    assert_relative_eq!(gaze.x, 0.5);
    assert_relative_eq!(gaze.y, 0.0, epsilon = 1e-12);
}

#[test]
fn prism_override_persists_after_release_and_clears_on_deactivation() {
    let mut engine = prism_engine(900, 600);
    assert!(engine.pointer_down(450.0, 300.0).expect("pointer"));
    engine.pointer_move(450.0, 75.0).expect("pointer");
    assert_eq!(engine.pointer_up(), Some(ToolKind::Prism));

    let prism = engine.prism();
    assert_eq!(prism.value, 10);
    assert_eq!(prism.axis, 270);
    assert!(engine.has_gaze_override());

    engine.toggle_tool(ToolKind::Prism);
    assert!(!engine.has_gaze_override());
    assert_eq!(engine.prism(), prism);
}

#[test]
fn external_prism_sync_snaps_and_validates() {
    let mut engine = prism_engine(900, 600);
    engine.set_prism(8, 97.0).expect("valid prism");
    assert_eq!(engine.prism(), PrismState { value: 8, axis: 90 });

    engine.set_prism(8, 358.0).expect("valid prism");
    assert_eq!(engine.prism().axis, 0);

    assert!(engine.set_prism(21, 0.0).is_err());
    assert!(engine.set_prism(5, f64::NAN).is_err());
    assert_eq!(engine.prism().axis, 0);
}

#[test]
fn huge_axis_inputs_are_reduced_before_snapping() {
    let mut engine = prism_engine(900, 600);
    engine.set_prism(10, 1e17).expect("finite axis");
    assert_eq!(engine.prism(), PrismState { value: 10, axis: 285 });

    engine.set_prism(10, -1e17).expect("finite axis");
    assert_eq!(engine.prism().axis, 75);
}

#[test]
fn reactivating_the_prism_restores_its_gaze_effect() {
    let mut engine = prism_engine(900, 600);
    engine.set_active_tool(None);
    engine.set_prism(20, 180.0).expect("valid prism");
    assert!(!engine.has_gaze_override());

    engine.set_active_tool(Some(ToolKind::Prism));
    let gaze = engine.eye_displacement(EyeSide::Right);
    assert_relative_eq!(gaze.x, -0.5);
}

#[test]
fn pointer_offset_mapping_clamps_distance() {
    let tuning = PrismTuning::default();
    let state = PrismState::from_pointer_offset(Point::new(0.0, 10_000.0), 450.0, tuning);
    assert_eq!(state.value, 20);
    assert_eq!(state.axis, 90);
}

proptest! {
    #[test]
    fn prism_value_and_axis_stay_on_their_grids(
        width in 300u32..2_000,
        height in 300u32..2_000,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0
    ) {
        let mut engine = prism_engine(width, height);
        let surface = engine.surface();
        let center_x = f64::from(surface.width) / 2.0;
        let center_y = f64::from(surface.height) / 2.0;
        prop_assume!(engine.pointer_down(center_x, center_y).expect("pointer"));

        engine
            .pointer_move(fx * f64::from(surface.width), fy * f64::from(surface.height))
            .expect("pointer");
        let prism = engine.prism();
        prop_assert!(prism.value <= 20);
        prop_assert_eq!(prism.axis % 15, 0);
        prop_assert!(prism.axis <= 345);
    }

    #[test]
    fn any_finite_axis_snaps_onto_the_grid(axis in any::<f64>()) {
        prop_assume!(axis.is_finite());
        let state = PrismState::new(5, axis, PrismTuning::default()).expect("finite axis");
        prop_assert_eq!(state.axis % 15, 0);
        prop_assert!(state.axis < 360);
    }
}
