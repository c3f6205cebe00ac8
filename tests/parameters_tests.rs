use approx::assert_relative_eq;
use motility_rs::api::{SimulationParameters, SimulatorConfig, SimulatorEngine};
use motility_rs::core::{
    DeviationKind, DeviationParameters, Displacement, EyeSide, MovementMode, Viewport,
};
use motility_rs::render::{Color, NullRenderer};
use serde_json::json;

fn engine() -> SimulatorEngine<NullRenderer> {
    let config = SimulatorConfig::new(Viewport::new(900, 600));
    SimulatorEngine::new(NullRenderer::default(), config).expect("engine init")
}

#[test]
fn defaults_match_the_clinical_baseline() {
    let engine = engine();
    let eyes = engine.parameters().appearance.eyes;
    for eye in [eyes.left, eyes.right] {
        assert_eq!(eye.pupil_size, 4.0);
        assert_eq!(eye.eye_size, 1.0);
        assert_eq!(eye.iris_color.to_hex(), "#3c7fb1");
        assert_eq!(eye.manual_offset, Displacement::ZERO);
    }
    assert_eq!(
        engine.parameters().appearance.movement_mode,
        MovementMode::IrisAndPupil
    );
}

#[test]
fn flat_keys_update_the_engine() {
    let mut engine = engine();
    engine
        .set_parameter("esotropia", &json!(15))
        .expect("deviation key");
    engine
        .set_parameter("irisColor.right", &json!("#2e8b57"))
        .expect("color key");

    assert_eq!(engine.parameters().deviation.esotropia, 15.0);
    assert_eq!(
        engine.parameters().appearance.eyes.right.iris_color,
        Color::from_hex("#2e8b57").expect("hex")
    );
    assert!(engine.eye_displacement(EyeSide::Left).x > 0.0);
}

#[test]
fn rejected_update_leaves_parameters_untouched() {
    let mut engine = engine();
    let before = *engine.parameters();

    assert!(engine.set_parameter("esotropia", &json!(-4)).is_err());
    assert!(engine.set_parameter("squint", &json!(4)).is_err());
    assert!(engine.set_pupil_size(EyeSide::Left, 0.0).is_err());
    assert!(engine.set_eye_size(EyeSide::Right, f64::NAN).is_err());
    assert!(engine.set_deviation(DeviationKind::Hypotropia, f64::INFINITY).is_err());
    assert_eq!(*engine.parameters(), before);
}

#[test]
fn apply_parameters_replaces_the_snapshot() {
    let mut engine = engine();
    let mut parameters = SimulationParameters::default();
    parameters.deviation = DeviationParameters::default()
        .with(DeviationKind::Exotropia, 25.0)
        .with(DeviationKind::Hypertropia, 5.0);
    parameters.appearance.eyes.left.pupil_size = 6.0;

    engine.apply_parameters(parameters).expect("valid parameters");
    assert_eq!(*engine.parameters(), parameters);

    let left = engine.eye_displacement(EyeSide::Left);
    assert_relative_eq!(left.x, -5.0);
    assert_relative_eq!(left.y, -1.0);

    let mut invalid = parameters;
    invalid.appearance.eyes.right.eye_size = -1.0;
    assert!(engine.apply_parameters(invalid).is_err());
    assert_eq!(*engine.parameters(), parameters);
}

#[test]
fn parameters_deserialize_with_defaults() {
    let parameters: SimulationParameters =
        serde_json::from_value(json!({ "deviation": { "esophoria": 8.0 } })).expect("json");
    assert_eq!(parameters.deviation.esophoria, 8.0);
    assert_eq!(parameters.appearance.eyes.left.pupil_size, 4.0);
}

#[test]
fn iris_only_movement_leaves_the_pupil_in_place() {
    let mut engine = engine();
    engine.set_movement_mode(MovementMode::IrisOnly);
    engine
        .move_eye_components(EyeSide::Left, Displacement::new(0.2, 0.0))
        .expect("finite delta");

    let eye = engine.parameters().appearance.eyes.left;
    assert_relative_eq!(eye.manual_offset.x, 0.2);
    assert_relative_eq!(eye.manual_offset.x + eye.pupil_offset.x, 0.0);
}

#[test]
fn manual_offsets_are_bounded() {
    let mut engine = engine();
    engine
        .move_eye_components(EyeSide::Right, Displacement::new(5.0, -5.0))
        .expect("finite delta");
    let eye = engine.parameters().appearance.eyes.right;
    assert_eq!(eye.manual_offset, Displacement::new(0.8, -0.8));

    engine.set_movement_mode(MovementMode::PupilOnly);
    engine
        .move_eye_components(EyeSide::Right, Displacement::new(3.0, 4.0))
        .expect("finite delta");
    let eye = engine.parameters().appearance.eyes.right;
    assert_relative_eq!(eye.pupil_offset.x, 0.24);
    assert_relative_eq!(eye.pupil_offset.y, 0.32);

    assert!(
        engine
            .move_eye_components(EyeSide::Right, Displacement::new(f64::NAN, 0.0))
            .is_err()
    );
}

#[test]
fn mirror_and_reset_cover_both_eyes() {
    let mut engine = engine();
    engine
        .set_iris_color(EyeSide::Left, Color::from_hex("#654321").expect("hex"))
        .expect("valid color");
    engine.set_pupil_size(EyeSide::Left, 7.0).expect("valid size");
    engine
        .set_pupil_offset(EyeSide::Left, Displacement::new(0.1, 0.1))
        .expect("finite offset");

    engine.mirror_eye_settings(EyeSide::Left);
    let eyes = engine.parameters().appearance.eyes;
    assert_eq!(eyes.left, eyes.right);

    engine.reset_eyes();
    assert_eq!(
        engine.parameters().appearance,
        SimulationParameters::default().appearance
    );
}
