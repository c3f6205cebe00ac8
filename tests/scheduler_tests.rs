use motility_rs::SimError;
use motility_rs::api::{
    AnimationLoop, FrameClock, FrameHandle, ManualFrameClock, SimulatorConfig, SimulatorEngine,
    TickOutcome, ViewStatus,
};
use motility_rs::assets::{AssetStore, manifest};
use motility_rs::core::Viewport;
use motility_rs::render::{LayeredFrame, NullRenderer, Renderer};

struct FlakyRenderer {
    fail_after: u64,
    rendered: u64,
}

impl Renderer for FlakyRenderer {
    fn render(&mut self, _frame: &LayeredFrame) -> Result<(), SimError> {
        if self.rendered >= self.fail_after {
            return Err(SimError::Backend("surface lost".to_owned()));
        }
        self.rendered += 1;
        Ok(())
    }
}

fn engine<R: Renderer>(renderer: R) -> SimulatorEngine<R> {
    let config = SimulatorConfig::new(Viewport::new(900, 600));
    SimulatorEngine::new(renderer, config).expect("engine init")
}

fn critical_assets() -> AssetStore {
    AssetStore::new()
        .with_sprite(manifest::FACE, 900, 600)
        .with_sprite(manifest::EYE, 120, 120)
        .with_sprite(manifest::OCCLUDER, 200, 200)
        .with_sprite(manifest::TARGET, 130, 570)
}

fn pump<R: Renderer>(
    animation: &mut AnimationLoop<ManualFrameClock>,
    engine: &mut SimulatorEngine<R>,
) -> Option<TickOutcome> {
    let handle = animation.clock_mut().next_due()?;
    Some(animation.on_frame(handle, engine))
}

#[test]
fn loop_waits_for_assets_then_draws() {
    let mut engine = engine(NullRenderer::default());
    let mut animation = AnimationLoop::new(ManualFrameClock::new());
    animation.start();

    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Skipped));
    assert!(animation.is_running());

    engine.apply_assets(critical_assets()).expect("assets apply");
    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Drawn));
    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Drawn));
    assert_eq!(engine.renderer().frames_rendered, 2);
    assert_eq!(animation.clock().pending().len(), 1);
}

#[test]
fn draw_fault_halts_without_rescheduling() {
    let mut engine = engine(FlakyRenderer {
        fail_after: 2,
        rendered: 0,
    });
    engine.apply_assets(critical_assets()).expect("assets apply");
    let mut animation = AnimationLoop::new(ManualFrameClock::new());
    animation.start();

    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Drawn));
    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Drawn));
    assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Halted));
    assert!(!animation.is_running());
    assert!(animation.clock().pending().is_empty());
    assert!(matches!(engine.status(), ViewStatus::Unavailable(_)));
}

#[test]
fn unmount_cancels_exactly_the_outstanding_request() {
    let mut engine = engine(NullRenderer::default());
    engine.apply_assets(critical_assets()).expect("assets apply");
    let mut animation = AnimationLoop::new(ManualFrameClock::new());
    animation.start();
    for _ in 0..5 {
        assert_eq!(pump(&mut animation, &mut engine), Some(TickOutcome::Drawn));
    }
    let outstanding = animation.pending_handle().expect("pending frame");

    animation.unmount(&mut engine);

    assert!(!animation.is_running());
    assert_eq!(animation.clock().cancelled(), &[outstanding]);
    assert!(animation.clock().pending().is_empty());
    assert_eq!(engine.status(), &ViewStatus::Unmounted);
    assert_eq!(engine.tick(), TickOutcome::Halted);
}

#[test]
fn stale_handles_are_ignored() {
    let mut engine = engine(NullRenderer::default());
    engine.apply_assets(critical_assets()).expect("assets apply");
    let mut animation = AnimationLoop::new(ManualFrameClock::new());
    animation.start();
    let current = animation.pending_handle().expect("pending frame");

    assert_eq!(
        animation.on_frame(FrameHandle(current.0 + 40), &mut engine),
        TickOutcome::Skipped
    );
    assert_eq!(animation.pending_handle(), Some(current));
    assert_eq!(engine.frames_drawn(), 0);
}

#[test]
fn custom_clock_sees_one_request_per_tick() {
    #[derive(Default)]
    struct CountingClock {
        requested: u64,
        cancelled: u64,
    }

    impl FrameClock for CountingClock {
        fn request_frame(&mut self) -> FrameHandle {
            self.requested += 1;
            FrameHandle(self.requested)
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {
            self.cancelled += 1;
        }
    }

    let mut engine = engine(NullRenderer::default());
    engine.apply_assets(critical_assets()).expect("assets apply");
    let mut animation = AnimationLoop::new(CountingClock::default());
    animation.start();
    for _ in 0..3 {
        let handle = animation.pending_handle().expect("pending frame");
        animation.on_frame(handle, &mut engine);
    }
    animation.stop();

    let clock = animation.into_clock();
    assert_eq!(clock.requested, 4);
    assert_eq!(clock.cancelled, 1);
}
