mod compositor;
mod engine;
mod engine_accessors;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod interaction_coordinator;
mod json_contract;
mod layout_coordinator;
mod parameter_controller;
mod plugin_dispatch;
mod plugin_registry;
mod render_coordinator;
mod scheduler;
mod session;
mod tool_controller;
mod validation;
mod view_state;

pub use crate::extensions::PluginEvent;
pub use engine::SimulatorEngine;
pub use engine_config::{CompositorWeights, SimulatorConfig};
pub use engine_snapshot::SessionSnapshot;
pub use json_contract::{SESSION_SNAPSHOT_JSON_SCHEMA_V1, SessionSnapshotJsonContractV1};
pub use scheduler::{AnimationLoop, FrameClock, FrameHandle, ManualFrameClock, TickOutcome};
pub use session::SimulationParameters;
pub use view_state::{UNAVAILABLE_HINT, UNAVAILABLE_TITLE, UnavailableReason, ViewStatus};
