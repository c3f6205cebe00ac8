//! Hooks for code living outside the simulator, such as the shared
//! configuration store that mirrors gaze and tool state to other views.

mod plugins;

pub use plugins::{PluginContext, PluginEvent, PluginSubscription, SimulatorPlugin};
