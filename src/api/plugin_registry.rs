use indexmap::IndexMap;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::extensions::{PluginContext, PluginEvent, SimulatorPlugin};
use crate::render::Renderer;

use super::SimulatorEngine;

/// Plugins keyed by id, dispatched in registration order.
#[derive(Default)]
pub(super) struct PluginRegistry {
    plugins: IndexMap<String, Box<dyn SimulatorPlugin>>,
}

impl PluginRegistry {
    fn insert(&mut self, plugin: Box<dyn SimulatorPlugin>) -> SimResult<()> {
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(SimError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.plugins.contains_key(&plugin_id) {
            return Err(SimError::InvalidData(format!(
                "plugin `{plugin_id}` is already registered"
            )));
        }
        debug!(
            plugin = %plugin_id,
            subscription = ?plugin.subscription(),
            "plugin registered"
        );
        self.plugins.insert(plugin_id, plugin);
        Ok(())
    }

    /// Whether any registered plugin would be handed `event`.
    pub(super) fn wants(&self, event: &PluginEvent) -> bool {
        self.plugins
            .values()
            .any(|plugin| plugin.subscription().accepts(event))
    }

    pub(super) fn dispatch(&mut self, event: PluginEvent, context: PluginContext) {
        for plugin in self.plugins.values_mut() {
            if plugin.subscription().accepts(&event) {
                plugin.on_event(event, context);
            }
        }
    }
}

impl<R: Renderer> SimulatorEngine<R> {
    /// Registers a plugin under its id. Store-sync plugins subscribe to
    /// [`PluginSubscription::WriteBack`](crate::extensions::PluginSubscription)
    /// to receive only gaze, occluder and prism changes.
    pub fn register_plugin(&mut self, plugin: Box<dyn SimulatorPlugin>) -> SimResult<()> {
        self.core.runtime.plugins.insert(plugin)
    }

    /// Unregisters a plugin by id, keeping the dispatch order of the rest.
    /// Returns `true` when removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        self.core
            .runtime
            .plugins
            .plugins
            .shift_remove(plugin_id)
            .is_some()
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.core.runtime.plugins.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.core.runtime.plugins.plugins.contains_key(plugin_id)
    }

    /// Registered ids in dispatch order.
    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
        self.core.runtime.plugins.plugins.keys().map(String::as_str)
    }
}
