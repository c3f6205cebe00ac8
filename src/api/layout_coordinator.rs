use futures::future::AbortHandle;
use tracing::{debug, error};

use crate::assets::{AssetManifest, AssetStore, ImageSource, LoadProgress, load_all};
use crate::core::{RenderGeometry, Viewport, surface_size};
use crate::error::{SimError, SimResult};
use crate::render::Renderer;

use super::{PluginEvent, SimulatorEngine, UnavailableReason, ViewStatus};

impl<R: Renderer> SimulatorEngine<R> {
    /// Applies a container resize notification from the host.
    ///
    /// The surface size and, once the face image is known, the render
    /// geometry are recomputed. Calling this twice with the same size is a
    /// no-op the second time.
    pub fn resize(&mut self, container: Viewport) -> SimResult<()> {
        let config = self.core.config;
        let surface = surface_size(container, config.design, config.clamp_surface_to_design)?;
        self.core.runtime.container = container;
        if surface == self.core.runtime.surface && self.core.runtime.geometry.is_some() {
            return Ok(());
        }

        self.core.runtime.surface = surface;
        self.core.runtime.frame.viewport = surface;
        debug!(
            surface_width = surface.width,
            surface_height = surface.height,
            "surface resized"
        );
        self.refresh_geometry()
    }

    /// Progress report from a host-driven load. Ignored once loading ended.
    pub fn set_load_progress(&mut self, progress: LoadProgress) {
        if let ViewStatus::Loading(_) = self.core.runtime.status {
            self.core.runtime.status = ViewStatus::Loading(progress);
        }
    }

    /// Remembers the abort handle of an in-flight load so [`Self::unmount`]
    /// can discard it. A previously tracked load is aborted.
    pub fn track_asset_load(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.core.runtime.pending_load.replace(handle) {
            previous.abort();
        }
    }

    /// Installs loaded assets and brings the view to `Ready`.
    ///
    /// Every critical image of the standard manifest must be present.
    /// Results arriving after unmount or after the view became unavailable
    /// are discarded.
    pub fn apply_assets(&mut self, assets: AssetStore) -> SimResult<()> {
        if self.core.runtime.status.is_terminal() {
            debug!("discarding assets for a view that is no longer mounted");
            return Ok(());
        }
        self.core.runtime.pending_load = None;
        if let Some(name) = assets.missing_critical(&AssetManifest::standard()) {
            let err = SimError::AssetUnavailable {
                name: name.to_owned(),
            };
            self.fail_assets(&err);
            return Err(err);
        }

        self.core.runtime.assets = Some(assets);
        self.refresh_geometry()?;
        self.core.runtime.status = ViewStatus::Ready;
        debug!(assets = self.core.runtime.assets.as_ref().map_or(0, AssetStore::len), "view ready");
        Ok(())
    }

    /// Records a failed load. Cancellation is not a failure and is ignored.
    pub fn fail_assets(&mut self, err: &SimError) {
        self.core.runtime.pending_load = None;
        if self.core.runtime.status.is_terminal() {
            return;
        }
        let reason = match err {
            SimError::LoadCancelled => return,
            SimError::AssetUnavailable { name } | SimError::AssetLoad { name, .. } => {
                UnavailableReason::CriticalAsset { name: name.clone() }
            }
            other => UnavailableReason::LoadFailed {
                message: other.to_string(),
            },
        };
        error!(error = %err, "asset loading failed; view is now unavailable");
        self.core.runtime.status = ViewStatus::Unavailable(reason);
        self.emit_plugin_event(PluginEvent::ViewUnavailable);
    }

    /// Loads every manifest entry through `source` and applies the result.
    pub async fn load_assets<S: ImageSource>(
        &mut self,
        source: &S,
        manifest: &AssetManifest,
    ) -> SimResult<()> {
        self.set_load_progress(LoadProgress {
            loaded: 0,
            total: manifest.len(),
        });
        let status = &mut self.core.runtime.status;
        let result = load_all(source, manifest, |progress| {
            if let ViewStatus::Loading(_) = status {
                *status = ViewStatus::Loading(progress);
            }
        })
        .await;

        match result {
            Ok(assets) => self.apply_assets(assets),
            Err(err) => {
                self.fail_assets(&err);
                Err(err)
            }
        }
    }

    /// Tears the view down: discards any in-flight load and stops drawing.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.core.runtime.pending_load.take() {
            handle.abort();
        }
        self.core.session.drag = None;
        self.core.session.feedback = None;
        self.core.runtime.status = ViewStatus::Unmounted;
        debug!("view unmounted");
    }

    fn refresh_geometry(&mut self) -> SimResult<()> {
        let Some(aspect) = self
            .core
            .runtime
            .assets
            .as_ref()
            .and_then(AssetStore::face_aspect_ratio)
        else {
            return Ok(());
        };
        let geometry =
            RenderGeometry::compute(self.core.runtime.surface, aspect, self.core.config.design)?;
        debug!(
            scale_x = geometry.scale_x,
            scale_y = geometry.scale_y,
            offset_x = geometry.offset_x,
            offset_y = geometry.offset_y,
            "render geometry recomputed"
        );
        self.core.runtime.geometry = Some(geometry);
        Ok(())
    }
}
