use log::{info, warn};

use super::{Editor, Task};
use crate::background::{
    BackgroundRemovalError, BackgroundRemovalService, InProgress, RemovalJob, RemovalOutcome,
    RemovalProgress,
};
use crate::element::{ElementId, ElementKind, ImageData, factory};
use crate::history::ActionKind;
use crate::raster::reencode_png;

impl Editor {
    pub fn is_removing_background(&self) -> bool {
        self.removal_in_progress.get()
    }

    /// Last removal failure, cleared automatically after the configured
    /// display time.
    pub fn removal_error(&self) -> Option<&BackgroundRemovalError> {
        self.removal_error.as_ref()
    }

    pub fn dismiss_removal_error(&mut self) {
        self.removal_error = None;
        self.scheduler.cancel(Task::ClearRemovalError);
    }

    fn report_removal_error(&mut self, err: BackgroundRemovalError) -> BackgroundRemovalError {
        warn!("Background removal failed: {}", err);
        self.removal_error = Some(err.clone());
        let delay = self.config.removal.error_display_ms;
        self.scheduler.schedule(Task::ClearRemovalError, self.now(), delay);
        err
    }

    /// Check preconditions and prepare the service input for the selected
    /// image. The scene is left untouched.
    pub fn begin_background_removal(&mut self) -> Result<RemovalJob, BackgroundRemovalError> {
        self.sync_events();
        if self.removal_in_progress.get() {
            return Err(BackgroundRemovalError::AlreadyProcessing);
        }

        let Some(selected) = self.scene.active_element() else {
            return Err(self.report_removal_error(BackgroundRemovalError::NoSelection));
        };
        let ElementKind::Image(image) = &selected.kind else {
            return Err(self.report_removal_error(BackgroundRemovalError::NotAnImage));
        };
        let target = selected.id;

        let png = match reencode_png(&image.bytes) {
            Ok(png) => png,
            Err(err) => {
                let detail = err.to_string();
                return Err(self.report_removal_error(BackgroundRemovalError::Service { detail }));
            }
        };

        let Some(guard) = InProgress::acquire(&self.removal_in_progress) else {
            return Err(BackgroundRemovalError::AlreadyProcessing);
        };
        self.removal_error = None;
        info!("Starting background removal for {}", target);
        Ok(RemovalJob { target, png, guard })
    }

    /// Swap the original image for the service result, keeping its
    /// placement, and select the replacement. Failures leave the scene as
    /// it was. A drag still in progress is ended first.
    pub fn finish_background_removal(
        &mut self,
        outcome: RemovalOutcome,
    ) -> Result<ElementId, BackgroundRemovalError> {
        let RemovalOutcome {
            target,
            result,
            guard,
        } = outcome;
        drop(guard);
        self.sync_events();
        // Removals are not committed mid-drag
        if self.state.is_modifying() {
            self.end_modification();
        }

        let data = match result
            .map_err(|err| err.message)
            .and_then(|bytes| ImageData::from_encoded(bytes).map_err(|err| err.to_string()))
        {
            Ok(data) => data,
            Err(detail) => {
                return Err(self.report_removal_error(BackgroundRemovalError::Service { detail }));
            }
        };

        let (Some(index), Some(original)) = (self.scene.index_of(target), self.scene.get(target))
        else {
            return Err(self.report_removal_error(BackgroundRemovalError::TargetGone));
        };
        let mut replacement = factory::create_image(data, original.position, 1.0);
        replacement.scale = original.scale;
        replacement.rotation = original.rotation;
        replacement.opacity = original.opacity;

        self.last_action = ActionKind::BackgroundRemoval;
        self.scene.remove(target);
        // The removal commits on its own, before the replacement exists
        self.sync_events();
        let id = self.scene.insert(index, replacement);
        self.scene.set_active(Some(id));
        self.sync_events();

        info!("Replaced {} with background-free image {}", target, id);
        Ok(id)
    }

    /// Run a whole removal against `service`.
    ///
    /// Keeps the editor borrowed while the service runs; hosts that need
    /// to keep editing meanwhile drive the three phases themselves.
    pub async fn remove_background(
        &mut self,
        service: &dyn BackgroundRemovalService,
        progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<ElementId, BackgroundRemovalError> {
        let job = self.begin_background_removal()?;
        let outcome = job.run(service, progress).await;
        self.finish_background_removal(outcome)
    }
}
