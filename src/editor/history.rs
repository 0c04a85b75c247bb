use log::{debug, error, info, warn};

use super::{Editor, Task};
use crate::error::SceneError;
use crate::event::SuspendedTracking;
use crate::history::{ActionKind, HistoryEntry, HistoryLog};
use crate::raster::render_thumbnail;
use crate::state::EditorState;

impl Editor {
    /// Record the live scene as a new history entry.
    ///
    /// Truncates the redo branch, evicts the oldest entry past the limit,
    /// and supersedes any debounced commit still pending.
    pub fn commit(&mut self, kind: ActionKind, label: Option<&str>) {
        self.scheduler.cancel(Task::CommitOnCreate);
        self.scheduler.cancel(Task::CommitOnModify);

        let interval = self.config.history.thumbnail_interval;
        let wants_thumbnail = self.history.wants_thumbnail(kind, interval);
        let captured = self.with_settled_scene(|editor| {
            let snapshot = editor.scene.to_json()?;
            let thumbnail = wants_thumbnail
                .then(|| {
                    render_thumbnail(
                        editor.renderer.as_ref(),
                        &editor.scene,
                        editor.config.history.thumbnail_width,
                    )
                    .map_err(|err| warn!("Skipping history thumbnail: {}", err))
                    .ok()
                })
                .flatten();
            Ok::<_, SceneError>((snapshot, thumbnail))
        });
        let (snapshot, thumbnail) = match captured {
            Ok(captured) => captured,
            Err(err) => {
                error!("Could not snapshot scene for history: {}", err);
                return;
            }
        };

        let entry = HistoryEntry::new(snapshot, kind, label, self.now()).with_thumbnail(thumbnail);
        let label = entry.label.clone();
        let step = self.history.push(entry);
        debug!("Committed \"{}\" at step {} of {}", label, step, self.history.len());

        self.schedule_autosave();
    }

    /// Commit a debounced change right away instead of waiting for it.
    pub(super) fn flush_pending_commits(&mut self) -> bool {
        if self.scheduler.is_pending(Task::CommitOnCreate) {
            self.commit(self.pending_create, None);
        } else if self.scheduler.is_pending(Task::CommitOnModify) {
            self.commit(ActionKind::Modify, None);
        } else {
            return false;
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        self.sync_events();
        self.flush_pending_commits();
        let Some(snapshot) = self.history.step_back().map(|entry| entry.snapshot.clone()) else {
            return false;
        };
        info!("Undo to step {}", self.history.current_step());
        self.restore(&snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.sync_events();
        self.flush_pending_commits();
        let Some(snapshot) = self.history.step_forward().map(|entry| entry.snapshot.clone()) else {
            return false;
        };
        info!("Redo to step {}", self.history.current_step());
        self.restore(&snapshot);
        true
    }

    /// Jump straight to entry `index`. Out-of-range indices are ignored.
    pub fn go_to_state(&mut self, index: usize) -> bool {
        self.sync_events();
        if index >= self.history.len() {
            return false;
        }
        let evicted = self.history.evicted();
        self.flush_pending_commits();
        // Flushing may have evicted entries in front of the target
        let Some(index) = index.checked_sub(self.history.evicted() - evicted) else {
            return false;
        };
        let Some(snapshot) = self.history.jump_to(index).map(|entry| entry.snapshot.clone()) else {
            return false;
        };
        info!("Jumped to history step {}", index);
        self.restore(&snapshot);
        true
    }

    /// Collapse the log to one entry holding the live scene.
    pub fn clear_history(&mut self) {
        self.sync_events();
        self.scheduler.cancel(Task::CommitOnCreate);
        self.scheduler.cancel(Task::CommitOnModify);
        self.seed_history(ActionKind::Initial);
        info!("History cleared");
    }

    /// Load `snapshot` without the load itself reaching history.
    fn restore(&mut self, snapshot: &str) {
        if let Some(id) = self.state.modifying_id() {
            debug!("Abandoning modification of {} for history navigation", id);
            self.state = EditorState::Idle;
        }
        self.text_edit = None;

        let result = {
            let mut scene =
                SuspendedTracking::new(&mut self.scene, &mut self.subscription, &self.recorder);
            scene.load_json(snapshot)
        };
        if let Err(err) = result {
            error!("Could not restore history entry: {}", err);
        }
        self.schedule_autosave();
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.history.entries()
    }

    pub fn current_step(&self) -> usize {
        self.history.current_step()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
