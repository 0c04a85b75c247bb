//! The editing engine: one [`Editor`] owns the scene, the undo/redo log,
//! the armed tool and every deferred task.
//!
//! Scene events are queued by an [`EventRecorder`] and applied after each
//! operation by [`Editor::sync_events`], which is where the history policy
//! lives. Debounced work is driven by the host calling [`Editor::tick`].
use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::background::BackgroundRemovalError;
use crate::config::EditorConfig;
use crate::event::{EventRecorder, SceneEvent, SubscriptionId, SuspendedTracking};
use crate::history::{ActionKind, HistoryEntry, HistoryLog};
use crate::renderer::{SceneRenderer, SoftwareRenderer};
use crate::scene::Scene;
use crate::state::{AutosaveStore, EditorState, Storage};
use crate::tools::{AnnotationCounter, TextEditSession, ToolMode};
use crate::util::{Clock, Scheduler, SystemClock};

mod background;
mod content;
mod drawing;
mod history;
mod layers;

/// Deferred work, one pending deadline per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    CommitOnCreate,
    CommitOnModify,
    Autosave,
    ClearRemovalError,
}

pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    history: HistoryLog,
    state: EditorState,
    recorder: EventRecorder,
    subscription: Option<SubscriptionId>,
    /// Label source for debounced creation commits, set by tool commands.
    last_action: ActionKind,
    pending_create: ActionKind,
    scheduler: Scheduler<Task>,
    annotations: AnnotationCounter,
    text_edit: Option<TextEditSession>,
    removal_in_progress: Rc<Cell<bool>>,
    removal_error: Option<BackgroundRemovalError>,
    autosave: Option<AutosaveStore>,
    renderer: Box<dyn SceneRenderer>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("scene", &self.scene)
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("current_step", &self.history.current_step())
            .field("last_action", &self.last_action)
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}

/// Assembles an [`Editor`] from its collaborators.
///
/// Anything not supplied falls back to a default: the built-in
/// [`SoftwareRenderer`], the wall clock, and no autosave.
#[derive(Default)]
pub struct EditorBuilder {
    config: EditorConfig,
    storage: Option<Box<dyn Storage>>,
    renderer: Option<Box<dyn SceneRenderer>>,
    clock: Option<Box<dyn Clock>>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn renderer(mut self, renderer: impl SceneRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Build the editor and restore the autosaved scene, if any.
    pub fn build(self) -> Editor {
        let EditorBuilder {
            config,
            storage,
            renderer,
            clock,
        } = self;
        let clock = clock.unwrap_or_else(|| Box::new(SystemClock));
        let seed = config.seed.unwrap_or_else(|| clock.now_millis());

        let autosave = match storage {
            Some(storage) if config.autosave.enabled => Some(AutosaveStore::new(
                storage,
                config.autosave.key.clone(),
                config.canvas.background,
            )),
            _ => None,
        };

        let scene = Scene::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.background,
        );
        let recorder = EventRecorder::new();
        let subscription = Some(scene.events().subscribe(Box::new(recorder.clone())));

        let mut editor = Editor {
            history: HistoryLog::new(config.history.limit),
            config,
            scene,
            state: EditorState::Idle,
            recorder,
            subscription,
            last_action: ActionKind::default(),
            pending_create: ActionKind::default(),
            scheduler: Scheduler::new(),
            annotations: AnnotationCounter::default(),
            text_edit: None,
            removal_in_progress: Rc::new(Cell::new(false)),
            removal_error: None,
            autosave,
            renderer: renderer.unwrap_or_else(|| Box::new(SoftwareRenderer)),
            clock,
            rng: StdRng::seed_from_u64(seed),
        };
        editor.restore_or_start_fresh();
        editor
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        EditorBuilder::new().config(config).build()
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    fn restore_or_start_fresh(&mut self) {
        let restored = self.autosave.as_ref().and_then(AutosaveStore::load);
        let kind = match restored {
            Some(snapshot) => {
                let mut scene =
                    SuspendedTracking::new(&mut self.scene, &mut self.subscription, &self.recorder);
                scene.load_snapshot(snapshot);
                ActionKind::Restored
            }
            None => ActionKind::Initial,
        };
        info!("Editor started ({})", kind.default_label());
        self.seed_history(kind);
    }

    /// Start the log over with the live scene as its only entry.
    fn seed_history(&mut self, kind: ActionKind) {
        match self.with_settled_scene(|editor| editor.scene.to_json()) {
            Ok(snapshot) => {
                let entry = HistoryEntry::new(snapshot, kind, None, self.now());
                self.history.reset(entry);
            }
            Err(err) => warn!("Could not snapshot scene for history: {}", err),
        }
    }

    /// Run `read` with the element under modification back at its real
    /// opacity, so snapshots never capture the drag highlight.
    fn with_settled_scene<R>(&mut self, read: impl FnOnce(&Self) -> R) -> R {
        let highlighted = match self.state {
            EditorState::Modifying { id, opacity, .. } => self
                .scene
                .get_mut_silent(id)
                .map(|element| (id, std::mem::replace(&mut element.opacity, opacity))),
            _ => None,
        };
        let result = read(self);
        if let Some((id, highlight)) = highlighted {
            if let Some(element) = self.scene.get_mut_silent(id) {
                element.opacity = highlight;
            }
        }
        result
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Run `update` against the scene, then apply the history policy to
    /// whatever it changed.
    pub fn update_scene<R>(&mut self, update: impl FnOnce(&mut Scene) -> R) -> R {
        let result = update(&mut self.scene);
        self.sync_events();
        result
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.state.mode()
    }

    pub fn last_action(&self) -> ActionKind {
        self.last_action
    }

    pub fn renderer(&self) -> &dyn SceneRenderer {
        self.renderer.as_ref()
    }

    pub fn is_task_pending(&self, task: Task) -> bool {
        self.scheduler.is_pending(task)
    }

    /// Earliest deadline the host should call [`Editor::tick`] at.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    /// Move the state machine, refusing transitions it does not allow.
    fn transition(&mut self, next: EditorState) -> bool {
        if !self.state.can_transition_to(&next) {
            warn!("Ignoring state change {:?} -> {:?}", self.state, next);
            return false;
        }
        self.state = next;
        true
    }

    /// Apply the history policy to every queued scene event.
    ///
    /// Must run before the drawing/modifying state changes, since those
    /// decide whether a removal is real.
    pub fn sync_events(&mut self) {
        for event in self.recorder.drain() {
            match event {
                SceneEvent::ObjectAdded { temporary: false, .. } => {
                    self.pending_create = self.last_action;
                    let delay = self.config.history.create_debounce_ms;
                    self.scheduler.schedule(Task::CommitOnCreate, self.now(), delay);
                }
                SceneEvent::ObjectRemoved { id, temporary } => {
                    if temporary || self.state.is_drawing() || self.state.is_modifying() {
                        continue;
                    }
                    if self.text_edit.is_some_and(|session| session.id == id) {
                        self.text_edit = None;
                    }
                    self.commit(ActionKind::Delete, None);
                }
                SceneEvent::ObjectModified { .. } if !self.state.is_modifying() => {
                    let delay = self.config.history.modify_debounce_ms;
                    self.scheduler.schedule(Task::CommitOnModify, self.now(), delay);
                }
                _ => {}
            }
        }
    }

    /// Fire every deferred task that is due. Hosts call this from their
    /// event loop (or at [`Editor::next_deadline`]).
    pub fn tick(&mut self) {
        self.sync_events();
        let now = self.now();
        let due = self.scheduler.take_due(now);

        // A commit snapshots the whole scene, so one per tick covers both.
        // Creation wins the label.
        if due.contains(&Task::CommitOnCreate) {
            self.commit(self.pending_create, None);
        } else if due.contains(&Task::CommitOnModify) {
            self.commit(ActionKind::Modify, None);
        }

        for task in due {
            match task {
                Task::CommitOnCreate | Task::CommitOnModify => {}
                Task::Autosave => self.autosave_now(),
                Task::ClearRemovalError => {
                    debug!("Clearing background removal error");
                    self.removal_error = None;
                }
            }
        }
    }

    /// Commit anything still debounced and write the autosave right away.
    /// Hosts call this before shutting down.
    pub fn flush(&mut self) {
        self.sync_events();
        self.flush_pending_commits();
        if self.scheduler.cancel(Task::Autosave) {
            self.autosave_now();
        }
    }

    fn schedule_autosave(&mut self) {
        if self.autosave.is_some() {
            let delay = self.config.autosave.delay_ms;
            self.scheduler.schedule(Task::Autosave, self.now(), delay);
        }
    }

    fn autosave_now(&mut self) {
        let now = self.now();
        let saved = self.with_settled_scene(|editor| {
            editor
                .autosave
                .as_ref()
                .map(|store| store.save(&editor.scene, now))
        });
        // Editing never stops because the slot is unwritable
        if let Some(Err(err)) = saved {
            warn!("Autosave failed: {}", err);
        }
    }
}
