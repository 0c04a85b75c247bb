use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::event::{EventHandler, SceneEvent, SubscriptionId};
use crate::scene::Scene;

/// Queues scene events so the editor can apply its history policy once the
/// scene call that produced them has returned.
///
/// Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    queue: Rc<RefCell<VecDeque<SceneEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SceneEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &SceneEvent) {
        self.queue.borrow_mut().push_back(event.clone());
    }
}

/// Scope in which the history recorder is detached from the scene.
///
/// Used while loading a snapshot, whose add/remove churn must not turn into
/// history entries. The recorder is reattached when the guard drops, which
/// also happens on early return and unwinding.
pub struct SuspendedTracking<'a> {
    scene: &'a mut Scene,
    subscription: &'a mut Option<SubscriptionId>,
    recorder: EventRecorder,
}

impl<'a> SuspendedTracking<'a> {
    pub fn new(
        scene: &'a mut Scene,
        subscription: &'a mut Option<SubscriptionId>,
        recorder: &EventRecorder,
    ) -> Self {
        if let Some(id) = subscription.take() {
            scene.events().unsubscribe(id);
        }
        Self {
            scene,
            subscription,
            recorder: recorder.clone(),
        }
    }
}

impl Deref for SuspendedTracking<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl DerefMut for SuspendedTracking<'_> {
    fn deref_mut(&mut self) -> &mut Scene {
        self.scene
    }
}

impl Drop for SuspendedTracking<'_> {
    fn drop(&mut self) {
        let id = self
            .scene
            .events()
            .subscribe(Box::new(self.recorder.clone()));
        *self.subscription = Some(id);
    }
}
