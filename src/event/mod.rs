mod bus;
mod events;
mod handlers;

pub use bus::{EventBus, SubscriptionId};
pub use events::{SceneEvent, SceneEventKind};
pub use handlers::{EventRecorder, SuspendedTracking};

pub trait EventHandler {
    fn handle_event(&mut self, event: &SceneEvent);
}
