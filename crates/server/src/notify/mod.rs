pub mod dispatcher;
pub mod publisher;

pub use dispatcher::{DispatchOutcome, Dispatcher, NotificationEvent};
pub use publisher::{BroadcastPublisher, EventPublisher, NoopPublisher, PublishedEvent};
