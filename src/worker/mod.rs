pub mod handler;
pub mod scope;
pub mod simulated;

pub use handler::{ClickOutcome, NotificationHandler, PushOutcome};
pub use scope::{ShownNotification, WindowClient, WorkerScope};
pub use simulated::{SimulatedClient, SimulatedNotification, SimulatedScope};
