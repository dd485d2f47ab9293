pub mod models;
pub mod payload;
pub use models::*;
pub use payload::click_target;

#[cfg(not(target_arch = "wasm32"))]
pub mod send;
#[cfg(not(target_arch = "wasm32"))]
pub use send::{Delivery, DeliveryOptions, broadcast_push_notification, send_push_notification};
