pub mod cookie;
pub mod initiator;
pub mod key;
pub mod platform;
pub mod report;

pub use cookie::get_cookie;
pub use initiator::{InitOutcome, SubscriptionInitiator};
pub use key::{decode_server_key, is_uncompressed_p256};
pub use platform::{PagePlatform, SubscribeOptions, SubscriptionReporter};
pub use report::HttpReporter;
