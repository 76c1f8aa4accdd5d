pub mod telegram;
pub mod traits;

pub use telegram::TelegramChannel;
pub use traits::{Event, EventKind, Transport};
