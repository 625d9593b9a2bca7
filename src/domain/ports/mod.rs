pub mod notifier;
pub mod source;

pub use notifier::{NotificationError, Notifier};
pub use source::{SampleSource, SourceError};
