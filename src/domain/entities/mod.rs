pub mod alert;
pub mod sample;
pub mod window;

pub use alert::AlertEvent;
pub use sample::{RawSample, Sample, SampleError};
pub use window::SampleWindow;
