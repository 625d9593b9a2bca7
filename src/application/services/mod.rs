pub mod dispatcher;
pub mod lane;
pub mod monitor;

pub use dispatcher::{render_message, AlertDispatcher, DispatchError};
pub use lane::{run_lanes, LaneReport, SensorLane};
pub use monitor::{Evaluation, MonitorState, SensorMonitor};
