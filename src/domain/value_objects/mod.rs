pub mod sensor;

pub use sensor::{SensorChannel, SensorKind, UnknownChannel};
