mod sensor;

pub use sensor::SensorGenerator;
