mod sensor_generator;

pub use sensor_generator::SensorGenerator;
