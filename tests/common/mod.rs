pub fn payload(value: f64) -> String {
    format!("{{\"timestamp\": 1700000000.0, \"reading\": {value:?}}}")
}

pub const REFERENCE: [f64; 7] = [50.0, 51.0, 49.0, 50.0, 52.0, 48.0, 150.0];
