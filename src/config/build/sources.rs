use std::convert::TryFrom;
use std::time::Duration;

use crate::config::build::BuildError;
use crate::config::choices::{GeneratorParameters, SourceChoice};
use crate::streams::generators::SensorGenerator;
use crate::streams::{JsonLinesSource, ReadingSource};

impl TryFrom<GeneratorParameters> for SensorGenerator {
    type Error = BuildError;

    fn try_from(parameters: GeneratorParameters) -> Result<Self, Self::Error> {
        let max_readings = parameters
            .max_readings
            .map(|v| {
                usize::try_from(v).map_err(|_| {
                    BuildError::InvalidParameter("max_readings too large for usize".into())
                })
            })
            .transpose()?;

        let generator = SensorGenerator::new(
            parameters.mean,
            parameters.std_dev,
            parameters.spike_probability,
            parameters.spike_factor,
            max_readings,
            parameters.seed,
        )?;

        Ok(generator.with_interval(Duration::from_millis(parameters.interval_ms)))
    }
}

pub fn build_source(choice: SourceChoice) -> Result<Box<dyn ReadingSource>, BuildError> {
    match choice {
        SourceChoice::Stdin => Ok(Box::new(JsonLinesSource::stdin())),
        SourceChoice::JsonLines(p) => Ok(Box::new(JsonLinesSource::open(p.path)?)),
        SourceChoice::SensorGenerator(p) => Ok(Box::new(SensorGenerator::try_from(p)?)),
    }
}
