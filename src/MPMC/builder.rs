use std::time::Duration;

use super::supervisor::Supervisor;
use crate::error::{ConfigError, StartError};

/// Validated startup parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of buffer slots (> 0).
    pub capacity: usize,
    /// Number of producer threads.
    pub producers: usize,
    /// Number of consumer threads.
    pub consumers: usize,
    /// Pause before each worker iteration. Throttling only.
    pub operation_delay: Duration,
}

impl Config {
    /// Build a config from the raw signed integers a parameter-style harness
    /// hands over (capacity, producer count, consumer count, delay in ms).
    pub fn from_params(
        capacity: i64,
        producers: i64,
        consumers: i64,
        operation_delay_ms: i64,
    ) -> Result<Self, ConfigError> {
        if capacity < 0 {
            return Err(ConfigError::NegativeCapacity(capacity));
        }
        if producers < 0 {
            return Err(ConfigError::NegativeProducers(producers));
        }
        if consumers < 0 {
            return Err(ConfigError::NegativeConsumers(consumers));
        }
        if operation_delay_ms < 0 {
            return Err(ConfigError::NegativeDelay(operation_delay_ms));
        }

        let config = Self {
            capacity: capacity as usize,
            producers: producers as usize,
            consumers: consumers as usize,
            operation_delay: Duration::from_millis(operation_delay_ms as u64),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

pub struct SystemBuilder {
    capacity: usize,
    producers: usize,
    consumers: usize,
    operation_delay: Duration,
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self {
            capacity: 8,
            producers: 1,
            consumers: 1,
            operation_delay: Duration::ZERO, // run flat out
        }
    }
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_operation_delay(mut self, delay: Duration) -> Self {
        self.operation_delay = delay;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let config = Config {
            capacity: self.capacity,
            producers: self.producers,
            consumers: self.consumers,
            operation_delay: self.operation_delay,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate and start the system in one step.
    pub fn start(self) -> Result<Supervisor, StartError> {
        Supervisor::start(self.build()?)
    }
}
