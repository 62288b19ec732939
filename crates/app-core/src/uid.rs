//! Snowflake id generator for user and report primary keys.
//!
//! Layout, high to low: 41 bits of milliseconds since the epoch, 10 bits of
//! worker id, 12 bits of per-millisecond sequence.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("Worker ID {worker_id} is out of the valid range (0-{MAX_WORKER_ID})")]
    WorkerIdOutOfRange { worker_id: u16 },

    #[error("System clock moved backwards. Cannot generate new IDs.")]
    ClockMovedBackwards,

    #[error("Generated ID has exceeded the maximum value for a signed 64-bit integer.")]
    IdOverflow,

    #[error("Epoch {epoch} lies in the future")]
    EpochInFuture { epoch: u64 },
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Generator: Send + Sync {
    fn generate(&self) -> Result<i64, SnowflakeError>;
}

// The default epoch is 2025-01-01 00:00:00 UTC
const DEFAULT_EPOCH: u64 = 1735689600000;
const WORKER_ID_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;

// The maximum values are derived from the bit counts
const MAX_WORKER_ID: u16 = (1 << WORKER_ID_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;

// Bit shifts for constructing the ID
const WORKER_ID_SHIFT: u8 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u8 = SEQUENCE_BITS + WORKER_ID_BITS;

struct SnowflakeState {
    last_timestamp: u64,
    sequence: u16,
}

pub struct Snowflake {
    worker_id: u16,
    epoch: u64,
    state: Mutex<SnowflakeState>,
}

impl Snowflake {
    pub fn builder(worker_id: u16) -> SnowflakeBuilder {
        SnowflakeBuilder::new(worker_id)
    }

    fn wait_for_next_millis(&self, current_timestamp: u64) -> Result<u64, SnowflakeError> {
        let mut new_timestamp = self.current_timestamp_millis()?;
        while new_timestamp <= current_timestamp {
            std::thread::yield_now();
            new_timestamp = self.current_timestamp_millis()?;
        }
        Ok(new_timestamp)
    }

    fn current_timestamp_millis(&self) -> Result<u64, SnowflakeError> {
        now_millis()?.checked_sub(self.epoch).ok_or(SnowflakeError::ClockMovedBackwards)
    }
}

fn now_millis() -> Result<u64, SnowflakeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|_| SnowflakeError::ClockMovedBackwards)
}

impl Generator for Snowflake {
    fn generate(&self) -> Result<i64, SnowflakeError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut timestamp = self.current_timestamp_millis()?;

        if timestamp < state.last_timestamp {
            return Err(SnowflakeError::ClockMovedBackwards);
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            if state.sequence == 0 {
                timestamp = self.wait_for_next_millis(state.last_timestamp)?;
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        let id_u64: u64 =
            (timestamp << TIMESTAMP_SHIFT) | ((self.worker_id as u64) << WORKER_ID_SHIFT) | (state.sequence as u64);

        if id_u64 > i64::MAX as u64 {
            return Err(SnowflakeError::IdOverflow);
        }

        Ok(id_u64 as i64)
    }
}

pub struct SnowflakeBuilder {
    worker_id: u16,
    epoch: u64,
}

impl SnowflakeBuilder {
    pub fn new(worker_id: u16) -> Self {
        Self { worker_id, epoch: DEFAULT_EPOCH }
    }

    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn build(self) -> Result<Snowflake, SnowflakeError> {
        if self.worker_id > MAX_WORKER_ID {
            return Err(SnowflakeError::WorkerIdOutOfRange { worker_id: self.worker_id });
        }

        if self.epoch > now_millis()? {
            return Err(SnowflakeError::EpochInFuture { epoch: self.epoch });
        }

        let initial_state = SnowflakeState { last_timestamp: 0, sequence: 0 };

        Ok(Snowflake { worker_id: self.worker_id, epoch: self.epoch, state: Mutex::new(initial_state) })
    }
}
