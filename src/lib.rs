//! Gym occupancy tracker.
//!
//! Polls a remote occupancy sensor API on a fixed interval, maintains a
//! running average per recurring weekly slot (weekday plus time-of-day at
//! 15 minute resolution), keeps the raw timestamped history and serves
//! read endpoints that reconstruct per-weekday profiles over a bounded
//! lookback window.
//!
//! It uses <https://github.com/fjall-rs/fjall> as its underlying storage
//! engine: two key-ordered partitions, `stats` (slot key to running
//! average and weight) and `history` (timestamp to raw value). History
//! keys are formatted so that lexicographic order equals chronological
//! order, which makes a day read a single prefix scan.
//!
//! Weekday queries never read `stats`; they are always re-aggregated from
//! `history`, folding the raw values of the last N occurrences of the
//! requested weekday with the same count-weighted rule the poller uses.
//!
//! All timestamps, day keys and slot keys are derived from UTC.

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]

mod avg;
mod config;
mod error;
pub mod http;
mod poller;
mod query;
mod rollup;
mod slot;
mod store;
mod time;
mod upstream;
mod week;

pub use avg::RunningAverage;
pub use config::Config;
pub use error::{Error, Result};
pub use poller::Poller;
pub use query::Sample;
pub use slot::SlotKey;
pub use store::Store;
pub use time::now;
pub use upstream::{Reading, SensorClient};

/// Value type observed from the sensor and stored in both tables.
pub type Value = f64;
