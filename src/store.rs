use crate::avg::RunningAverage;
use crate::slot::{self, SlotKey};
use crate::{Error, Value};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, NaiveDate, Utc};
use fjall::{CompressionType, PartitionCreateOptions, TxKeyspace, TxPartition};
use std::path::Path;

const STATS_PARTITION: &str = "stats";
const HISTORY_PARTITION: &str = "history";

/// The durable state of the tracker.
///
/// Two key-ordered partitions inside one keyspace:
///
/// - `stats`: slot key -> running average + weight, mutated in place on
///   every successful poll cycle
/// - `history`: minute-resolution timestamp -> raw value, append-only
///
/// History keys are formatted so that lexicographic order equals
/// chronological order, which makes a day read a prefix scan.
pub struct Store {
    keyspace: TxKeyspace,
    stats: TxPartition,
    history: TxPartition,
}

impl Store {
    /// Opens or recovers the store at the given path.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let keyspace = fjall::Config::new(path).open_transactional()?;

        let stats = keyspace.open_partition(
            STATS_PARTITION,
            PartitionCreateOptions::default()
                .block_size(4_096)
                .compression(CompressionType::Lz4),
        )?;

        let history = keyspace.open_partition(
            HISTORY_PARTITION,
            PartitionCreateOptions::default()
                .block_size(4_096)
                .compression(CompressionType::Lz4),
        )?;

        Ok(Self {
            keyspace,
            stats,
            history,
        })
    }

    /// Current running average for a slot, if any sample has been recorded.
    ///
    /// # Errors
    ///
    /// Returns error if the storage engine fails.
    pub fn stat(&self, slot: &SlotKey) -> crate::Result<Option<RunningAverage>> {
        Ok(self
            .stats
            .get(slot.to_string())?
            .map(|bytes| deserialize_stat(&bytes)))
    }

    /// Folds one sample into the slot's running average and persists the
    /// updated record, creating it on first observation.
    ///
    /// The read-modify-write runs inside a single write transaction, so a
    /// concurrent reader sees either the previous or the updated record,
    /// never a partial one.
    ///
    /// # Errors
    ///
    /// Returns error if the storage engine fails.
    pub fn record_stat(&self, slot: &SlotKey, sample: Value) -> crate::Result<RunningAverage> {
        let key = slot.to_string();

        let mut tx = self.keyspace.write_tx();

        let existing = tx.get(&self.stats, &key)?.map(|bytes| deserialize_stat(&bytes));
        let updated = RunningAverage::fold_into(existing, sample);

        tx.insert(&self.stats, &key, serialize_stat(&updated));
        tx.commit()?;

        Ok(updated)
    }

    /// Appends one raw observation to the history log.
    ///
    /// Keys have minute resolution; a second observation resolving to the
    /// same key is rejected with [`Error::DuplicateTimestamp`] instead of
    /// silently overwriting the recorded sample.
    ///
    /// # Errors
    ///
    /// Returns error if the key collides or the storage engine fails.
    pub fn append_history(&self, instant: &DateTime<Utc>, value: Value) -> crate::Result<()> {
        let key = slot::history_key(instant);

        let mut tx = self.keyspace.write_tx();

        if tx.get(&self.history, &key)?.is_some() {
            return Err(Error::DuplicateTimestamp(key));
        }

        tx.insert(&self.history, &key, value.to_be_bytes());
        tx.commit()?;

        Ok(())
    }

    /// All history entries recorded on the given calendar day, ascending
    /// by timestamp.
    ///
    /// # Errors
    ///
    /// Returns error if the storage engine fails.
    pub fn history_for_day(
        &self,
        date: NaiveDate,
    ) -> crate::Result<Vec<(DateTime<Utc>, Value)>> {
        let prefix = slot::day_key(date);

        let read_tx = self.keyspace.read_tx();

        let mut entries = vec![];

        for kv in read_tx.prefix(&self.history, prefix) {
            let (k, v) = kv?;

            let Some(ts) = std::str::from_utf8(&k)
                .ok()
                .and_then(slot::parse_history_key)
            else {
                log::warn!("skipping history entry with malformed key {k:?}");
                continue;
            };

            entries.push((ts, deserialize_value(&v)));
        }

        Ok(entries)
    }
}

fn serialize_stat(avg: &RunningAverage) -> Vec<u8> {
    let mut bytes = vec![];

    bytes
        .write_f64::<BigEndian>(avg.value())
        .expect("should serialize");
    bytes
        .write_u64::<BigEndian>(avg.weight())
        .expect("should serialize");

    bytes
}

fn deserialize_stat(bytes: &[u8]) -> RunningAverage {
    let mut reader = bytes;

    let value = reader.read_f64::<BigEndian>().expect("should deserialize");
    let weight = reader.read_u64::<BigEndian>().expect("should deserialize");

    RunningAverage::from_parts(value, weight)
}

fn deserialize_value(bytes: &[u8]) -> Value {
    let mut reader = bytes;
    reader.read_f64::<BigEndian>().expect("should deserialize")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test_log::test]
    fn record_stat_folds_samples() -> crate::Result<()> {
        let path = tempfile::tempdir()?;
        let store = Store::open(&path)?;

        let slot = SlotKey::at(&instant(2024, 6, 10, 9, 0));

        assert_eq!(None, store.stat(&slot)?);

        let first = store.record_stat(&slot, 10.0)?;
        assert_eq!(10.0, first.value());
        assert_eq!(1, first.weight());

        let second = store.record_stat(&slot, 20.0)?;
        assert_eq!(15.0, second.value());
        assert_eq!(2, second.weight());

        let read_back = store.stat(&slot)?.unwrap();
        assert_eq!(second, read_back);

        Ok(())
    }

    #[test_log::test]
    fn stats_are_kept_per_slot() -> crate::Result<()> {
        let path = tempfile::tempdir()?;
        let store = Store::open(&path)?;

        let morning = SlotKey::at(&instant(2024, 6, 10, 9, 0));
        let evening = SlotKey::at(&instant(2024, 6, 10, 18, 0));

        store.record_stat(&morning, 10.0)?;
        store.record_stat(&evening, 80.0)?;

        assert_eq!(10.0, store.stat(&morning)?.unwrap().value());
        assert_eq!(80.0, store.stat(&evening)?.unwrap().value());

        Ok(())
    }

    #[test_log::test]
    fn history_rejects_duplicate_timestamps() -> crate::Result<()> {
        let path = tempfile::tempdir()?;
        let store = Store::open(&path)?;

        let ts = instant(2024, 6, 10, 9, 15);

        store.append_history(&ts, 10.0)?;

        assert!(matches!(
            store.append_history(&ts, 20.0),
            Err(Error::DuplicateTimestamp(_))
        ));

        // the first write is untouched
        let entries = store.history_for_day(ts.date_naive())?;
        assert_eq!(vec![(ts, 10.0)], entries);

        Ok(())
    }

    #[test_log::test]
    fn history_for_day_is_ordered_and_filtered() -> crate::Result<()> {
        let path = tempfile::tempdir()?;
        let store = Store::open(&path)?;

        // inserted out of order on purpose
        store.append_history(&instant(2024, 6, 10, 9, 15), 7.0)?;
        store.append_history(&instant(2024, 6, 10, 9, 0), 5.0)?;
        store.append_history(&instant(2024, 6, 10, 9, 30), 9.0)?;

        // neighboring days must not leak into the scan
        store.append_history(&instant(2024, 6, 9, 23, 45), 1.0)?;
        store.append_history(&instant(2024, 6, 11, 0, 0), 2.0)?;

        let entries = store.history_for_day(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())?;

        assert_eq!(
            vec![
                (instant(2024, 6, 10, 9, 0), 5.0),
                (instant(2024, 6, 10, 9, 15), 7.0),
                (instant(2024, 6, 10, 9, 30), 9.0),
            ],
            entries,
        );

        Ok(())
    }

    #[test_log::test]
    fn history_for_empty_day_is_empty() -> crate::Result<()> {
        let path = tempfile::tempdir()?;
        let store = Store::open(&path)?;

        let entries = store.history_for_day(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())?;
        assert!(entries.is_empty());

        Ok(())
    }

    #[test_log::test]
    fn stat_roundtrip_survives_reopen() -> crate::Result<()> {
        let path = tempfile::tempdir()?;

        let slot = SlotKey::at(&instant(2024, 6, 10, 9, 0));

        {
            let store = Store::open(&path)?;
            store.record_stat(&slot, 10.0)?;
            store.record_stat(&slot, 20.0)?;
        }

        let store = Store::open(&path)?;
        let avg = store.stat(&slot)?.unwrap();

        assert_eq!(15.0, avg.value());
        assert_eq!(2, avg.weight());

        Ok(())
    }
}
