use crate::Value;

/// Count-weighted running average of a stream of samples.
///
/// This is a compact representation and does not keep the individual
/// samples around. After any number of folds the value equals the
/// arithmetic mean of every sample folded so far (within floating-point
/// tolerance); fold order only affects intermediate states, never the
/// final value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunningAverage {
    value: Value,
    weight: u64,
}

impl RunningAverage {
    /// Starts a fresh average from the first observed sample.
    #[must_use]
    pub fn first(value: Value) -> Self {
        Self { value, weight: 1 }
    }

    pub(crate) fn from_parts(value: Value, weight: u64) -> Self {
        Self { value, weight }
    }

    /// Folds one more sample into the average.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fold(self, sample: Value) -> Self {
        let weight = self.weight + 1;

        Self {
            value: (self.value * self.weight as Value + sample) / weight as Value,
            weight,
        }
    }

    /// Folds a sample into an existing average, or starts a fresh one.
    #[must_use]
    pub fn fold_into(existing: Option<Self>, sample: Value) -> Self {
        match existing {
            Some(avg) => avg.fold(sample),
            None => Self::first(sample),
        }
    }

    /// Current average value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.value
    }

    /// Number of samples folded in so far.
    #[must_use]
    pub fn weight(&self) -> u64 {
        self.weight
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fold_all(values: &[Value]) -> RunningAverage {
        let mut avg = None;
        for &value in values {
            avg = Some(RunningAverage::fold_into(avg, value));
        }
        avg.unwrap()
    }

    #[test_log::test]
    fn first_sample() {
        let avg = RunningAverage::first(10.0);

        assert_eq!(10.0, avg.value());
        assert_eq!(1, avg.weight());
    }

    #[test_log::test]
    fn tracks_arithmetic_mean() {
        let mut avg = RunningAverage::first(1.0);

        for n in 2..=100u64 {
            #[allow(clippy::cast_precision_loss)]
            let expected = (1..=n).sum::<u64>() as Value / n as Value;

            avg = avg.fold(n as Value);

            assert!((avg.value() - expected).abs() < 1e-9);
            assert_eq!(n, avg.weight());
        }
    }

    #[test_log::test]
    fn fold_order_does_not_change_final_value() {
        let forward = fold_all(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        let backward = fold_all(&[6.0, 2.0, 9.0, 5.0, 1.0, 4.0, 1.0, 3.0]);

        assert!((forward.value() - backward.value()).abs() < 1e-9);
        assert_eq!(forward.weight(), backward.weight());
        assert!((forward.value() - 3.875).abs() < 1e-9);
    }
}
