//! Aggregate values computed over one numeric column.
//!
//! Both stats types follow SQL aggregate semantics: missing values are skipped,
//! `count` is the number of present values, and `min`, `max`, `sum` and `avg`
//! are `None` when no value was present.

use rust_decimal::Decimal;
use serde::Serialize;

/// Aggregates over an integer column.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IntStats {
    pub count: usize,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
}

impl IntStats {
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<i64>,
    {
        let mut stats = Self::default();
        for value in values.into_iter().flatten() {
            stats.push(value.into());
        }
        stats.finish();
        stats
    }

    fn push(&mut self, value: i64) {
        self.count += 1;
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        self.sum = Some(self.sum.unwrap_or(0).saturating_add(value));
    }

    fn finish(&mut self) {
        self.avg = match (self.sum, self.count) {
            (Some(sum), count) if count > 0 => Some(sum as f64 / count as f64),
            _ => None,
        };
    }
}

/// Aggregates over a decimal column. Sums and averages are exact.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DecimalStats {
    pub count: usize,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub sum: Option<Decimal>,
    pub avg: Option<Decimal>,
}

impl DecimalStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<Decimal>>,
    {
        let mut stats = Self::default();
        for value in values.into_iter().flatten() {
            stats.count += 1;
            stats.min = Some(stats.min.map_or(value, |min| min.min(value)));
            stats.max = Some(stats.max.map_or(value, |max| max.max(value)));
            stats.sum = Some(match stats.sum {
                Some(sum) => sum.saturating_add(value),
                None => value,
            });
        }
        stats.avg = stats
            .sum
            .and_then(|sum| sum.checked_div(Decimal::from(stats.count)))
            .map(|avg| avg.round_dp(AVG_SCALE));
        stats
    }
}

/// Decimal places kept on averages.
const AVG_SCALE: u32 = 4;

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn int_stats_skip_missing_values() {
        let stats = IntStats::from_values(vec![Some(4), None, Some(10), Some(1)]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, Some(1));
        assert_eq!(stats.max, Some(10));
        assert_eq!(stats.sum, Some(15));
        assert_eq!(stats.avg, Some(5.0));
    }

    #[test]
    fn int_stats_of_nothing_are_empty() {
        let stats = IntStats::from_values(Vec::<Option<i32>>::new());
        assert_eq!(stats, IntStats::default());

        let stats = IntStats::from_values(vec![None::<i32>, None]);
        assert_eq!(stats.count, 0);
        assert!(stats.sum.is_none());
        assert!(stats.avg.is_none());
    }

    #[test]
    fn decimal_stats_are_exact() {
        let stats = DecimalStats::from_values(vec![
            Some(dec!(0.10)),
            Some(dec!(0.20)),
            Some(dec!(0.70)),
        ]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, Some(dec!(1.00)));
        assert_eq!(stats.min, Some(dec!(0.10)));
        assert_eq!(stats.max, Some(dec!(0.70)));
        assert_eq!(stats.avg, Some(dec!(0.3333)));
    }

    #[test]
    fn decimal_stats_of_nothing_are_empty() {
        assert_eq!(DecimalStats::from_values(Vec::new()), DecimalStats::default());
    }
}
