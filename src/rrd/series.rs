use super::location::ConsolidationFn;
use crate::model::{SampleValue, Timestamp};

/// Samples fetched from one RRD file: a fixed-step grid over
/// (start, end] with one optional value per step. Holes are unknown
/// samples, not zeros.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    pub start: Timestamp,
    pub end: Timestamp,
    pub step: u64,
    pub values: Vec<Option<SampleValue>>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Re-consolidates samples into coarser buckets when the store
    /// returned finer data than requested. A bucket with no known
    /// samples stays a hole.
    pub fn consolidate(self, resolution: u64, cf: ConsolidationFn) -> Self {
        if self.step == 0 || resolution <= self.step {
            return self;
        }

        let per = (resolution / self.step) as usize;
        let step = self.step * per as u64;

        let values: Vec<Option<SampleValue>> = self
            .values
            .chunks(per)
            .map(|bucket| consolidate_bucket(bucket, cf))
            .collect();

        Self {
            start: self.start,
            end: self.start + (values.len() as i64) * step as i64,
            step,
            values,
        }
    }
}

fn consolidate_bucket(bucket: &[Option<SampleValue>], cf: ConsolidationFn) -> Option<SampleValue> {
    let known: Vec<SampleValue> = bucket.iter().filter_map(|v| *v).collect();
    if known.is_empty() {
        return None;
    }

    Some(match cf {
        ConsolidationFn::Average => known.iter().sum::<SampleValue>() / known.len() as SampleValue,
        ConsolidationFn::Min => known.iter().cloned().fold(SampleValue::INFINITY, SampleValue::min),
        ConsolidationFn::Max => known.iter().cloned().fold(SampleValue::NEG_INFINITY, SampleValue::max),
        ConsolidationFn::Last => *known.last().unwrap(),
    })
}
