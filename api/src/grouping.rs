//! Bucketing and rank ordering for standings tables.

use crate::client::ApiResult;
use crate::projection::{lookup, parse_rank};
use crate::{Conference, ProjectedEntry};
use log::warn;
use serde_json::{Map, Value};

/// A closed set of named buckets with one declared fallback.
pub trait Bucket: Copy + Eq + Sized + 'static {
    /// Every bucket, in output order.
    const ALL: &'static [Self];
    /// Where entries land when their bucket value matches nothing in `ALL`.
    const FALLBACK: Self;

    /// Upstream value that selects this bucket.
    fn label(&self) -> &'static str;
    /// Key under which the bucket is serialized.
    fn key(&self) -> &'static str;

    fn classify(value: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.label() == value)
            .unwrap_or(Self::FALLBACK)
    }
}

impl Bucket for Conference {
    const ALL: &'static [Self] = &[Conference::East, Conference::West];
    // Standings only ever carry these two conferences; anything else is
    // reported alongside the West.
    const FALLBACK: Self = Conference::West;

    fn label(&self) -> &'static str {
        Conference::label(self)
    }

    fn key(&self) -> &'static str {
        match self {
            Conference::East => "east",
            Conference::West => "west",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<B: Bucket> {
    buckets: Vec<(B, Vec<ProjectedEntry>)>,
}

impl<B: Bucket> Grouped<B> {
    pub fn get(&self, bucket: B) -> &[ProjectedEntry] {
        self.buckets
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or_default()
    }

    pub fn into_json(self) -> Value {
        let map: Map<String, Value> = self
            .buckets
            .into_iter()
            .map(|(bucket, entries)| {
                let list = entries.into_iter().map(Value::Object).collect();
                (bucket.key().to_owned(), Value::Array(list))
            })
            .collect();
        Value::Object(map)
    }
}

/// Partitions `entries` by the string at `bucket_field` and orders each bucket
/// ascending by the integer at `rank_field`. Ties keep their input order.
pub fn group_by_rank<B: Bucket>(
    entries: Vec<ProjectedEntry>,
    bucket_field: &str,
    rank_field: &str,
) -> ApiResult<Grouped<B>> {
    let mut buckets: Vec<(B, Vec<(i64, ProjectedEntry)>)> =
        B::ALL.iter().map(|b| (*b, Vec::new())).collect();

    for entry in entries {
        let rank = parse_rank(rank_field, lookup(&entry, rank_field).unwrap_or(&Value::Null))?;
        let value = lookup(&entry, bucket_field)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let bucket = B::classify(value);
        if bucket.label() != value {
            warn!(
                "unrecognised {bucket_field} {value:?}, grouping under {}",
                bucket.key()
            );
        }
        if let Some((_, list)) = buckets.iter_mut().find(|(b, _)| *b == bucket) {
            list.push((rank, entry));
        }
    }

    let buckets = buckets
        .into_iter()
        .map(|(bucket, mut list)| {
            // sort_by_key is stable.
            list.sort_by_key(|(rank, _)| *rank);
            (bucket, list.into_iter().map(|(_, e)| e).collect())
        })
        .collect();
    Ok(Grouped { buckets })
}
