/// Row projection and the timed single-row fetch
///
/// A fetched row is narrowed to the cells of one family whose qualifiers were
/// requested. A missing row stays `None` so callers can tell "no entity" apart
/// from "entity with none of the requested columns".
use crate::resolver::factory::RowResolver;
use crate::store::{Row, StoreError};

use indexmap::{IndexMap, IndexSet};
use std::time::{Duration, Instant};

/// Qualifier name to cell value for one projected row
pub type ResultEntity = IndexMap<String, String>;

/// Keep only `family` cells whose qualifier is in `qualifiers`
pub fn project_row(row: &Row, family: &str, qualifiers: &IndexSet<String>) -> ResultEntity {
    row.cells
        .iter()
        .filter(|cell| cell.family == family && qualifiers.contains(&cell.qualifier))
        .map(|cell| (cell.qualifier.clone(), cell.value.clone()))
        .collect()
}

impl RowResolver {
    /// Read the row at `key` and project it
    pub async fn fetch(&self, key: &str) -> Result<Option<ResultEntity>, StoreError> {
        let _timer = SlowLookupTimer::start(self, key);

        tracing::trace!(
            "table={}, key={}, sourceAttr={}, family={}, qualifier=[{}]",
            self.table_id,
            key,
            self.source_attr,
            self.family,
            self.qualifiers_joined
        );

        match self.store.read_row(&self.table_id, key).await? {
            Some(row) => Ok(Some(project_row(&row, &self.family, &self.qualifiers))),
            None => {
                tracing::trace!("row not found. table={}, key={}", self.table_id, key);
                Ok(None)
            }
        }
    }
}

/// Logs the lookup when it outlives the threshold, whichever way it ends
struct SlowLookupTimer<'a> {
    resolver: &'a RowResolver,
    key: &'a str,
    started: Instant,
}

impl<'a> SlowLookupTimer<'a> {
    fn start(resolver: &'a RowResolver, key: &'a str) -> Self {
        Self {
            resolver,
            key,
            started: Instant::now(),
        }
    }
}

impl Drop for SlowLookupTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed > self.resolver.slow_threshold {
            tracing::info!(
                ms = rounded_millis(elapsed),
                table = %self.resolver.table_id,
                key = %self.key,
                source_attr = %self.resolver.source_attr,
                family = %self.resolver.family,
                qualifiers = %self.resolver.qualifiers_joined,
                "slow lookup"
            );
        }
    }
}

fn rounded_millis(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}
