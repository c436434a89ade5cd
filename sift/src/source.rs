//! Record sources: the collaborator the search pipeline counts and fetches from.

use std::convert::Infallible;
use std::path::Path;

use log::trace;
use serde::de::DeserializeOwned;

use crate::errors::SearchError;
use crate::filter::Predicate;
use crate::pager::Window;
use crate::sort::SortKey;

/// Everything a source needs to materialize one page: which records, in what
/// order, and which slice of them.
#[derive(Debug)]
pub struct QueryPlan<R> {
    pub predicate: Predicate<R>,
    pub sort: Option<SortKey<R>>,
    pub window: Window,
}

impl<R: Clone> QueryPlan<R> {
    /// Filter, stable-sort and window `records` in memory.
    pub fn execute<'a, I>(&self, records: I) -> Vec<R>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let matching = records.into_iter().filter(|record| self.predicate.matches(record));
        match &self.sort {
            None => matching
                .skip(self.window.skip)
                .take(self.window.take)
                .cloned()
                .collect(),
            Some(sort) => {
                let mut sorted: Vec<R> = matching.cloned().collect();
                sort.apply(&mut sorted);
                let range = self.window.range(sorted.len());
                sorted.truncate(range.end);
                sorted.drain(..range.start);
                sorted
            }
        }
    }
}

/// A countable, filterable sequence of records of one shape.
///
/// `count` and `fetch` must observe the same logical record set so the total
/// reported alongside a page agrees with the page itself.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    type Record;
    type Error;

    /// Number of records matching `predicate`, before sorting or windowing.
    async fn count(&self, predicate: &Predicate<Self::Record>) -> Result<usize, Self::Error>;

    /// The records selected by `plan`, in plan order.
    async fn fetch(&self, plan: &QueryPlan<Self::Record>) -> Result<Vec<Self::Record>, Self::Error>;
}

/// A record source backed by a `Vec`.
#[derive(Debug, Clone)]
pub struct InMemorySource<R> {
    records: Vec<R>,
}

impl<R> Default for InMemorySource<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R> InMemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    #[inline]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_inner(self) -> Vec<R> {
        self.records
    }
}

impl<R: DeserializeOwned> InMemorySource<R> {
    /// Load records from a file holding a JSON array.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<R> = serde_json::from_str(&content)?;
        trace!("loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }
}

impl<R> From<Vec<R>> for InMemorySource<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<R> FromIterator<R> for InMemorySource<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R: Clone> RecordSource for InMemorySource<R> {
    type Record = R;
    type Error = Infallible;

    async fn count(&self, predicate: &Predicate<R>) -> Result<usize, Self::Error> {
        Ok(self.records.iter().filter(|record| predicate.matches(record)).count())
    }

    async fn fetch(&self, plan: &QueryPlan<R>) -> Result<Vec<R>, Self::Error> {
        Ok(plan.execute(&self.records))
    }
}
