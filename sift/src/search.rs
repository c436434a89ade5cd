//! The search pipeline: one entry point from request to paged result.
//!
//! Stages run in a fixed order: free text, domain filters, generic criteria,
//! count, sort, window, fetch, project. The total is counted over the
//! filtered but unsorted, unwindowed set, so `total_count` and `items` always
//! describe the same logical records.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::SiftConfig;
use crate::filter::{FilterCriterion, Predicate, compile_criteria, free_text};
use crate::pager::Pager;
use crate::schema::Searchable;
use crate::sort::{SortOrder, compile_sort};
use crate::source::{QueryPlan, RecordSource};

/// Typed, statically known filters a caller adds for one shape, ANDed with the
/// generic criteria.
pub trait DomainFilters<R> {
    fn predicates(&self) -> Vec<Predicate<R>>;
}

/// Domain filters for requests that carry none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoDomainFilters {}

impl<R> DomainFilters<R> for NoDomainFilters {
    fn predicates(&self) -> Vec<Predicate<R>> {
        Vec::new()
    }
}

/// A search request as it arrives from a transport.
///
/// Every field is optional on the wire; `domain` is flattened so shape-specific
/// fields such as `createdFrom` sit next to the generic ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<D = NoDomainFilters> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Raw direction token; only `asc` (any case) sorts ascending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub filters: Vec<FilterCriterion>,
    #[serde(flatten)]
    pub domain: D,
}

impl<D: Default> Default for SearchRequest<D> {
    fn default() -> Self {
        Self {
            search: None,
            page: None,
            page_size: None,
            sort_by: None,
            sort_order: None,
            filters: Vec::new(),
            domain: D::default(),
        }
    }
}

impl<D: Default> SearchRequest<D> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D> SearchRequest<D> {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order.as_str().to_string());
        self
    }

    pub fn with_filter(mut self, criterion: FilterCriterion) -> Self {
        self.filters.push(criterion);
        self
    }

    pub fn with_filters(mut self, criteria: impl IntoIterator<Item = FilterCriterion>) -> Self {
        self.filters.extend(criteria);
        self
    }

    /// Replace the domain filters, changing the request's domain type.
    pub fn with_domain<E>(self, domain: E) -> SearchRequest<E> {
        SearchRequest {
            search: self.search,
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            filters: self.filters,
            domain,
        }
    }
}

/// One page of projected records plus the size of the whole match set.
///
/// `page` and `page_size` are the clamped values actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> PagedResult<T> {
    #[inline]
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Runs search requests against record sources under one set of paging bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Searcher {
    pager: Pager,
}

impl Searcher {
    pub fn new(pager: Pager) -> Self {
        Self { pager }
    }

    pub fn from_config(config: &SiftConfig) -> Self {
        Self::new(Pager::from_settings(&config.search))
    }

    #[inline]
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Compile a request into a plan for shape `R` without touching a source.
    pub fn plan<R, D>(&self, request: &SearchRequest<D>) -> QueryPlan<R>
    where
        R: Searchable,
        D: DomainFilters<R>,
    {
        let schema = R::schema();

        let mut clauses = vec![free_text(schema, R::text_search_fields(), request.search.as_deref())];
        clauses.extend(request.domain.predicates());
        clauses.push(compile_criteria(schema, &request.filters));
        let predicate = Predicate::all(clauses);

        let sort_by = match request.sort_by.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => R::default_sort(),
        };
        let sort = compile_sort(schema, sort_by, request.sort_order.as_deref());

        let window = self.pager.window_or_default(request.page, request.page_size);

        QueryPlan {
            predicate,
            sort,
            window,
        }
    }

    /// Run `request` against `source` and map each record on the page through
    /// `projection`.
    ///
    /// Malformed criteria, sort fields and paging values never fail the search;
    /// only errors from the source itself are returned.
    pub async fn search<S, D, T, F>(
        &self,
        source: &S,
        request: &SearchRequest<D>,
        projection: F,
    ) -> Result<PagedResult<T>, S::Error>
    where
        S: RecordSource,
        S::Record: Searchable,
        D: DomainFilters<S::Record>,
        F: FnMut(S::Record) -> T,
    {
        let plan = self.plan::<S::Record, D>(request);
        trace!(
            "{}: searching with {} sort and window skip={} take={}",
            <S::Record as Searchable>::SHAPE,
            plan.sort.map_or("no", |sort| sort.order.as_str()),
            plan.window.skip,
            plan.window.take
        );

        let total = source.count(&plan.predicate).await?;
        let records = source.fetch(&plan).await?;
        debug!(
            "{}: {} matching records, returning {} on page {}",
            <S::Record as Searchable>::SHAPE,
            total,
            records.len(),
            plan.window.page
        );

        Ok(PagedResult {
            items: records.into_iter().map(projection).collect(),
            total_count: u64::try_from(total).unwrap_or(u64::MAX),
            page: plan.window.page,
            page_size: plan.window.page_size,
        })
    }
}

/// [`Searcher::search`] under the default paging bounds.
pub async fn search<S, D, T, F>(
    source: &S,
    request: &SearchRequest<D>,
    projection: F,
) -> Result<PagedResult<T>, S::Error>
where
    S: RecordSource,
    S::Record: Searchable,
    D: DomainFilters<S::Record>,
    F: FnMut(S::Record) -> T,
{
    Searcher::default().search(source, request, projection).await
}
