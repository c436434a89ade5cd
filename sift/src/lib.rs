//! Sift: typed search over in-memory record collections.
//!
//! A search request (free text, field criteria, a sort key and paging) is
//! compiled against a record shape's static schema into a predicate, a sort
//! key and a window, then run against a [`RecordSource`]. Malformed filter,
//! sort and paging input never fails a search; it degrades and is logged.
//!
//! ```no_run
//! use sift::examples::models::{User, UserFilters, UserResponse};
//! use sift::{FilterCriterion, FilterOperator, InMemorySource, SearchRequest, SortOrder};
//!
//! # async fn demo(users: Vec<User>) {
//! let source = InMemorySource::from(users);
//! let request = SearchRequest::<UserFilters>::new()
//!     .with_search("nguyen")
//!     .with_filter(FilterCriterion::new("role", FilterOperator::In, "Admin, CSKH"))
//!     .with_sort("createdAt", SortOrder::Desc)
//!     .with_page(1, 20);
//!
//! let page = sift::search(&source, &request, UserResponse::from).await;
//! # }
//! ```

extern crate self as sift;

pub mod coerce;
pub mod config;
pub mod errors;
pub mod examples;
pub mod filter;
pub mod pager;
pub mod registry;
pub mod schema;
pub mod search;
pub mod sort;
pub mod source;
pub mod value;

pub use config::SiftConfig;
pub use errors::*;
pub use filter::{FilterCriterion, FilterOperator, Predicate};
pub use pager::{Pager, Window};
pub use registry::{ShapeDescriptor, get_shape, registered_shapes};
pub use schema::{Field, FieldDescriptor, FieldType, FieldValue, Schema, SearchTag, Searchable};
pub use search::{DomainFilters, NoDomainFilters, PagedResult, SearchRequest, Searcher, search};
pub use sift_macros::{SearchTag, Searchable};
pub use sort::{SortKey, SortOrder};
pub use source::{InMemorySource, QueryPlan, RecordSource};
pub use value::{Literal, Number, Value};
