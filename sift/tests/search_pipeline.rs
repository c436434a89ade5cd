//! End-to-end tests for the search pipeline over an in-memory source.
//!
//! Covers ordering of the pipeline stages, the relationship between
//! `total_count` and the returned page, paging clamps and the lenient
//! handling of malformed criteria and sort fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sift::filter::CmpOp;
use sift::{
    DomainFilters, FilterCriterion, FilterOperator, InMemorySource, Literal, NoDomainFilters, Number, Predicate,
    SearchRequest, SearchTag, Searchable, Searcher, SiftConfig, SortOrder,
};

// =============================================================================
// Test Shapes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SearchTag)]
enum Status {
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Searchable)]
#[search(shape = "pipeline_tickets", rename_all = "camelCase", default_sort = "createdAt")]
struct Ticket {
    id: i64,
    #[search(text)]
    title: String,
    status: Status,
    value: i32,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketFilters {
    #[serde(default)]
    min_value: Option<i32>,
}

impl DomainFilters<Ticket> for TicketFilters {
    fn predicates(&self) -> Vec<Predicate<Ticket>> {
        self.min_value
            .map(|min| {
                Predicate::compare(
                    Ticket::VALUE,
                    CmpOp::Ge,
                    Literal::Number(Number::Int(i64::from(min))),
                )
            })
            .into_iter()
            .collect()
    }
}

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

/// `count` tickets with ids `1..=count`, created one minute apart in id order.
fn tickets(count: i64) -> Vec<Ticket> {
    let statuses = [Status::A, Status::B, Status::C];
    (1..=count)
        .map(|id| Ticket {
            id,
            title: format!("Ticket number {id}"),
            status: statuses[(id as usize - 1) % statuses.len()],
            value: id as i32,
            created_at: base_time() + Duration::minutes(id),
            closed_at: (id % 4 == 0).then(|| base_time() + Duration::days(id)),
        })
        .collect()
}

fn ids(items: &[Ticket]) -> Vec<i64> {
    items.iter().map(|ticket| ticket.id).collect()
}

fn sorted_ids(items: &[Ticket]) -> Vec<i64> {
    let mut ids = ids(items);
    ids.sort_unstable();
    ids
}

// =============================================================================
// Paging and Sorting
// =============================================================================

#[tokio::test]
async fn second_page_of_descending_creation_order() {
    let source = InMemorySource::from(tickets(25));
    let request = SearchRequest::<NoDomainFilters>::new()
        .with_page(2, 10)
        .with_sort("createdAt", SortOrder::Desc);

    let page = sift::search(&source, &request, |ticket: Ticket| ticket)
        .await
        .expect("in-memory search cannot fail");

    assert_eq!(page.total_count, 25);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(ids(&page.items), (6..=15).rev().collect::<Vec<_>>());
    assert!(page.has_more());
    assert_eq!(page.total_pages(), 3);
}

#[tokio::test]
async fn out_of_range_paging_is_clamped() {
    let source = InMemorySource::from(tickets(150));

    let request = SearchRequest::<NoDomainFilters>::new().with_page(0, 500);
    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!((page.page, page.page_size), (1, 100));
    assert_eq!(page.items.len(), 100);

    let request = SearchRequest::<NoDomainFilters>::new().with_page(-7, -3);
    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!((page.page, page.page_size), (1, 1));
    assert_eq!(page.items, vec![150]);
    assert_eq!(page.total_count, 150);
}

#[tokio::test]
async fn page_past_the_end_is_empty_but_counted() {
    let source = InMemorySource::from(tickets(12));
    let request = SearchRequest::<NoDomainFilters>::new().with_page(5, 10);

    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 12);
    assert!(!page.has_more());
}

#[tokio::test]
async fn missing_sort_uses_shape_default_descending() {
    let source = InMemorySource::from(tickets(5));
    let request = SearchRequest::<NoDomainFilters>::new();

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(ids(&page.items), vec![5, 4, 3, 2, 1]);
    assert_eq!(page.page_size, 10);
}

#[tokio::test]
async fn blank_sort_field_uses_shape_default() {
    let source = InMemorySource::from(tickets(5));
    let mut request = SearchRequest::<NoDomainFilters>::new();
    request.sort_by = Some("  ".to_string());

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(ids(&page.items), vec![5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn unknown_sort_field_keeps_source_order() {
    let mut records = tickets(6);
    records.reverse();
    records.swap(0, 3);
    let expected = ids(&records);
    let source = InMemorySource::from(records);

    let request = SearchRequest::<NoDomainFilters>::new().with_sort("priority", SortOrder::Asc);
    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(ids(&page.items), expected);
}

#[tokio::test]
async fn ascending_sort_puts_missing_values_first() {
    let source = InMemorySource::from(tickets(8));
    let request = SearchRequest::<NoDomainFilters>::new().with_sort("CLOSEDAT", SortOrder::Asc);

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(ids(&page.items), vec![1, 2, 3, 5, 6, 7, 4, 8]);

    let request = SearchRequest::<NoDomainFilters>::new().with_sort("closedAt", SortOrder::Desc);
    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(ids(&page.items), vec![8, 4, 1, 2, 3, 5, 6, 7]);
}

#[tokio::test]
async fn sort_order_token_other_than_asc_is_descending() {
    let source = InMemorySource::from(tickets(3));
    let mut request = SearchRequest::<NoDomainFilters>::new();
    request.sort_by = Some("value".to_string());
    request.sort_order = Some("upwards".to_string());

    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!(page.items, vec![3, 2, 1]);

    request.sort_order = Some("ASC".to_string());
    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!(page.items, vec![1, 2, 3]);
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn greater_than_keeps_values_above_the_bound() {
    let source = InMemorySource::from(tickets(10));
    let request = SearchRequest::<NoDomainFilters>::new().with_filter(FilterCriterion::new(
        "value",
        FilterOperator::GreaterThan,
        "5",
    ));

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(sorted_ids(&page.items), vec![6, 7, 8, 9, 10]);
}

#[tokio::test]
async fn membership_drops_invalid_segments() {
    let source = InMemorySource::from(tickets(9));
    let request = SearchRequest::<NoDomainFilters>::new().with_filter(FilterCriterion::new(
        "status",
        FilterOperator::In,
        "A, B, z",
    ));

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(page.total_count, 6);
    assert!(page.items.iter().all(|ticket| ticket.status != Status::C));
}

#[tokio::test]
async fn malformed_criteria_are_ignored() {
    let source = InMemorySource::from(tickets(10));
    let request = SearchRequest::<NoDomainFilters>::new().with_filters([
        FilterCriterion::new("noSuchField", FilterOperator::Equals, "1"),
        FilterCriterion::new("value", FilterOperator::GreaterThan, "many"),
        FilterCriterion::new("title", FilterOperator::GreaterThan, "T"),
        FilterCriterion::without_value("value", FilterOperator::Equals),
    ]);

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(page.total_count, 10);
}

#[tokio::test]
async fn null_checks_on_optional_fields() {
    let source = InMemorySource::from(tickets(12));

    let request = SearchRequest::<NoDomainFilters>::new()
        .with_filter(FilterCriterion::without_value("closedAt", FilterOperator::IsNotNull));
    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(sorted_ids(&page.items), vec![4, 8, 12]);

    let request = SearchRequest::<NoDomainFilters>::new()
        .with_filter(FilterCriterion::without_value("closedAt", FilterOperator::IsNull));
    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    assert_eq!(page.total_count, 9);
}

#[tokio::test]
async fn free_text_domain_filters_and_criteria_are_combined() {
    let source = InMemorySource::from(tickets(30));
    let request = SearchRequest::<NoDomainFilters>::new()
        .with_search("NUMBER 1")
        .with_filter(FilterCriterion::new("status", FilterOperator::NotEquals, "b"))
        .with_sort("value", SortOrder::Asc)
        .with_page(1, 100)
        .with_domain(TicketFilters { min_value: Some(11) });

    let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
    // "number 1" matches 1 and 10..=19; min_value drops 1 and 10; status B is 11, 14, 17.
    assert_eq!(ids(&page.items), vec![12, 13, 15, 16, 18, 19]);
    assert_eq!(page.total_count, 6);
}

#[tokio::test]
async fn total_count_is_independent_of_the_window() {
    let source = InMemorySource::from(tickets(47));
    let filter = FilterCriterion::new("value", FilterOperator::LessThanOrEqual, "40");

    let mut seen = Vec::new();
    for page_number in 1..=5 {
        let request = SearchRequest::<NoDomainFilters>::new()
            .with_filter(filter.clone())
            .with_page(page_number, 9);
        let page = sift::search(&source, &request, |ticket: Ticket| ticket).await.unwrap();
        assert_eq!(page.total_count, 40);
        seen.extend(ids(&page.items));
    }

    seen.sort_unstable();
    assert_eq!(seen, (1..=40).collect::<Vec<_>>());
}

// =============================================================================
// Requests and Configuration
// =============================================================================

#[tokio::test]
async fn request_deserializes_with_flattened_domain_filters() {
    let json = r#"{
        "search": "ticket",
        "page": 1,
        "pageSize": 3,
        "sortBy": "value",
        "sortOrder": "asc",
        "filters": [{ "field": "status", "operator": "in", "value": "a,c" }],
        "minValue": 4
    }"#;
    let request: SearchRequest<TicketFilters> = serde_json::from_str(json).expect("request should parse");
    assert_eq!(request.domain.min_value, Some(4));
    assert_eq!(request.filters[0].operator, FilterOperator::In);

    let source = InMemorySource::from(tickets(10));
    let page = sift::search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!(page.items, vec![4, 6, 7]);
    assert_eq!(page.total_count, 5);
}

#[tokio::test]
async fn configured_page_sizes_bound_the_searcher() {
    let config = SiftConfig::from_toml("[search]\ndefault_page_size = 4\nmax_page_size = 6\n").unwrap();
    let searcher = Searcher::from_config(&config);
    let source = InMemorySource::from(tickets(20));

    let page = searcher
        .search(&source, &SearchRequest::<NoDomainFilters>::new(), |ticket: Ticket| ticket.id)
        .await
        .unwrap();
    assert_eq!(page.page_size, 4);
    assert_eq!(page.items.len(), 4);

    let request = SearchRequest::<NoDomainFilters>::new().with_page(1, 50);
    let page = searcher.search(&source, &request, |ticket: Ticket| ticket.id).await.unwrap();
    assert_eq!(page.page_size, 6);
}

#[test]
fn shape_is_registered_once_schema_is_built() {
    Ticket::schema();
    let shape = sift::get_shape("PIPELINE_TICKETS").expect("shape should be registered");
    assert_eq!(shape.text_search_fields, &["title"]);
    assert_eq!(shape.default_sort, Some("createdAt"));
    assert_eq!(Status::TAGS, &["A", "B", "C"]);
}

#[tokio::test]
async fn date_only_bounds_in_json_requests_filter_users() {
    use sift::examples::models::{UserFilters, UserResponse};
    use sift::examples::support::sample_users;

    let source = InMemorySource::from(sample_users());

    let json = r#"{"createdFrom":"2024-01-05","pageSize":100}"#;
    let request: SearchRequest<UserFilters> = serde_json::from_str(json).expect("request should parse");
    assert_eq!(
        request.domain.created_from,
        Some("2024-01-05T00:00:00Z".parse().expect("timestamp"))
    );
    let page = sift::search(&source, &request, UserResponse::from).await.unwrap();
    assert_eq!(page.total_count, 7);
    assert!(page.items.iter().all(|user| user.id >= 4));

    let json = r#"{"createdFrom":"2024-01-05T10:00:00","createdTo":"2024-01-09"}"#;
    let request: SearchRequest<UserFilters> = serde_json::from_str(json).expect("request should parse");
    let page = sift::search(&source, &request, UserResponse::from).await.unwrap();
    let mut found: Vec<i32> = page.items.iter().map(|user| user.id).collect();
    found.sort_unstable();
    assert_eq!(found, vec![5, 6, 7, 8]);

    let json = r#"{"createdTo":"last week"}"#;
    let err = serde_json::from_str::<SearchRequest<UserFilters>>(json).expect_err("bad date should be rejected");
    assert!(err.to_string().contains("'last week' is not a date"));
}
