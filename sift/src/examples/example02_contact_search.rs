use anyhow::{Result, ensure};
use chrono::Duration;

use crate::examples::models::{ContactFilters, ContactResponse};
use crate::examples::support;
use crate::{InMemorySource, SearchRequest, SortOrder};

/// Example 02 – paging through contacts and clamping out-of-range requests.
pub async fn run() -> Result<()> {
    let source = InMemorySource::from(support::sample_contacts(25));

    // Page 2 of 10, newest first: the 11th to 20th newest contacts.
    let request = SearchRequest::<ContactFilters>::new()
        .with_sort("createdAt", SortOrder::Desc)
        .with_page(2, 10);
    let page = crate::search(&source, &request, ContactResponse::from).await?;
    let ids: Vec<i32> = page.items.iter().map(|contact| contact.id).collect();
    ensure!(page.total_count == 25);
    ensure!((page.page, page.page_size) == (2, 10));
    ensure!(ids == (6..=15).rev().collect::<Vec<_>>(), "got {ids:?}");

    // Out-of-range paging is clamped, and the clamped values are reported.
    let request = SearchRequest::<ContactFilters>::new().with_page(0, 500);
    let page = crate::search(&source, &request, ContactResponse::from).await?;
    ensure!((page.page, page.page_size) == (1, 100));
    ensure!(page.items.len() == 25 && !page.has_more());

    // Inclusive creation-time bounds.
    let base = support::base_time();
    let request = SearchRequest::<ContactFilters>::new()
        .with_sort("createdat", SortOrder::Asc)
        .with_domain(ContactFilters {
            created_from: Some(base + Duration::hours(5)),
            created_to: Some(base + Duration::hours(14)),
        });
    let page = crate::search(&source, &request, ContactResponse::from).await?;
    ensure!(page.total_count == 10, "contacts 6 through 15");
    ensure!(page.items.first().map(|c| c.id) == Some(6));
    ensure!(page.items.last().map(|c| c.id) == Some(15));

    Ok(())
}
