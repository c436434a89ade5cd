use anyhow::{Result, ensure};

use crate::examples::models::{Gender, UserFilters, UserResponse};
use crate::examples::support;
use crate::{InMemorySource, SearchRequest};

/// Example 01 – free-text search and typed user filters.
pub async fn run() -> Result<()> {
    let source = InMemorySource::from(support::sample_users());

    // Free text runs over fullName, email, phoneNumber and address, ignoring
    // case. With no sortBy the shape default (createdAt, descending) applies.
    let request = SearchRequest::<UserFilters>::new().with_search("ho chi MINH");
    let page = crate::search(&source, &request, UserResponse::from).await?;
    ensure!(page.total_count == 3, "three users live in Ho Chi Minh City");
    let ids: Vec<i32> = page.items.iter().map(|user| user.id).collect();
    ensure!(ids == [9, 5, 1], "newest first, got {ids:?}");

    // Domain filters are ANDed with everything else.
    let request = SearchRequest::<UserFilters>::new().with_page(1, 2).with_domain(UserFilters {
        gender: Some(Gender::Female),
        is_email_verified: Some(true),
        ..UserFilters::default()
    });
    let page = crate::search(&source, &request, UserResponse::from).await?;
    ensure!(page.total_count == 4, "four verified women");
    ensure!(page.items.len() == 2 && page.has_more(), "first of two pages");
    ensure!(page.items[0].full_name == "Ngo Phuong Mai");
    ensure!(page.total_pages() == 2);

    // A blank term filters nothing.
    let request = SearchRequest::<UserFilters>::new().with_search("   ").with_page(1, 100);
    let page = crate::search(&source, &request, UserResponse::from).await?;
    ensure!(page.total_count == 10 && page.items.len() == 10);

    Ok(())
}
