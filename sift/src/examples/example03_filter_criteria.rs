use anyhow::{Result, ensure};

use crate::examples::models::{User, UserFilters, UserResponse};
use crate::examples::support;
use crate::{FilterCriterion, InMemorySource, PagedResult, SearchRequest, SortOrder};

async fn ids_for(
    source: &InMemorySource<User>,
    criteria: &[&str],
    sort: Option<(&str, SortOrder)>,
) -> Result<(u64, Vec<i32>)> {
    let filters = criteria
        .iter()
        .map(|raw| raw.parse::<FilterCriterion>())
        .collect::<Result<Vec<_>, _>>()?;
    let mut request = SearchRequest::<UserFilters>::new().with_filters(filters).with_page(1, 100);
    if let Some((field, order)) = sort {
        request = request.with_sort(field, order);
    }
    let page: PagedResult<UserResponse> = crate::search(source, &request, UserResponse::from).await?;
    Ok((page.total_count, page.items.iter().map(|user| user.id).collect()))
}

/// Example 03 – generic `field:operator:value` criteria, including the ones
/// that are quietly ignored.
pub async fn run() -> Result<()> {
    let source = InMemorySource::from(support::sample_users());

    // Tags match ignoring case; the unknown "Manager" segment is dropped.
    let (total, ids) = ids_for(
        &source,
        &["role:in:admin, CSKH, Manager"],
        Some(("fullName", SortOrder::Asc)),
    )
    .await?;
    ensure!(total == 3);
    ensure!(ids == [8, 3, 1], "sorted by name, got {ids:?}");

    // Criteria AND together. An unknown field, an ordering operator on text and
    // an unconvertible value are each ignored rather than rejected.
    let (total, ids) = ids_for(
        &source,
        &[
            "role:in:Admin,CSKH",
            "isEmailVerified:eq:TRUE",
            "nickname:eq:x",
            "fullName:gt:abc",
            "id:gte:four",
        ],
        Some(("id", SortOrder::Asc)),
    )
    .await?;
    ensure!(total == 2 && ids == [1, 8], "got {ids:?}");

    // Null tests need no value.
    let (total, _) = ids_for(&source, &["phoneNumber:isnull"], None).await?;
    ensure!(total == 3);
    let (total, _) = ids_for(&source, &["dateOfBirth:IsNotNull"], None).await?;
    ensure!(total == 5);

    // Ranges on numbers, and case-insensitive suffixes on text.
    let (total, ids) = ids_for(&source, &["id:gte:4", "id:lessthan:8"], Some(("id", SortOrder::Asc))).await?;
    ensure!(total == 4 && ids == [4, 5, 6, 7]);
    let (total, _) = ids_for(&source, &["email:endswith:@GMAIL.com"], None).await?;
    ensure!(total == 5);

    // Text equality is exact.
    let (total, _) = ids_for(&source, &["fullName:equals:vu thu ha"], None).await?;
    ensure!(total == 0);
    let (total, _) = ids_for(&source, &["fullName:equals:Vu Thu Ha"], None).await?;
    ensure!(total == 1);

    // Unknown sort field: source order is kept.
    let (_, ids) = ids_for(&source, &["gender:eq:male"], Some(("favouriteColour", SortOrder::Asc))).await?;
    ensure!(ids == [1, 3, 5, 9], "got {ids:?}");

    Ok(())
}
