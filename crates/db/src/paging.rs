//! Generic offset pagination over any SeaORM select.
//!
//! Works for plain `Select<E>` as well as the `SelectTwo` produced by
//! `find_also_related`/`find_also_linked`, so joined listings page the same
//! way as single-table ones.

use sea_orm::{
    ColumnTrait, ConnectionTrait, ItemsAndPagesNumber, Order, PaginatorTrait, QueryOrder,
    SelectorTrait,
};
use vidtube_common::{AppError, AppResult, Page, PageRequest, SortDirection};

/// Count the matches of `select`, then fetch the requested slice.
///
/// A page past the end yields an empty `items` list rather than an error.
pub async fn fetch_page<'db, C, S>(
    db: &'db C,
    select: S,
    request: PageRequest,
) -> AppResult<Page<<S::Selector as SelectorTrait>::Item>>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let paginator = select.paginate(db, request.limit());

    let ItemsAndPagesNumber {
        number_of_items, ..
    } = paginator
        .num_items_and_pages()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if request.offset() >= number_of_items {
        return Ok(Page::new(Vec::new(), request, number_of_items));
    }

    let items = paginator
        .fetch_page(request.page() - 1)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Page::new(items, request, number_of_items))
}

/// Order by `column`, then by `id` in the same direction.
///
/// IDs are ULIDs, so the tie-breaker keeps pages stable when many rows share
/// the primary sort key.
pub fn order_with_tiebreak<Q, C, I>(query: Q, column: C, id: I, direction: SortDirection) -> Q
where
    Q: QueryOrder,
    C: ColumnTrait,
    I: ColumnTrait,
{
    let order = match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };
    query.order_by(column, order.clone()).order_by(id, order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{Tweet, tweet};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, QueryTrait, Value};

    fn tweet(id: &str) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            content: format!("tweet {id}"),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_fetch_page_metadata() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(5)]])
            .append_query_results([[tweet("a"), tweet("b")]])
            .into_connection();

        let request = PageRequest::new(1, 2).unwrap();
        let page = fetch_page(&db, Tweet::find(), request).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(!page.has_prev_page);
    }

    #[tokio::test]
    async fn test_fetch_page_beyond_end_is_empty() {
        // Only the count query runs.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .into_connection();

        let request = PageRequest::new(4, 2).unwrap();
        let page = fetch_page(&db, Tweet::find(), request).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_fetch_page_empty_match_set() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(0)]])
            .into_connection();

        let page = fetch_page(&db, Tweet::find(), PageRequest::default())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_order_with_tiebreak_appends_id() {
        let sql = order_with_tiebreak(
            Tweet::find(),
            tweet::Column::CreatedAt,
            tweet::Column::Id,
            SortDirection::Desc,
        )
        .build(DatabaseBackend::Postgres)
        .to_string();

        assert!(
            sql.ends_with(r#"ORDER BY "tweet"."created_at" DESC, "tweet"."id" DESC"#),
            "unexpected SQL: {sql}"
        );
    }
}
