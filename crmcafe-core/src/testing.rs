use crate::{
    build_pagination, quote_ident, ColumnKind, ColumnSpec, CrmError, FilterMap, FilterValue,
    LinkRepository, PageRequest, Repository, SqlValue, TableSpec, UpdatePayload,
};
use serde_json::json;

/// Table shape every certified [`Repository`] is exercised against.
///
/// ```sql
/// item_id BIGSERIAL PRIMARY KEY, name TEXT, rank BIGINT,
/// active BOOLEAN NOT NULL DEFAULT TRUE
/// ```
pub fn cert_table(name: &str) -> TableSpec {
    TableSpec::new(name, "item_id")
        .column(ColumnSpec::new("name", ColumnKind::Text))
        .column(ColumnSpec::new("rank", ColumnKind::Int))
        .column(ColumnSpec::new("active", ColumnKind::Bool))
}

fn item(name: &str, rank: i64) -> UpdatePayload {
    UpdatePayload::new().set("name", name).set("rank", rank)
}

fn col(name: &str) -> String {
    quote_ident(name)
}

fn id_of(row: &crate::Record) -> i64 {
    row.get("item_id").and_then(|v| v.as_i64()).unwrap()
}

async fn seed(repo: &dyn Repository, items: &[(&str, i64)]) -> Vec<i64> {
    let mut ids = Vec::new();
    for (name, rank) in items {
        ids.push(id_of(&repo.create(&item(name, *rank)).await.unwrap()));
    }
    ids
}

// ---- Repository Certification Tests ----

pub async fn test_create_should_store_and_return_row(repo: &dyn Repository) {
    let row = repo.create(&item("alpha", 1)).await.unwrap();

    assert!(id_of(&row) > 0);
    assert_eq!(row.get("name").unwrap(), &json!("alpha"));
    assert_eq!(row.get("rank").unwrap(), &json!(1));
    assert_eq!(row.get("active").unwrap(), &json!(true));
}

pub async fn test_create_should_write_explicit_nulls(repo: &dyn Repository) {
    let payload = UpdatePayload::new()
        .set("name", "nulls")
        .set_null("rank", ColumnKind::Int);
    let row = repo.create(&payload).await.unwrap();
    assert_eq!(row.get("rank").unwrap(), &json!(null));
}

pub async fn test_read_should_retrieve_existing_row(repo: &dyn Repository) {
    let created = repo.create(&item("read me", 2)).await.unwrap();

    let found = repo.read(id_of(&created)).await.unwrap().unwrap();
    assert_eq!(found.get("name").unwrap(), &json!("read me"));

    assert!(repo.read(i64::MAX).await.unwrap().is_none());
}

pub async fn test_list_should_count_and_page(repo: &dyn Repository) {
    seed(repo, &[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]).await;

    let filters = FilterMap::new().with(col("rank"), FilterValue::list([2i64, 3, 4]));

    let first = build_pagination(PageRequest::new(Some(1), Some(2)));
    let page = repo.list(&filters, first).await.unwrap();
    assert_eq!(page.total, 3);
    let names: Vec<_> = page.data.iter().map(|r| r["name"].clone()).collect();
    assert_eq!(names, vec![json!("b"), json!("c")]);

    let second = build_pagination(PageRequest::new(Some(2), Some(2)));
    let page = repo.list(&filters, second).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0]["name"], json!("d"));
}

pub async fn test_list_without_filters_returns_everything(repo: &dyn Repository) {
    seed(repo, &[("x", 1), ("y", 2)]).await;

    let page = repo
        .list(&FilterMap::new(), build_pagination(PageRequest::default()))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.data.len(), 2);
}

pub async fn test_list_should_match_wildcards_case_insensitively(repo: &dyn Repository) {
    seed(repo, &[("Wild One", 1), ("wild two", 2), ("tame", 3)]).await;

    let filters = FilterMap::new().with(col("name"), "WILD*");
    let page = repo
        .list(&filters, build_pagination(PageRequest::default()))
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let filters = FilterMap::new().with(col("name"), "*a*");
    let page = repo
        .list(&filters, build_pagination(PageRequest::default()))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0]["name"], json!("tame"));
}

pub async fn test_list_should_combine_filter_kinds(repo: &dyn Repository) {
    seed(
        repo,
        &[("keep-1", 1), ("keep-2", 2), ("skip-3", 3), ("keep-4", 4)],
    )
    .await;

    let filters = FilterMap::new()
        .with(col("name"), "keep*")
        .with(col("rank"), FilterValue::list([1i64, 4, 3]))
        .with(col("active"), true)
        .with(col("unused"), FilterValue::Null);
    let page = repo
        .list(&filters, build_pagination(PageRequest::default()))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let ranks: Vec<_> = page.data.iter().map(|r| r["rank"].clone()).collect();
    assert_eq!(ranks, vec![json!(1), json!(4)]);
}

pub async fn test_update_should_change_only_present_fields(repo: &dyn Repository) {
    let created = repo.create(&item("before", 1)).await.unwrap();
    let id = id_of(&created);

    let changes = UpdatePayload::new().absent("name").set("rank", 10i64);
    let updated = repo.update(id, &changes).await.unwrap().unwrap();
    assert_eq!(updated.get("name").unwrap(), &json!("before"));
    assert_eq!(updated.get("rank").unwrap(), &json!(10));

    let changes = UpdatePayload::new().set_null("name", ColumnKind::Text);
    let updated = repo.update(id, &changes).await.unwrap().unwrap();
    assert_eq!(updated.get("name").unwrap(), &json!(null));
}

pub async fn test_update_without_fields_should_be_rejected(repo: &dyn Repository) {
    let created = repo.create(&item("untouched", 1)).await.unwrap();

    let result = repo
        .update(id_of(&created), &UpdatePayload::new().absent("name"))
        .await;
    assert!(matches!(result, Err(CrmError::Validation(_))));
}

pub async fn test_update_missing_row_returns_none(repo: &dyn Repository) {
    let changes = UpdatePayload::new().set("rank", SqlValue::Int(1));
    assert!(repo.update(i64::MAX, &changes).await.unwrap().is_none());
}

pub async fn test_remove_should_delete_row(repo: &dyn Repository) {
    let created = repo.create(&item("doomed", 1)).await.unwrap();
    let id = id_of(&created);

    assert!(repo.remove(id).await.unwrap());
    assert!(repo.read(id).await.unwrap().is_none());
    assert!(!repo.remove(id).await.unwrap());
}

// ---- Link Repository Certification Tests ----

pub async fn test_link_should_be_idempotent(repo: &dyn LinkRepository) {
    let first = repo.link(1, 2).await.unwrap();
    assert!(first.is_some());

    let again = repo.link(1, 2).await.unwrap();
    assert!(again.is_none());

    repo.link(1, 3).await.unwrap();
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

pub async fn test_unlink_should_remove_pair(repo: &dyn LinkRepository) {
    repo.link(5, 6).await.unwrap();

    assert!(repo.unlink(5, 6).await.unwrap());
    assert!(!repo.unlink(5, 6).await.unwrap());
    assert!(repo.list().await.unwrap().is_empty());
}
