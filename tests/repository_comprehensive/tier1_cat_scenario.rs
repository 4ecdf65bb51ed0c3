//! Tier 1: filter semantics over the sample cats

use crate::test_utils::*;
use memrepo::prelude::*;

fn repo() -> InMemoryRepository<Cat> {
    init_tracing();
    sample_repo(CopyPolicy::default())
}

#[test]
fn count_without_filters() {
    let repo = repo();
    assert_eq!(repo.instant_count(None).unwrap(), 6);
    assert_eq!(repo.instant_count(Some(&FilterSet::new())).unwrap(), 6);
}

#[test]
fn not_null_name() {
    let repo = repo();
    let filters = FilterSet::from(Filter::is_not_null("name"));
    assert_eq!(repo.instant_count(Some(&filters)).unwrap(), 5);
}

#[test]
fn equal_compares_numbers_naturally() {
    let repo = repo();
    // Int operand against a Float field
    let filters = FilterSet::from(Filter::eq("weight", 12));
    let found = repo.instant_fetch(Some(&filters), None).unwrap();
    assert_eq!(ids(&found), vec![1]);
}

#[test]
fn null_and_not_null_partition_the_store() {
    let repo = repo();
    for field in ["name", "birth_date"] {
        let nulls = repo
            .instant_count(Some(&FilterSet::from(Filter::is_null(field))))
            .unwrap();
        let non_nulls = repo
            .instant_count(Some(&FilterSet::from(Filter::is_not_null(field))))
            .unwrap();
        assert_eq!(nulls + non_nulls, 6, "partition broken for {field}");

        let null_ids = ids(&repo.instant_fetch(Some(&FilterSet::from(Filter::is_null(field))), None).unwrap());
        let other_ids = ids(&repo.instant_fetch(Some(&FilterSet::from(Filter::is_not_null(field))), None).unwrap());
        assert!(null_ids.iter().all(|id| !other_ids.contains(id)), "{field} ids in both sets");
    }
}

#[test]
fn nan_weight_does_not_break_ordering_queries() {
    let repo = repo();
    repo.ingest(cat(7, Some("Ghost"), f64::NAN, None));

    // 12, 6, 4.5, 4.5 and NaN, which orders above every number
    let heavy = FilterSet::from(Filter::ge("weight", 4.0));
    assert_eq!(repo.instant_count(Some(&heavy)).unwrap(), 5);

    let by_weight = SortSpec::from(Sort::asc("weight"));
    let sorted = repo.instant_fetch(None, Some(&by_weight)).unwrap();
    assert_eq!(ids(&sorted), vec![2, 6, 3, 5, 4, 1, 7]);
}

#[test]
fn in_list() {
    let repo = repo();
    let filters = FilterSet::from(Filter::is_in("name", ["Alisa", "Qweqwe", "ZZZzzz"]));
    let found = repo.instant_fetch(Some(&filters), None).unwrap();
    assert_eq!(ids(&found), vec![2, 4]);
}

#[test]
fn timestamp_ordering_skips_nulls() {
    let repo = repo();
    let filters = FilterSet::from(Filter::ge("birth_date", date(2001, 1, 1)));
    assert_eq!(repo.instant_count(Some(&filters)).unwrap(), 3);

    let before = FilterSet::from(Filter::lt("birth_date", date(2001, 1, 1)));
    assert_eq!(repo.instant_count(Some(&before)).unwrap(), 1);
}

#[test]
fn lower_or_equal_includes_boundary() {
    let repo = repo();
    let filters = FilterSet::from(Filter::le("weight", 4.5));
    let found = repo.instant_fetch(Some(&filters), None).unwrap();
    assert_eq!(ids(&found), vec![2, 3, 5, 6]);
}

#[test]
fn conjunction_of_filters() {
    let repo = repo();
    let filters = FilterSet::new()
        .add_filter(Filter::is_not_null("birth_date"))
        .add_filter(Filter::gt("weight", 3))
        .add_filter(Filter::ne("name", "Vasya"));
    let found = repo.instant_fetch(Some(&filters), None).unwrap();
    assert_eq!(ids(&found), vec![3, 5]);
}

#[test]
fn count_matches_fetch_length() {
    let repo = repo();
    let sets = [
        FilterSet::from(Filter::is_null("name")),
        FilterSet::from(Filter::gt("weight", 4)),
        FilterSet::from(Filter::is_in("name", ["Murka", "Octocat"])),
        FilterSet::from(Filter::eq("weight", 100)),
    ];
    for filters in &sets {
        assert_eq!(
            repo.instant_count(Some(filters)).unwrap(),
            repo.instant_fetch(Some(filters), None).unwrap().len()
        );
    }
}

#[test]
fn filters_from_json() {
    let repo = repo();
    let filters: FilterSet = serde_json::from_str(
        r#"[
            {"field": "birth_date", "check": ">=", "operand": "2001-01-01T00:00:00Z"},
            {"field": "weight", "check": "eq", "operand": 4.5}
        ]"#,
    )
    .unwrap();
    let found = repo.instant_fetch(Some(&filters), None).unwrap();
    assert_eq!(ids(&found), vec![3, 5]);
}

#[test]
fn sorted_fetch() {
    let repo = repo();
    let spec = SortSpec::new()
        .add_sort(Sort::asc("weight"))
        .add_sort(Sort::desc("name"));
    let found = repo.instant_fetch(None, Some(&spec)).unwrap();
    assert_eq!(ids(&found), vec![2, 6, 5, 3, 4, 1]);

    let by_birth = SortSpec::from(Sort::desc("birth_date"));
    let found = repo.instant_fetch(None, Some(&by_birth)).unwrap();
    // Nulls first when descending, in store order
    assert_eq!(ids(&found), vec![4, 6, 5, 3, 2, 1]);
}

#[test]
fn first_follows_sort() {
    let repo = repo();
    let heaviest = SortSpec::from(Sort::desc("weight"));
    let first = repo.instant_first(None, Some(&heaviest)).unwrap().unwrap();
    assert_eq!(first.id, 1);

    let nameless = FilterSet::from(Filter::is_null("name"));
    assert_eq!(repo.instant_first(Some(&nameless), None).unwrap().unwrap().id, 6);
}

#[test]
fn errors_surface_to_caller() {
    let repo = repo();
    let unknown = FilterSet::from(Filter::eq("color", "black"));
    assert!(matches!(
        repo.instant_count(Some(&unknown)),
        Err(RepoError::FieldNotFound { .. })
    ));

    let mismatch = FilterSet::from(Filter::gt("name", 3));
    assert!(matches!(
        repo.instant_fetch(Some(&mismatch), None),
        Err(RepoError::TypeMismatch { .. })
    ));

    assert!(matches!(
        Filter::parse("name", "like", "V%"),
        Err(RepoError::UnsupportedOperator { .. })
    ));
}
