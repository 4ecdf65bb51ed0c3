//! Tier 5: property-based invariants

use crate::test_utils::*;
use memrepo::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_cat() -> impl Strategy<Value = Cat> {
    (
        0i64..50,
        proptest::option::of("[A-Z][a-z]{0,6}"),
        0u32..40,
        proptest::option::of(1990i32..2024),
    )
        .prop_map(|(id, name, weight, year)| Cat {
            id,
            name,
            weight: f64::from(weight) / 2.0,
            birth_date: year.map(|y| date(y, 1, 1)),
        })
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        Just(Filter::is_null("name")),
        Just(Filter::is_not_null("birth_date")),
        (0u32..40).prop_map(|w| Filter::ge("weight", f64::from(w) / 2.0)),
        (0u32..40).prop_map(|w| Filter::lt("weight", f64::from(w) / 2.0)),
        (0i64..50).prop_map(|id| Filter::ne("id", id)),
        "[A-Z][a-z]{0,2}".prop_map(|n| Filter::is_in("name", [n, "Murka".to_string()])),
    ]
}

proptest! {
    #[test]
    fn count_equals_fetch_len(
        cats in proptest::collection::vec(arb_cat(), 0..60),
        filters in proptest::collection::vec(arb_filter(), 0..3),
    ) {
        let repo: InMemoryRepository<Cat> = InMemoryRepository::new();
        repo.ingest_all(cats, false);
        let set = FilterSet::from(filters);
        prop_assert_eq!(
            repo.instant_count(Some(&set)).unwrap(),
            repo.instant_fetch(Some(&set), None).unwrap().len()
        );
    }

    #[test]
    fn null_checks_partition(cats in proptest::collection::vec(arb_cat(), 0..60)) {
        let repo: InMemoryRepository<Cat> = InMemoryRepository::new();
        repo.ingest_all(cats, false);
        let all: BTreeSet<i64> = ids(&repo.instant_fetch(None, None).unwrap()).into_iter().collect();
        for field in ["name", "birth_date"] {
            let fetch_ids = |filter: Filter| -> BTreeSet<i64> {
                ids(&repo.instant_fetch(Some(&FilterSet::from(filter)), None).unwrap())
                    .into_iter()
                    .collect()
            };
            let nulls = fetch_ids(Filter::is_null(field));
            let others = fetch_ids(Filter::is_not_null(field));
            prop_assert!(nulls.is_disjoint(&others), "{} in both sets", field);
            let union: BTreeSet<i64> = nulls.union(&others).copied().collect();
            prop_assert_eq!(&union, &all);
        }
    }

    #[test]
    fn identity_is_unique(cats in proptest::collection::vec(arb_cat(), 0..60)) {
        let repo: InMemoryRepository<Cat> = InMemoryRepository::new();
        let mut distinct: Vec<i64> = cats.iter().map(|c| c.id).collect();
        distinct.sort_unstable();
        distinct.dedup();

        repo.ingest_all(cats.clone(), false);
        prop_assert_eq!(repo.len(), distinct.len());

        // Ingesting again changes nothing
        let before = repo.instant_fetch(None, None).unwrap();
        repo.ingest_all(cats, false);
        let after = repo.instant_fetch(None, None).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn remove_complements_count(
        cats in proptest::collection::vec(arb_cat(), 1..60),
        filter in arb_filter(),
    ) {
        let repo: InMemoryRepository<Cat> = InMemoryRepository::new();
        repo.ingest_all(cats, false);
        let set = FilterSet::from(filter);
        let total = repo.len();
        let matching = repo.instant_count(Some(&set)).unwrap();
        prop_assert_eq!(repo.remove(Some(&set)).unwrap(), matching);
        prop_assert_eq!(repo.len(), total - matching);
        prop_assert_eq!(repo.instant_count(Some(&set)).unwrap(), 0);
    }

    #[test]
    fn sorted_fetch_is_a_permutation(
        cats in proptest::collection::vec(arb_cat(), 0..60),
        descending in any::<bool>(),
    ) {
        let repo: InMemoryRepository<Cat> = InMemoryRepository::new();
        repo.ingest_all(cats, false);
        let sort = if descending { Sort::desc("weight") } else { Sort::asc("weight") };
        let sorted = repo.instant_fetch(None, Some(&SortSpec::from(sort))).unwrap();

        let mut sorted_ids = ids(&sorted);
        let mut stored_ids = ids(&repo.instant_fetch(None, None).unwrap());
        sorted_ids.sort_unstable();
        stored_ids.sort_unstable();
        prop_assert_eq!(sorted_ids, stored_ids);

        for pair in sorted.windows(2) {
            if descending {
                prop_assert!(pair[0].weight >= pair[1].weight);
            } else {
                prop_assert!(pair[0].weight <= pair[1].weight);
            }
        }
    }
}
