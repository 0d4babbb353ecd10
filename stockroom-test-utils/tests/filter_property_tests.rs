use proptest::prelude::*;
use stockroom_core::{
    filter_products, stats, AgeBucket, MaintenanceType, ProductFilter, ProductStatus, RegionLookup,
    RegionTable,
};
use stockroom_test_utils::assertions::{assert_not_found, assert_ok, assert_ordered_subset};
use stockroom_test_utils::fixtures;
use stockroom_test_utils::generators::{
    arb_delegation_id, arb_product_filter, arb_product_status, arb_products, arb_region,
};
use stockroom_test_utils::{reference_now, EntityType, InventoryStore};

#[test]
fn region_sul_selects_porto_alegre_stock() {
    let now = reference_now();
    let products = fixtures::products();
    let out = filter_products(
        &products,
        &ProductFilter::new().with_region("Sul"),
        &RegionTable::default(),
        &now,
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].delegation_id.as_deref(), Some("4"));
}

#[test]
fn uppercase_search_finds_dell() {
    let now = reference_now();
    let products = fixtures::products();
    let out = filter_products(
        &products,
        &ProductFilter::new().with_search("DELL"),
        &RegionTable::default(),
        &now,
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].brand, "Dell");
}

#[test]
fn maintenance_month_over_seed_data() {
    let now = reference_now();
    let products = fixtures::products();
    let out = filter_products(
        &products,
        &ProductFilter::new().with_maintenance_month("05"),
        &RegionTable::default(),
        &now,
    );
    let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn filter_from_query_params_over_store() {
    let store = fixtures::seeded_store().unwrap();
    let config = fixtures::default_config();
    let filter = ProductFilter::from_params([("delegationId", "1"), ("status", "in_use")]);
    let out = store
        .query_products(&filter, &config.regions, &reference_now())
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].model, "Latitude 5420");
}

#[test]
fn deleting_intervention_touches_only_its_product() {
    let store = fixtures::seeded_store().unwrap();
    let before = store.list_products().unwrap();

    assert_ok(&store.delete_intervention("1", "1"));

    let after = store.list_products().unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        if old.id == "1" {
            assert_eq!(new.interventions.len(), old.interventions.len() - 1);
            assert!(new.intervention("1").is_none());
            assert!(new.intervention("2").is_some());
        } else {
            assert_eq!(old, new);
        }
    }

    assert_not_found(&store.delete_intervention("1", "1"), EntityType::Intervention);
    assert_not_found(&store.delete_intervention("99", "2"), EntityType::Product);
}

#[test]
fn added_intervention_feeds_maintenance_history() {
    let store = fixtures::seeded_store().unwrap();
    store
        .add_intervention("3", fixtures::new_intervention(8, MaintenanceType::Corrective))
        .unwrap();
    let history = stats::maintenance_history(&store.list_products().unwrap());
    assert_eq!(history[7].month, "08");
    assert_eq!(history[7].corrective, 1);
    assert_eq!(history[4].preventive, 1);
    assert_eq!(history[4].corrective, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Filtering an already-filtered list by the same criteria changes nothing.
    #[test]
    fn filter_is_idempotent(products in arb_products(40), filter in arb_product_filter()) {
        let now = reference_now();
        let regions = RegionTable::default();
        let once = filter_products(&products, &filter, &regions, &now);
        let twice = filter_products(&once, &filter, &regions, &now);
        prop_assert_eq!(once, twice);
    }

    /// Every set criterion can be applied alone, one after another, with the
    /// same result as applying them together.
    #[test]
    fn criteria_compose_independently(
        products in arb_products(40),
        filter in arb_product_filter(),
    ) {
        let now = reference_now();
        let regions = RegionTable::default();
        let combined = filter_products(&products, &filter, &regions, &now);

        let empty = ProductFilter::default;
        let singles = [
            ProductFilter { status: filter.status.clone(), ..empty() },
            ProductFilter { category: filter.category.clone(), ..empty() },
            ProductFilter { acquisition_month: filter.acquisition_month.clone(), ..empty() },
            ProductFilter { maintenance_month: filter.maintenance_month.clone(), ..empty() },
            ProductFilter { age_range: filter.age_range.clone(), ..empty() },
            ProductFilter { region: filter.region.clone(), ..empty() },
            ProductFilter { search_term: filter.search_term.clone(), ..empty() },
        ];
        let mut chained = products.clone();
        for single in &singles {
            chained = filter_products(&chained, single, &regions, &now);
        }
        prop_assert_eq!(combined, chained);
    }

    /// Results keep input order and never invent records.
    #[test]
    fn output_is_ordered_subset(products in arb_products(40), filter in arb_product_filter()) {
        let now = reference_now();
        let out = filter_products(&products, &filter, &RegionTable::default(), &now);
        prop_assert!(out.len() <= products.len());
        assert_ordered_subset(&out, &products);
    }

    /// A delegation passes exactly the region that covers it.
    #[test]
    fn region_resolution_is_exclusive(
        delegation_id in arb_delegation_id(),
        region in arb_region(),
    ) {
        let now = reference_now();
        let regions = RegionTable::default();
        let mut product = fixtures::products().remove(0);
        product.delegation_id = Some(delegation_id.clone());

        let passes = ProductFilter::new()
            .with_region(region.clone())
            .matches(&product, &regions, &now);
        let covering = regions.region_of(&delegation_id);
        prop_assert_eq!(passes, covering == Some(region.as_str()));
    }

    /// Status and age-bucket filters partition the list.
    #[test]
    fn status_and_age_partition(products in arb_products(40), status in arb_product_status()) {
        let now = reference_now();
        let regions = RegionTable::default();

        let count =
            |filter: ProductFilter| filter_products(&products, &filter, &regions, &now).len();

        let total: usize = ProductStatus::ALL
            .iter()
            .map(|s| count(ProductFilter::new().with_status(*s)))
            .sum();
        prop_assert_eq!(total, products.len());

        let total: usize = AgeBucket::ALL
            .iter()
            .map(|b| count(ProductFilter::new().with_age_range(*b)))
            .sum();
        prop_assert_eq!(total, products.len());

        let by_status = stats::count_by_status(&products);
        let slot = by_status.iter().find(|c| c.key == status).map(|c| c.count);
        prop_assert_eq!(slot, Some(count(ProductFilter::new().with_status(status))));
    }

    /// Aggregation axes each account for every product exactly once.
    #[test]
    fn aggregation_totals_match(products in arb_products(40)) {
        let now = reference_now();
        fn total<K>(counts: Vec<stats::Count<K>>) -> usize {
            counts.iter().map(|c| c.count).sum()
        }
        prop_assert_eq!(total(stats::count_by_status(&products)), products.len());
        prop_assert_eq!(total(stats::count_by_category(&products)), products.len());
        prop_assert_eq!(total(stats::count_by_age(&products, &now)), products.len());
        prop_assert_eq!(total(stats::count_by_acquisition_month(&products)), products.len());

        let interventions: usize = products.iter().map(|p| p.interventions.len()).sum();
        let history: usize = stats::maintenance_history(&products).iter().map(|m| m.total()).sum();
        prop_assert_eq!(history, interventions);
    }
}
