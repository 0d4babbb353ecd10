//! Dashboard aggregations.
//!
//! Every aggregation is a pure function over a record slice and returns an
//! ordered vector, ready to feed a chart. Fixed axes (statuses, categories,
//! months, age buckets) always produce every slot, including zero counts.

use crate::month::month_index;
use crate::{
    month_code, AgeBucket, Collaborator, Delegation, MaintenanceType, Product, ProductCategory,
    ProductStatus, RegionLookup, Timestamp, MONTH_CODES,
};
use serde::{Deserialize, Serialize};

/// A labelled count on a chart axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count<K> {
    pub key: K,
    pub count: usize,
}

impl<K> Count<K> {
    fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

/// Preventive and corrective intervention counts for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MaintenanceMonth {
    /// Two-digit month code.
    pub month: String,
    pub preventive: usize,
    pub corrective: usize,
}

impl MaintenanceMonth {
    pub fn total(&self) -> usize {
        self.preventive + self.corrective
    }
}

pub fn count_by_status(products: &[Product]) -> Vec<Count<ProductStatus>> {
    ProductStatus::ALL
        .into_iter()
        .map(|status| {
            let n = products.iter().filter(|p| p.status == status).count();
            Count::new(status, n)
        })
        .collect()
}

pub fn count_by_category(products: &[Product]) -> Vec<Count<ProductCategory>> {
    ProductCategory::ALL
        .into_iter()
        .map(|category| {
            let n = products.iter().filter(|p| p.category == category).count();
            Count::new(category, n)
        })
        .collect()
}

/// Twelve slots keyed "01".."12", from the stored acquisition month.
///
/// Products whose stored month is missing fall back to the month of their
/// acquisition date. Values outside "01".."12" are skipped.
pub fn count_by_acquisition_month(products: &[Product]) -> Vec<Count<String>> {
    let mut slots = [0usize; 12];
    for product in products {
        let code = product
            .acquisition_month
            .clone()
            .unwrap_or_else(|| month_code(&product.acquisition_date));
        match month_index(&code) {
            Some(idx) => slots[idx] += 1,
            None => tracing::warn!(
                product_id = %product.id,
                month = %code,
                "acquisition month out of range, skipped"
            ),
        }
    }
    MONTH_CODES
        .iter()
        .zip(slots)
        .map(|(code, n)| Count::new(code.to_string(), n))
        .collect()
}

/// Six slots in bucket order.
pub fn count_by_age(products: &[Product], now: &Timestamp) -> Vec<Count<AgeBucket>> {
    let mut slots = [0usize; 6];
    for product in products {
        let bucket = AgeBucket::for_acquisition(&product.acquisition_date, now);
        slots[bucket as usize] += 1;
    }
    AgeBucket::ALL
        .into_iter()
        .zip(slots)
        .map(|(bucket, n)| Count::new(bucket, n))
        .collect()
}

/// One slot per known region, in the lookup's order.
///
/// Products whose delegation belongs to no region are not counted.
pub fn count_by_region<R: RegionLookup + ?Sized>(
    products: &[Product],
    regions: &R,
) -> Vec<Count<String>> {
    regions
        .regions()
        .into_iter()
        .map(|region| {
            let n = match regions.delegations(region) {
                Some(ids) => products
                    .iter()
                    .filter(|p| p.delegation_id.as_deref().is_some_and(|id| ids.contains(id)))
                    .count(),
                None => 0,
            };
            Count::new(region.to_string(), n)
        })
        .collect()
}

/// Preventive/corrective totals per intervention month, twelve slots.
pub fn maintenance_history(products: &[Product]) -> Vec<MaintenanceMonth> {
    let mut history: Vec<MaintenanceMonth> = MONTH_CODES
        .iter()
        .map(|code| MaintenanceMonth {
            month: code.to_string(),
            preventive: 0,
            corrective: 0,
        })
        .collect();

    for intervention in products.iter().flat_map(|p| p.interventions.iter()) {
        if let Some(idx) = month_index(&month_code(&intervention.date)) {
            let slot = &mut history[idx];
            match intervention.maintenance_type {
                MaintenanceType::Preventive => slot.preventive += 1,
                MaintenanceType::Corrective => slot.corrective += 1,
            }
        }
    }
    history
}

/// Collaborator headcount for each delegation, in delegation order.
pub fn collaborators_per_delegation(
    delegations: &[Delegation],
    collaborators: &[Collaborator],
) -> Vec<Count<String>> {
    delegations
        .iter()
        .map(|delegation| {
            let n = collaborators
                .iter()
                .filter(|c| c.delegation_id.as_deref() == Some(delegation.id.as_str()))
                .count();
            Count::new(delegation.name.clone(), n)
        })
        .collect()
}

/// Products whose warranty has expired at `now`.
pub fn expired_warranties(products: &[Product], now: &Timestamp) -> usize {
    products.iter().filter(|p| !p.under_warranty(now)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Intervention, RegionTable};
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn product(
        id: &str,
        status: ProductStatus,
        category: ProductCategory,
        age_days: i64,
    ) -> Product {
        let acquired = now() - Duration::days(age_days);
        Product {
            id: id.to_string(),
            status,
            category,
            model: "X".to_string(),
            brand: "Y".to_string(),
            part_number: String::new(),
            serial_number: String::new(),
            location: String::new(),
            responsible: String::new(),
            acquisition_date: acquired,
            warranty_limit: acquired + Duration::days(365),
            company_id: None,
            delegation_id: None,
            branch_id: None,
            interventions: Vec::new(),
            acquisition_month: Some(month_code(&acquired)),
            acquisition_year: None,
            department: None,
            company_name: None,
            delegation_name: None,
            branch_name: None,
        }
    }

    fn intervention(month: u32, kind: MaintenanceType) -> Intervention {
        Intervention {
            id: format!("i{month}"),
            date: Utc.with_ymd_and_hms(2024, month, 3, 0, 0, 0).unwrap(),
            description: String::new(),
            technician: String::new(),
            status: String::new(),
            maintenance_type: kind,
            observations: String::new(),
        }
    }

    #[test]
    fn test_count_by_status_covers_all_statuses() {
        let products = vec![
            product("a", ProductStatus::Available, ProductCategory::Computing, 10),
            product("b", ProductStatus::Available, ProductCategory::Network, 10),
            product("c", ProductStatus::Lost, ProductCategory::Network, 10),
        ];
        let counts = count_by_status(&products);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], Count::new(ProductStatus::Available, 2));
        assert_eq!(counts[1].count, 0);
        assert_eq!(counts[3], Count::new(ProductStatus::Lost, 1));
    }

    #[test]
    fn test_count_by_category() {
        let products = vec![
            product("a", ProductStatus::Available, ProductCategory::Network, 10),
            product("b", ProductStatus::Available, ProductCategory::Network, 10),
        ];
        let counts = count_by_category(&products);
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[1], Count::new(ProductCategory::Network, 2));
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_count_by_acquisition_month_uses_stored_code() {
        let mut a = product("a", ProductStatus::Available, ProductCategory::Computing, 10);
        a.acquisition_month = Some("02".to_string());
        let mut b = product("b", ProductStatus::Available, ProductCategory::Computing, 10);
        b.acquisition_month = None;
        let mut c = product("c", ProductStatus::Available, ProductCategory::Computing, 10);
        c.acquisition_month = Some("99".to_string());

        let counts = count_by_acquisition_month(&[a, b.clone(), c]);
        assert_eq!(counts.len(), 12);
        assert_eq!(counts[1], Count::new("02".to_string(), 1));
        let fallback = month_index(&month_code(&b.acquisition_date)).unwrap();
        assert_eq!(counts[fallback].count, 1);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_count_by_age() {
        let products = vec![
            product("a", ProductStatus::Available, ProductCategory::Computing, 30),
            product("b", ProductStatus::Available, ProductCategory::Computing, 400),
            product("c", ProductStatus::Available, ProductCategory::Computing, 3000),
        ];
        let counts = count_by_age(&products, &now());
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[0], Count::new(AgeBucket::UnderOne, 1));
        assert_eq!(counts[1], Count::new(AgeBucket::OneToTwo, 1));
        assert_eq!(counts[5], Count::new(AgeBucket::FiveOrMore, 1));
    }

    #[test]
    fn test_count_by_region() {
        let mut south = product("a", ProductStatus::Available, ProductCategory::Computing, 10);
        south.delegation_id = Some("4".to_string());
        let mut southeast = product("b", ProductStatus::Available, ProductCategory::Computing, 10);
        southeast.delegation_id = Some("2".to_string());
        let orphan = product("c", ProductStatus::Available, ProductCategory::Computing, 10);

        let counts = count_by_region(&[south, southeast, orphan], &RegionTable::default());
        assert_eq!(counts.len(), 5);
        let sul = counts.iter().find(|c| c.key == "Sul").unwrap();
        assert_eq!(sul.count, 1);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_maintenance_history_splits_by_type() {
        let mut a = product("a", ProductStatus::Maintenance, ProductCategory::Printing, 10);
        a.interventions = vec![
            intervention(3, MaintenanceType::Preventive),
            intervention(3, MaintenanceType::Corrective),
        ];
        let mut b = product("b", ProductStatus::Maintenance, ProductCategory::Printing, 10);
        b.interventions = vec![intervention(3, MaintenanceType::Corrective)];

        let history = maintenance_history(&[a, b]);
        assert_eq!(history.len(), 12);
        assert_eq!(history[2].month, "03");
        assert_eq!(history[2].preventive, 1);
        assert_eq!(history[2].corrective, 2);
        assert_eq!(history[2].total(), 3);
        assert_eq!(history[0].total(), 0);
    }

    #[test]
    fn test_collaborators_per_delegation() {
        let delegation = |id: &str, name: &str| Delegation {
            id: id.to_string(),
            company_id: None,
            name: name.to_string(),
            region: String::new(),
            manager: String::new(),
            branch_count: 0,
            employee_count: 0,
            equipment_count: 0,
        };
        let collaborator = |id: &str, delegation_id: Option<&str>| Collaborator {
            id: id.to_string(),
            company_id: None,
            delegation_id: delegation_id.map(str::to_string),
            branch_id: None,
            name: String::new(),
            position: String::new(),
            email: String::new(),
            phone: String::new(),
            products: Vec::new(),
        };
        let counts = collaborators_per_delegation(
            &[delegation("1", "SP"), delegation("2", "RJ")],
            &[
                collaborator("a", Some("1")),
                collaborator("b", Some("1")),
                collaborator("c", None),
            ],
        );
        assert_eq!(counts, vec![Count::new("SP".to_string(), 2), Count::new("RJ".to_string(), 0)]);
    }

    #[test]
    fn test_expired_warranties() {
        let products = vec![
            product("a", ProductStatus::Available, ProductCategory::Computing, 10),
            product("b", ProductStatus::Available, ProductCategory::Computing, 800),
        ];
        assert_eq!(expired_warranties(&products, &now()), 1);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Status and age slots each account for every product once.
        #[test]
        fn prop_fixed_axes_sum_to_total(
            specs in prop::collection::vec((0usize..4, 0i64..4000), 0..40)
        ) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            let products: Vec<Product> = specs
                .iter()
                .enumerate()
                .map(|(i, (status, age_days))| {
                    let acquired = now - Duration::days(*age_days);
                    Product {
                        id: i.to_string(),
                        status: ProductStatus::ALL[*status],
                        category: ProductCategory::Computing,
                        model: String::new(),
                        brand: String::new(),
                        part_number: String::new(),
                        serial_number: String::new(),
                        location: String::new(),
                        responsible: String::new(),
                        acquisition_date: acquired,
                        warranty_limit: acquired,
                        company_id: None,
                        delegation_id: None,
                        branch_id: None,
                        interventions: Vec::new(),
                        acquisition_month: None,
                        acquisition_year: None,
                        department: None,
                        company_name: None,
                        delegation_name: None,
                        branch_name: None,
                    }
                })
                .collect();

            let by_status: usize = count_by_status(&products).iter().map(|c| c.count).sum();
            let by_age: usize = count_by_age(&products, &now).iter().map(|c| c.count).sum();
            let by_month: usize = count_by_acquisition_month(&products)
                .iter()
                .map(|c| c.count)
                .sum();
            prop_assert_eq!(by_status, products.len());
            prop_assert_eq!(by_age, products.len());
            prop_assert_eq!(by_month, products.len());
        }
    }
}
