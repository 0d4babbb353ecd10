//! Entity filter layer
//!
//! One parameterized filter for every list in the inventory. A filter is a
//! conjunction of optional criteria: a criterion that is `None` or an empty
//! string places no constraint, and the result keeps the input order.
//!
//! Filtering never fails. Criteria that cannot be resolved (an age range or
//! region nobody knows) match nothing and are reported through `tracing`.

use crate::{
    month_label, AgeBucket, Branch, Collaborator, Company, Delegation, Product, ProductCategory,
    ProductStatus, RegionLookup, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// RECORD TRAITS
// ============================================================================

/// Position of a record in the company → delegation → branch hierarchy.
pub trait Scoped {
    fn company_id(&self) -> Option<&str>;
    fn delegation_id(&self) -> Option<&str>;
    fn branch_id(&self) -> Option<&str>;
}

/// Free-text search over a record's string fields.
pub trait Searchable {
    /// The fields a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match against any search field.
    /// `needle` must already be lowercase.
    fn matches_search(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
    }
}

impl Scoped for Product {
    fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn delegation_id(&self) -> Option<&str> {
        self.delegation_id.as_deref()
    }

    fn branch_id(&self) -> Option<&str> {
        self.branch_id.as_deref()
    }
}

/// Every string-typed field of the record, including ones that are never
/// displayed (part and serial numbers, hierarchy ids, derived codes).
impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.status.as_str(),
            self.category.as_str(),
            self.model.as_str(),
            self.brand.as_str(),
            self.part_number.as_str(),
            self.serial_number.as_str(),
            self.location.as_str(),
            self.responsible.as_str(),
        ];
        fields.extend(
            [
                &self.company_id,
                &self.delegation_id,
                &self.branch_id,
                &self.acquisition_month,
                &self.acquisition_year,
                &self.department,
                &self.company_name,
                &self.delegation_name,
                &self.branch_name,
            ]
            .into_iter()
            .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

impl Scoped for Company {
    fn company_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn delegation_id(&self) -> Option<&str> {
        None
    }

    fn branch_id(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Company {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.cnpj, &self.city, &self.state]
    }
}

impl Scoped for Delegation {
    fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn delegation_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn branch_id(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Delegation {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.region, &self.manager]
    }
}

impl Scoped for Branch {
    fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn delegation_id(&self) -> Option<&str> {
        self.delegation_id.as_deref()
    }

    fn branch_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl Searchable for Branch {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.city, &self.country, &self.delegation]
    }
}

impl Scoped for Collaborator {
    fn company_id(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn delegation_id(&self) -> Option<&str> {
        self.delegation_id.as_deref()
    }

    fn branch_id(&self) -> Option<&str> {
        self.branch_id.as_deref()
    }
}

impl Searchable for Collaborator {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.position, &self.email]
    }
}

// ============================================================================
// CRITERIA
// ============================================================================

/// A criterion is set only when it holds a non-empty value.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn scope_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

/// Resolved region criterion.
enum RegionCriterion<'a> {
    Unset,
    Delegations(&'a BTreeSet<String>),
    Unknown,
}

impl RegionCriterion<'_> {
    fn matches(&self, delegation_id: Option<&str>) -> bool {
        match self {
            RegionCriterion::Unset => true,
            RegionCriterion::Delegations(ids) => delegation_id.is_some_and(|id| ids.contains(id)),
            RegionCriterion::Unknown => false,
        }
    }
}

fn resolve_region<'a, R: RegionLookup + ?Sized>(
    region: Option<&str>,
    regions: &'a R,
) -> RegionCriterion<'a> {
    match region {
        None => RegionCriterion::Unset,
        Some(name) => match regions.delegations(name) {
            Some(ids) => RegionCriterion::Delegations(ids),
            None => {
                tracing::warn!(region = name, "unknown region in filter, nothing will match");
                RegionCriterion::Unknown
            }
        },
    }
}

/// Criteria for narrowing a product list.
///
/// Codes are compared exactly against the record (`status` against
/// [`ProductStatus::as_str`], `category` against [`ProductCategory::as_str`]),
/// so an unrecognized code simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductFilter {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub delegation_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Two-digit month matched against the precomputed acquisition month.
    #[serde(default)]
    pub acquisition_month: Option<String>,
    /// Two-digit month; matches when any intervention falls in it.
    #[serde(default)]
    pub maintenance_month: Option<String>,
    /// One of the [`AgeBucket`] labels.
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_delegation(mut self, delegation_id: impl Into<String>) -> Self {
        self.delegation_id = Some(delegation_id.into());
        self
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category.as_str().to_string());
        self
    }

    pub fn with_acquisition_month(mut self, month: impl Into<String>) -> Self {
        self.acquisition_month = Some(month.into());
        self
    }

    pub fn with_maintenance_month(mut self, month: impl Into<String>) -> Self {
        self.maintenance_month = Some(month.into());
        self
    }

    pub fn with_age_range(mut self, bucket: AgeBucket) -> Self {
        self.age_range = Some(bucket.label().to_string());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Build a filter from dashboard query parameters.
    ///
    /// Recognized keys: `companyId`, `delegationId`, `branchId`, `status`,
    /// `month`, `maintenanceMonth`, `category`, `age`, `region`, `search`.
    /// Other keys are ignored; a repeated key keeps its last value.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in params {
            let slot = match key {
                "companyId" => &mut filter.company_id,
                "delegationId" => &mut filter.delegation_id,
                "branchId" => &mut filter.branch_id,
                "status" => &mut filter.status,
                "month" => &mut filter.acquisition_month,
                "maintenanceMonth" => &mut filter.maintenance_month,
                "category" => &mut filter.category,
                "age" => &mut filter.age_range,
                "region" => &mut filter.region,
                "search" => &mut filter.search_term,
                other => {
                    tracing::debug!(key = other, "ignoring unknown filter parameter");
                    continue;
                }
            };
            *slot = Some(value.to_string());
        }
        filter
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        [
            &self.company_id,
            &self.delegation_id,
            &self.branch_id,
            &self.status,
            &self.category,
            &self.acquisition_month,
            &self.maintenance_month,
            &self.age_range,
            &self.region,
            &self.search_term,
        ]
        .into_iter()
        .all(|criterion| active(criterion).is_none())
    }

    fn compile<'a, R: RegionLookup + ?Sized>(
        &'a self,
        regions: &'a R,
    ) -> CompiledProductFilter<'a> {
        let age = active(&self.age_range).map(|label| {
            let bucket = AgeBucket::from_label(label);
            if bucket.is_none() {
                tracing::warn!(
                    age_range = label,
                    "unknown age range in filter, nothing will match"
                );
            }
            bucket
        });
        CompiledProductFilter {
            filter: self,
            age,
            region: resolve_region(active(&self.region), regions),
            needle: active(&self.search_term).map(str::to_lowercase),
        }
    }

    /// Whether a single product satisfies every set criterion.
    pub fn matches<R: RegionLookup + ?Sized>(
        &self,
        product: &Product,
        regions: &R,
        now: &Timestamp,
    ) -> bool {
        self.compile(regions).matches(product, now)
    }

    /// The products satisfying every set criterion, in input order.
    pub fn apply<R: RegionLookup + ?Sized>(
        &self,
        products: &[Product],
        regions: &R,
        now: &Timestamp,
    ) -> Vec<Product> {
        let compiled = self.compile(regions);
        let matched: Vec<Product> = products
            .iter()
            .filter(|product| compiled.matches(product, now))
            .cloned()
            .collect();
        tracing::debug!(
            input = products.len(),
            matched = matched.len(),
            "product filter applied"
        );
        matched
    }

    /// Active display criteria, labelled for a "filtering by" banner.
    ///
    /// Hierarchy ids and the search term are not included.
    pub fn describe(&self) -> Vec<FilterLabel> {
        let mut labels = Vec::new();
        if let Some(status) = active(&self.status) {
            let value = status
                .parse::<ProductStatus>()
                .ok()
                .filter(|parsed| parsed.as_str() == status)
                .map_or_else(|| status.to_string(), |parsed| parsed.label().to_string());
            labels.push(FilterLabel::new("status", value));
        }
        if let Some(month) = active(&self.acquisition_month) {
            let value = month_label(month).map_or_else(|| month.to_string(), str::to_string);
            labels.push(FilterLabel::new("mês de aquisição", value));
        }
        if let Some(month) = active(&self.maintenance_month) {
            let value = month_label(month).map_or_else(|| month.to_string(), str::to_string);
            labels.push(FilterLabel::new("mês de manutenção", value));
        }
        if let Some(category) = active(&self.category) {
            let value = category
                .parse::<ProductCategory>()
                .ok()
                .filter(|parsed| parsed.as_str() == category)
                .map_or_else(|| category.to_string(), |parsed| parsed.label().to_string());
            labels.push(FilterLabel::new("categoria", value));
        }
        if let Some(age) = active(&self.age_range) {
            labels.push(FilterLabel::new("idade", age));
        }
        if let Some(region) = active(&self.region) {
            labels.push(FilterLabel::new("região", region));
        }
        labels
    }
}

struct CompiledProductFilter<'a> {
    filter: &'a ProductFilter,
    /// `Some(None)` is an age range that did not resolve.
    age: Option<Option<AgeBucket>>,
    region: RegionCriterion<'a>,
    needle: Option<String>,
}

impl CompiledProductFilter<'_> {
    fn matches(&self, product: &Product, now: &Timestamp) -> bool {
        let f = self.filter;

        if !scope_matches(active(&f.company_id), product.company_id.as_deref())
            || !scope_matches(active(&f.delegation_id), product.delegation_id.as_deref())
            || !scope_matches(active(&f.branch_id), product.branch_id.as_deref())
        {
            return false;
        }

        if let Some(status) = active(&f.status) {
            if product.status.as_str() != status {
                return false;
            }
        }

        if let Some(category) = active(&f.category) {
            if product.category.as_str() != category {
                return false;
            }
        }

        if let Some(month) = active(&f.acquisition_month) {
            if product.acquisition_month.as_deref() != Some(month) {
                return false;
            }
        }

        if let Some(month) = active(&f.maintenance_month) {
            if !product.has_maintenance_in(month) {
                return false;
            }
        }

        match self.age {
            None => {}
            Some(None) => return false,
            Some(Some(bucket)) => {
                if AgeBucket::for_acquisition(&product.acquisition_date, now) != bucket {
                    return false;
                }
            }
        }

        if !self.region.matches(product.delegation_id.as_deref()) {
            return false;
        }

        match &self.needle {
            Some(needle) => product.matches_search(needle),
            None => true,
        }
    }
}

/// A labelled active criterion, rendered as "Filtrando por {caption}: {value}".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLabel {
    pub caption: String,
    pub value: String,
}

impl FilterLabel {
    fn new(caption: &str, value: impl Into<String>) -> Self {
        Self {
            caption: caption.to_string(),
            value: value.into(),
        }
    }
}

impl fmt::Display for FilterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filtrando por {}: {}", self.caption, self.value)
    }
}

/// Criteria shared by every hierarchy list (companies, delegations,
/// branches, collaborators, and products when only scope matters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EntityFilter {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub delegation_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl EntityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_delegation(mut self, delegation_id: impl Into<String>) -> Self {
        self.delegation_id = Some(delegation_id.into());
        self
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// The records satisfying every set criterion, in input order.
    pub fn apply<T, R>(&self, records: &[T], regions: &R) -> Vec<T>
    where
        T: Scoped + Searchable + Clone,
        R: RegionLookup + ?Sized,
    {
        let region = resolve_region(active(&self.region), regions);
        let needle = active(&self.search_term).map(str::to_lowercase);
        let company_id = active(&self.company_id);
        let delegation_id = active(&self.delegation_id);
        let branch_id = active(&self.branch_id);

        let matched: Vec<T> = records
            .iter()
            .filter(|record| {
                scope_matches(company_id, record.company_id())
                    && scope_matches(delegation_id, record.delegation_id())
                    && scope_matches(branch_id, record.branch_id())
                    && region.matches(record.delegation_id())
                    && needle
                        .as_deref()
                        .map_or(true, |needle| record.matches_search(needle))
            })
            .cloned()
            .collect();
        tracing::debug!(
            input = records.len(),
            matched = matched.len(),
            "entity filter applied"
        );
        matched
    }
}

/// Filter products against `filter` as seen at `now`.
///
/// Pure: the input is not modified and the output keeps input order.
pub fn filter_products<R: RegionLookup + ?Sized>(
    products: &[Product],
    filter: &ProductFilter,
    regions: &R,
    now: &Timestamp,
) -> Vec<Product> {
    filter.apply(products, regions, now)
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::RegionTable;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn arb_product() -> impl Strategy<Value = Product> {
        (
            0usize..4,
            0usize..6,
            1u32..=12,
            0i64..(8 * 365),
            prop::option::of(1u32..=8),
            "[a-zA-Z]{0,6}",
        )
            .prop_map(|(status, category, month, age_days, delegation, brand)| {
                let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
                let acquired = now - Duration::days(age_days);
                Product {
                    id: format!("{status}{category}{month}{age_days}"),
                    status: ProductStatus::ALL[status],
                    category: ProductCategory::ALL[category],
                    model: "M".to_string(),
                    brand,
                    part_number: String::new(),
                    serial_number: String::new(),
                    location: String::new(),
                    responsible: String::new(),
                    acquisition_date: acquired,
                    warranty_limit: acquired,
                    company_id: None,
                    delegation_id: delegation.map(|d| d.to_string()),
                    branch_id: None,
                    interventions: Vec::new(),
                    acquisition_month: Some(format!("{month:02}")),
                    acquisition_year: None,
                    department: None,
                    company_name: None,
                    delegation_name: None,
                    branch_name: None,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Splitting a two-criterion filter into two passes gives the same result.
        #[test]
        fn prop_conjunction_composes(
            products in prop::collection::vec(arb_product(), 0..30),
            status in 0usize..4,
            category in 0usize..6,
        ) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            let regions = RegionTable::default();
            let both = ProductFilter::new()
                .with_status(ProductStatus::ALL[status])
                .with_category(ProductCategory::ALL[category])
                .apply(&products, &regions, &now);
            let first = ProductFilter::new()
                .with_status(ProductStatus::ALL[status])
                .apply(&products, &regions, &now);
            let second = ProductFilter::new()
                .with_category(ProductCategory::ALL[category])
                .apply(&first, &regions, &now);
            prop_assert_eq!(both, second);
        }

        /// The output is a subsequence of the input.
        #[test]
        fn prop_output_is_ordered_subsequence(
            products in prop::collection::vec(arb_product(), 0..30),
            region in prop::sample::select(
                vec!["Sudeste", "Sul", "Nordeste", "Centro-Oeste", "Norte"]
            ),
        ) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            let out = ProductFilter::new()
                .with_region(region)
                .apply(&products, &RegionTable::default(), &now);
            let mut cursor = products.iter();
            for kept in &out {
                prop_assert!(cursor.any(|p| p == kept));
            }
        }
    }
}
