//! Stockroom Test Utilities
//!
//! Shared test infrastructure for the Stockroom workspace:
//! - Proptest generators for inventory types and filters
//! - Seed fixtures mirroring the demo dataset
//! - Assertions for inventory results

// Re-export the in-memory store from its source crate
pub use stockroom_storage::{InventoryStore, MemoryStore, ProductUpdate, UserUpdate};

pub use stockroom_core::{
    AgeBucket, AuthConfig, Branch, Collaborator, Company, Delegation, EntityType, Intervention,
    InventoryError, InventoryResult, MaintenanceType, NewIntervention, NewProduct, Product,
    ProductCategory, ProductFilter, ProductStatus, RegionTable, StockroomConfig, StorageError,
    Timestamp, User, UserRole,
};

use chrono::{Duration, TimeZone, Utc};

/// Fixed "now" used by fixtures and property tests.
pub fn reference_now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for inventory types.

    use super::*;
    use proptest::prelude::*;

    /// Delegation ids used by the default region table, plus one that no
    /// region covers.
    pub const DELEGATION_IDS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

    /// Generate a Timestamp between 2015 and 2024.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1420070400i64..1717200000i64)
            .prop_map(|secs| chrono::DateTime::from_timestamp(secs, 0).unwrap())
    }

    pub fn arb_product_status() -> impl Strategy<Value = ProductStatus> {
        prop_oneof![
            Just(ProductStatus::Available),
            Just(ProductStatus::InUse),
            Just(ProductStatus::Maintenance),
            Just(ProductStatus::Lost),
        ]
    }

    pub fn arb_product_category() -> impl Strategy<Value = ProductCategory> {
        prop::sample::select(ProductCategory::ALL.to_vec())
    }

    pub fn arb_maintenance_type() -> impl Strategy<Value = MaintenanceType> {
        prop_oneof![Just(MaintenanceType::Preventive), Just(MaintenanceType::Corrective)]
    }

    pub fn arb_age_bucket() -> impl Strategy<Value = AgeBucket> {
        prop::sample::select(AgeBucket::ALL.to_vec())
    }

    pub fn arb_month_code() -> impl Strategy<Value = String> {
        (1u32..=12).prop_map(|m| format!("{m:02}"))
    }

    pub fn arb_region() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Sudeste", "Sul", "Nordeste", "Centro-Oeste", "Norte"])
            .prop_map(str::to_string)
    }

    pub fn arb_delegation_id() -> impl Strategy<Value = String> {
        prop::sample::select(DELEGATION_IDS.to_vec()).prop_map(str::to_string)
    }

    /// Generate an Intervention with a random id suffix.
    pub fn arb_intervention() -> impl Strategy<Value = Intervention> {
        (
            "[a-z0-9]{6}",
            arb_timestamp(),
            "[A-Za-z ]{0,30}",
            arb_maintenance_type(),
        )
            .prop_map(|(id, date, description, maintenance_type)| Intervention {
                id: format!("int-{id}"),
                date,
                description,
                technician: "Técnico".to_string(),
                status: "Concluído".to_string(),
                maintenance_type,
                observations: String::new(),
            })
    }

    /// Generate a Product with consistent derived acquisition fields.
    pub fn arb_product() -> impl Strategy<Value = Product> {
        (
            "[a-z0-9]{8}",
            arb_product_status(),
            arb_product_category(),
            prop::sample::select(vec!["Dell", "HP", "Lenovo", "Cisco", "Epson", "LG"]),
            "[A-Za-z0-9 ]{1,20}",
            arb_timestamp(),
            prop::option::of(arb_delegation_id()),
            prop::collection::vec(arb_intervention(), 0..4),
        )
            .prop_map(
                |(id, status, category, brand, model, acquired, delegation_id, interventions)| {
                    let mut product = Product {
                        id,
                        status,
                        category,
                        model,
                        brand: brand.to_string(),
                        part_number: String::new(),
                        serial_number: String::new(),
                        location: "Sede".to_string(),
                        responsible: "TI".to_string(),
                        acquisition_date: acquired,
                        warranty_limit: acquired + Duration::days(3 * 365),
                        company_id: Some("1".to_string()),
                        delegation_id,
                        branch_id: None,
                        interventions,
                        acquisition_month: None,
                        acquisition_year: None,
                        department: None,
                        company_name: None,
                        delegation_name: None,
                        branch_name: None,
                    };
                    product.derive_acquisition_fields();
                    product
                },
            )
    }

    pub fn arb_products(max: usize) -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec(arb_product(), 0..max)
    }

    /// Generate a filter where each criterion is independently set or not.
    pub fn arb_product_filter() -> impl Strategy<Value = ProductFilter> {
        (
            prop::option::of(arb_product_status()),
            prop::option::of(arb_product_category()),
            prop::option::of(arb_month_code()),
            prop::option::of(arb_month_code()),
            prop::option::of(arb_age_bucket()),
            prop::option::of(arb_region()),
            prop::option::of(prop::sample::select(vec!["dell", "HP", "len", "o"])),
        )
            .prop_map(|(status, category, month, maintenance, age, region, search)| {
                let mut filter = ProductFilter::new();
                if let Some(status) = status {
                    filter = filter.with_status(status);
                }
                if let Some(category) = category {
                    filter = filter.with_category(category);
                }
                if let Some(month) = month {
                    filter = filter.with_acquisition_month(month);
                }
                if let Some(month) = maintenance {
                    filter = filter.with_maintenance_month(month);
                }
                if let Some(age) = age {
                    filter = filter.with_age_range(age);
                }
                if let Some(region) = region {
                    filter = filter.with_region(region);
                }
                if let Some(term) = search {
                    filter = filter.with_search(term);
                }
                filter
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Demo dataset: three companies, seven delegations (one per entry in
    //! the default region table), branches, collaborators, products, users.

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    pub fn companies() -> Vec<Company> {
        let company = |id: &str, name: &str, cnpj: &str, city: &str, state: &str| Company {
            id: id.to_string(),
            name: name.to_string(),
            cnpj: cnpj.to_string(),
            address: "Av. Principal, 100".to_string(),
            city: city.to_string(),
            state: state.to_string(),
            phone: "(11) 3000-0000".to_string(),
            email: format!("contato@empresa{id}.com.br"),
            website: format!("www.empresa{id}.com.br"),
            delegation_count: 0,
            branch_count: 0,
            employee_count: 0,
            equipment_count: 0,
        };
        vec![
            company("1", "Empresa 01", "12.345.678/0001-90", "São Paulo", "SP"),
            company("2", "Empresa 02", "23.456.789/0001-01", "Belo Horizonte", "MG"),
            company("3", "Empresa 03", "34.567.890/0001-12", "Porto Alegre", "RS"),
        ]
    }

    pub fn delegations() -> Vec<Delegation> {
        let delegation = |id: &str, company_id: &str, name: &str, region: &str, manager: &str| {
            Delegation {
                id: id.to_string(),
                company_id: Some(company_id.to_string()),
                name: name.to_string(),
                region: region.to_string(),
                manager: manager.to_string(),
                branch_count: 0,
                employee_count: 0,
                equipment_count: 0,
            }
        };
        vec![
            delegation("1", "1", "Delegação São Paulo Capital", "Sudeste", "Ricardo Santos"),
            delegation("2", "1", "Delegação Rio de Janeiro", "Sudeste", "Amanda Costa"),
            delegation("3", "2", "Delegação Belo Horizonte", "Sudeste", "Carlos Mendes"),
            delegation("4", "3", "Delegação Porto Alegre", "Sul", "Fernanda Lima"),
            delegation("5", "2", "Delegação Recife", "Nordeste", "Paulo Oliveira"),
            delegation("6", "1", "Delegação Brasília", "Centro-Oeste", "Juliana Rocha"),
            delegation("7", "3", "Delegação Manaus", "Norte", "Marcos Araújo"),
        ]
    }

    pub fn branches() -> Vec<Branch> {
        let delegations = delegations();
        [
            ("1", "1", "1", "Filial Paulista", "São Paulo"),
            ("2", "1", "1", "Filial Pinheiros", "São Paulo"),
            ("3", "1", "2", "Filial Centro RJ", "Rio de Janeiro"),
            ("4", "3", "4", "Filial Moinhos", "Porto Alegre"),
            ("5", "2", "5", "Filial Boa Viagem", "Recife"),
        ]
        .into_iter()
        .map(|(id, company_id, delegation_id, name, city)| Branch {
            id: id.to_string(),
            company_id: Some(company_id.to_string()),
            delegation_id: Some(delegation_id.to_string()),
            name: name.to_string(),
            country: "Brasil".to_string(),
            city: city.to_string(),
            delegation: delegations
                .iter()
                .find(|d| d.id == delegation_id)
                .map(|d| d.name.clone())
                .unwrap(),
            address: "Rua Central, 50".to_string(),
            phone: "(11) 4000-0000".to_string(),
            employee_count: 0,
            equipment_count: 0,
        })
        .collect()
    }

    pub fn collaborators() -> Vec<Collaborator> {
        let collaborator =
            |id: &str, delegation_id: &str, branch_id: &str, name: &str, position: &str| {
                Collaborator {
                    id: id.to_string(),
                    company_id: Some("1".to_string()),
                    delegation_id: Some(delegation_id.to_string()),
                    branch_id: Some(branch_id.to_string()),
                    name: name.to_string(),
                    position: position.to_string(),
                    email: format!("{}@empresa.com.br", name.to_lowercase().replace(' ', ".")),
                    phone: "(11) 98000-0000".to_string(),
                    products: Vec::new(),
                }
            };
        vec![
            collaborator("1", "1", "1", "João Silva", "Analista de TI"),
            collaborator("2", "1", "2", "Maria Santos", "Gerente de Projetos"),
            collaborator("3", "2", "3", "Pedro Alves", "Técnico de Suporte"),
            collaborator("4", "4", "4", "Ana Souza", "Coordenadora"),
        ]
    }

    fn intervention(
        id: &str,
        when: Timestamp,
        description: &str,
        kind: MaintenanceType,
    ) -> Intervention {
        Intervention {
            id: id.to_string(),
            date: when,
            description: description.to_string(),
            technician: "Carlos Técnico".to_string(),
            status: "Concluído".to_string(),
            maintenance_type: kind,
            observations: String::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn product(
        id: &str,
        status: ProductStatus,
        category: ProductCategory,
        brand: &str,
        model: &str,
        acquired: Timestamp,
        delegation_id: &str,
        branch_id: &str,
    ) -> Product {
        let mut product = Product {
            id: id.to_string(),
            status,
            category,
            model: model.to_string(),
            brand: brand.to_string(),
            part_number: format!("PN-{id}"),
            serial_number: format!("SN-{id:0>6}"),
            location: "Sala de TI".to_string(),
            responsible: "Equipe TI".to_string(),
            acquisition_date: acquired,
            warranty_limit: acquired + Duration::days(3 * 365),
            company_id: Some("1".to_string()),
            delegation_id: Some(delegation_id.to_string()),
            branch_id: Some(branch_id.to_string()),
            interventions: Vec::new(),
            acquisition_month: None,
            acquisition_year: None,
            department: None,
            company_name: None,
            delegation_name: None,
            branch_name: None,
        };
        product.derive_acquisition_fields();
        product
    }

    pub fn products() -> Vec<Product> {
        let mut notebook = product(
            "1",
            ProductStatus::InUse,
            ProductCategory::Computing,
            "Dell",
            "Latitude 5420",
            date(2022, 3, 15),
            "1",
            "1",
        );
        notebook.interventions = vec![
            intervention("1", date(2023, 5, 10), "Troca de teclado", MaintenanceType::Corrective),
            intervention("2", date(2023, 11, 2), "Limpeza interna", MaintenanceType::Preventive),
        ];
        notebook.department = Some("Financeiro".to_string());

        let mut switch = product(
            "2",
            ProductStatus::Available,
            ProductCategory::Network,
            "Cisco",
            "Catalyst 2960",
            date(2021, 7, 20),
            "4",
            "4",
        );
        switch.interventions = vec![intervention(
            "3",
            date(2023, 5, 22),
            "Atualização de firmware",
            MaintenanceType::Preventive,
        )];

        let printer = product(
            "3",
            ProductStatus::Maintenance,
            ProductCategory::Printing,
            "HP",
            "LaserJet Pro M404",
            date(2019, 1, 5),
            "5",
            "5",
        );

        let monitor = product(
            "4",
            ProductStatus::Lost,
            ProductCategory::Peripherals,
            "LG",
            "UltraWide 29",
            date(2024, 2, 1),
            "2",
            "3",
        );

        let camera = product(
            "5",
            ProductStatus::InUse,
            ProductCategory::AudioVideo,
            "Logitech",
            "Rally Bar",
            date(2023, 9, 12),
            "7",
            "5",
        );

        vec![notebook, switch, printer, monitor, camera]
    }

    pub fn users() -> Vec<User> {
        let user = |id: &str, name: &str, email: &str, role: UserRole| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            last_login: None,
        };
        vec![
            user("1", "Administrador", "admin@exemplo.com", UserRole::Admin),
            user("2", "João Silva", "joao@exemplo.com", UserRole::Moderator),
            user("3", "Maria Santos", "maria@exemplo.com", UserRole::Guest),
        ]
    }

    /// A store holding the whole demo dataset.
    pub fn seeded_store() -> InventoryResult<MemoryStore> {
        let store = MemoryStore::new();
        for company in companies() {
            store.insert_company(company)?;
        }
        for delegation in delegations() {
            store.insert_delegation(delegation)?;
        }
        for branch in branches() {
            store.insert_branch(branch)?;
        }
        for collaborator in collaborators() {
            store.insert_collaborator(collaborator)?;
        }
        for product in products() {
            store.insert_product(product)?;
        }
        for user in users() {
            store.insert_user(user)?;
        }
        Ok(store)
    }

    pub fn default_config() -> StockroomConfig {
        StockroomConfig::default()
    }

    pub fn new_intervention(month: u32, kind: MaintenanceType) -> NewIntervention {
        NewIntervention {
            date: date(2024, month, 3),
            description: "Revisão".to_string(),
            technician: "Carlos Técnico".to_string(),
            status: "Pendente".to_string(),
            maintenance_type: kind,
            observations: String::new(),
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for inventory results.

    use super::*;

    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &InventoryResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a result is a NotFound storage error for `entity_type`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(
        result: &InventoryResult<T>,
        entity_type: EntityType,
    ) {
        match result {
            Err(InventoryError::Storage(StorageError::NotFound { entity_type: et, .. })) => {
                assert_eq!(*et, entity_type, "Wrong entity type in NotFound error");
            }
            other => panic!("Expected NotFound error for {:?}, got: {:?}", entity_type, other),
        }
    }

    /// Assert that `subset` appears in `superset` in the same relative order.
    #[track_caller]
    pub fn assert_ordered_subset(subset: &[Product], superset: &[Product]) {
        let mut cursor = superset.iter();
        for product in subset {
            assert!(
                cursor.any(|p| p.id == product.id),
                "product {} missing or out of order",
                product.id
            );
        }
    }
}
