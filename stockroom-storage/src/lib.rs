//! Stockroom Storage - Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for inventory records and an
//! insertion-ordered in-memory store. Listing preserves insertion order,
//! which is also the order every filter result comes back in.

use stockroom_core::{
    new_entity_id, Branch, Collaborator, Company, Delegation, EntityFilter, EntityId, EntityType,
    Intervention, InventoryResult, NewBranch, NewCollaborator, NewCompany, NewDelegation,
    NewIntervention, NewProduct, NewUser, Product, ProductCategory, ProductFilter, ProductStatus,
    RegionLookup, StorageError, Timestamp, User, UserRole,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// UPDATE TYPES
// ============================================================================

/// Update payload for products. Interventions are edited separately.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub status: Option<ProductStatus>,
    pub category: Option<ProductCategory>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub responsible: Option<String>,
    pub warranty_limit: Option<Timestamp>,
    pub company_id: Option<EntityId>,
    pub delegation_id: Option<EntityId>,
    pub branch_id: Option<EntityId>,
    pub department: Option<String>,
}

/// Update payload for users.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub last_login: Option<Timestamp>,
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Storage for the inventory hierarchy.
///
/// `insert_*` stores a record as given and fails if its id is taken.
/// `add_*` assigns a fresh id and starts child collections empty.
/// Deleting never cascades: children of a deleted record keep their
/// (now dangling) references.
pub trait InventoryStore: Send + Sync {
    // === Company Operations ===

    fn insert_company(&self, company: Company) -> InventoryResult<()>;
    fn get_company(&self, id: &str) -> InventoryResult<Option<Company>>;
    fn list_companies(&self) -> InventoryResult<Vec<Company>>;
    fn delete_company(&self, id: &str) -> InventoryResult<()>;

    fn add_company(&self, new: NewCompany) -> InventoryResult<Company> {
        let company = new.into_company(new_entity_id());
        self.insert_company(company.clone())?;
        Ok(company)
    }

    // === Delegation Operations ===

    fn insert_delegation(&self, delegation: Delegation) -> InventoryResult<()>;
    fn get_delegation(&self, id: &str) -> InventoryResult<Option<Delegation>>;
    fn list_delegations(&self) -> InventoryResult<Vec<Delegation>>;
    fn delete_delegation(&self, id: &str) -> InventoryResult<()>;

    fn add_delegation(&self, new: NewDelegation) -> InventoryResult<Delegation> {
        let delegation = new.into_delegation(new_entity_id());
        self.insert_delegation(delegation.clone())?;
        Ok(delegation)
    }

    // === Branch Operations ===

    fn insert_branch(&self, branch: Branch) -> InventoryResult<()>;
    fn get_branch(&self, id: &str) -> InventoryResult<Option<Branch>>;
    fn list_branches(&self) -> InventoryResult<Vec<Branch>>;
    fn delete_branch(&self, id: &str) -> InventoryResult<()>;

    fn add_branch(&self, new: NewBranch) -> InventoryResult<Branch> {
        let branch = new.into_branch(new_entity_id());
        self.insert_branch(branch.clone())?;
        Ok(branch)
    }

    // === Collaborator Operations ===

    fn insert_collaborator(&self, collaborator: Collaborator) -> InventoryResult<()>;
    fn get_collaborator(&self, id: &str) -> InventoryResult<Option<Collaborator>>;
    fn list_collaborators(&self) -> InventoryResult<Vec<Collaborator>>;
    fn delete_collaborator(&self, id: &str) -> InventoryResult<()>;

    fn add_collaborator(&self, new: NewCollaborator) -> InventoryResult<Collaborator> {
        let collaborator = new.into_collaborator(new_entity_id());
        self.insert_collaborator(collaborator.clone())?;
        Ok(collaborator)
    }

    // === Product Operations ===

    fn insert_product(&self, product: Product) -> InventoryResult<()>;
    fn get_product(&self, id: &str) -> InventoryResult<Option<Product>>;
    fn list_products(&self) -> InventoryResult<Vec<Product>>;
    fn update_product(&self, id: &str, update: ProductUpdate) -> InventoryResult<Product>;
    fn delete_product(&self, id: &str) -> InventoryResult<()>;

    /// Add a product with no interventions. Missing acquisition month/year
    /// are derived from the acquisition date; supplied ones are kept once
    /// they pass [`NewProduct::validate`].
    fn add_product(&self, new: NewProduct) -> InventoryResult<Product> {
        new.validate()?;
        let mut product = Product::from_new(new_entity_id(), new);
        product.fill_acquisition_fields();
        self.insert_product(product.clone())?;
        Ok(product)
    }

    // === Intervention Operations ===

    /// Append an intervention to one product's list.
    fn add_intervention(
        &self,
        product_id: &str,
        new: NewIntervention,
    ) -> InventoryResult<Intervention>;

    /// Replace an intervention's fields, keeping its id.
    fn update_intervention(
        &self,
        product_id: &str,
        intervention_id: &str,
        update: NewIntervention,
    ) -> InventoryResult<Intervention>;

    fn delete_intervention(&self, product_id: &str, intervention_id: &str) -> InventoryResult<()>;

    // === User Operations ===

    fn insert_user(&self, user: User) -> InventoryResult<()>;
    fn get_user(&self, id: &str) -> InventoryResult<Option<User>>;
    fn list_users(&self) -> InventoryResult<Vec<User>>;
    fn update_user(&self, id: &str, update: UserUpdate) -> InventoryResult<User>;
    fn delete_user(&self, id: &str) -> InventoryResult<()>;

    fn add_user(&self, new: NewUser) -> InventoryResult<User> {
        let user = new.into_user(new_entity_id());
        self.insert_user(user.clone())?;
        Ok(user)
    }

    // === Queries ===

    fn query_products(
        &self,
        filter: &ProductFilter,
        regions: &dyn RegionLookup,
        now: &Timestamp,
    ) -> InventoryResult<Vec<Product>> {
        Ok(filter.apply(&self.list_products()?, regions, now))
    }

    fn query_companies(
        &self,
        filter: &EntityFilter,
        regions: &dyn RegionLookup,
    ) -> InventoryResult<Vec<Company>> {
        Ok(filter.apply(&self.list_companies()?, regions))
    }

    fn query_delegations(
        &self,
        filter: &EntityFilter,
        regions: &dyn RegionLookup,
    ) -> InventoryResult<Vec<Delegation>> {
        Ok(filter.apply(&self.list_delegations()?, regions))
    }

    fn query_branches(
        &self,
        filter: &EntityFilter,
        regions: &dyn RegionLookup,
    ) -> InventoryResult<Vec<Branch>> {
        Ok(filter.apply(&self.list_branches()?, regions))
    }

    fn query_collaborators(
        &self,
        filter: &EntityFilter,
        regions: &dyn RegionLookup,
    ) -> InventoryResult<Vec<Collaborator>> {
        Ok(filter.apply(&self.list_collaborators()?, regions))
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

trait Record: Clone {
    const ENTITY_TYPE: EntityType;
    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($ty:ty, $entity:expr) => {
        impl Record for $ty {
            const ENTITY_TYPE: EntityType = $entity;
            fn record_id(&self) -> &str {
                &self.id
            }
        }
    };
}

impl_record!(Company, EntityType::Company);
impl_record!(Delegation, EntityType::Delegation);
impl_record!(Branch, EntityType::Branch);
impl_record!(Collaborator, EntityType::Collaborator);
impl_record!(Product, EntityType::Product);
impl_record!(User, EntityType::User);

fn not_found(entity_type: EntityType, id: &str) -> StorageError {
    StorageError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

/// Insertion-ordered collection of one record type.
#[derive(Debug)]
struct Collection<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> Collection<T> {
    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, StorageError> {
        self.records.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, StorageError> {
        self.records.write().map_err(|_| StorageError::LockPoisoned)
    }

    fn insert(&self, record: T) -> InventoryResult<()> {
        let mut records = self.write()?;
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(StorageError::InsertFailed {
                entity_type: T::ENTITY_TYPE,
                reason: format!("id {} already exists", record.record_id()),
            }
            .into());
        }
        tracing::debug!(entity_type = %T::ENTITY_TYPE, id = record.record_id(), "record inserted");
        records.push(record);
        Ok(())
    }

    fn get(&self, id: &str) -> InventoryResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.record_id() == id).cloned())
    }

    fn list(&self) -> InventoryResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    fn len(&self) -> InventoryResult<usize> {
        Ok(self.read()?.len())
    }

    fn delete(&self, id: &str) -> InventoryResult<()> {
        let mut records = self.write()?;
        let idx = records
            .iter()
            .position(|r| r.record_id() == id)
            .ok_or_else(|| not_found(T::ENTITY_TYPE, id))?;
        records.remove(idx);
        tracing::debug!(entity_type = %T::ENTITY_TYPE, id, "record deleted");
        Ok(())
    }

    /// Run `f` against the record with `id` under the write lock.
    fn modify<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut T) -> InventoryResult<R>,
    ) -> InventoryResult<R> {
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| not_found(T::ENTITY_TYPE, id))?;
        f(record)
    }

    fn clear(&self) -> InventoryResult<()> {
        self.write()?.clear();
        Ok(())
    }
}

/// In-memory store for the whole inventory.
///
/// Cloning shares the underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    companies: Arc<Collection<Company>>,
    delegations: Arc<Collection<Delegation>>,
    branches: Arc<Collection<Branch>>,
    collaborators: Arc<Collection<Collaborator>>,
    products: Arc<Collection<Product>>,
    users: Arc<Collection<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) -> InventoryResult<()> {
        self.companies.clear()?;
        self.delegations.clear()?;
        self.branches.clear()?;
        self.collaborators.clear()?;
        self.products.clear()?;
        self.users.clear()?;
        Ok(())
    }

    pub fn product_count(&self) -> InventoryResult<usize> {
        self.products.len()
    }

    pub fn company_count(&self) -> InventoryResult<usize> {
        self.companies.len()
    }
}

impl InventoryStore for MemoryStore {
    fn insert_company(&self, company: Company) -> InventoryResult<()> {
        self.companies.insert(company)
    }

    fn get_company(&self, id: &str) -> InventoryResult<Option<Company>> {
        self.companies.get(id)
    }

    fn list_companies(&self) -> InventoryResult<Vec<Company>> {
        self.companies.list()
    }

    fn delete_company(&self, id: &str) -> InventoryResult<()> {
        self.companies.delete(id)
    }

    fn insert_delegation(&self, delegation: Delegation) -> InventoryResult<()> {
        self.delegations.insert(delegation)
    }

    fn get_delegation(&self, id: &str) -> InventoryResult<Option<Delegation>> {
        self.delegations.get(id)
    }

    fn list_delegations(&self) -> InventoryResult<Vec<Delegation>> {
        self.delegations.list()
    }

    fn delete_delegation(&self, id: &str) -> InventoryResult<()> {
        self.delegations.delete(id)
    }

    fn insert_branch(&self, branch: Branch) -> InventoryResult<()> {
        self.branches.insert(branch)
    }

    fn get_branch(&self, id: &str) -> InventoryResult<Option<Branch>> {
        self.branches.get(id)
    }

    fn list_branches(&self) -> InventoryResult<Vec<Branch>> {
        self.branches.list()
    }

    fn delete_branch(&self, id: &str) -> InventoryResult<()> {
        self.branches.delete(id)
    }

    fn insert_collaborator(&self, collaborator: Collaborator) -> InventoryResult<()> {
        self.collaborators.insert(collaborator)
    }

    fn get_collaborator(&self, id: &str) -> InventoryResult<Option<Collaborator>> {
        self.collaborators.get(id)
    }

    fn list_collaborators(&self) -> InventoryResult<Vec<Collaborator>> {
        self.collaborators.list()
    }

    fn delete_collaborator(&self, id: &str) -> InventoryResult<()> {
        self.collaborators.delete(id)
    }

    fn insert_product(&self, product: Product) -> InventoryResult<()> {
        self.products.insert(product)
    }

    fn get_product(&self, id: &str) -> InventoryResult<Option<Product>> {
        self.products.get(id)
    }

    fn list_products(&self) -> InventoryResult<Vec<Product>> {
        self.products.list()
    }

    fn update_product(&self, id: &str, update: ProductUpdate) -> InventoryResult<Product> {
        self.products.modify(id, |product| {
            if let Some(status) = update.status {
                product.status = status;
            }
            if let Some(category) = update.category {
                product.category = category;
            }
            if let Some(model) = update.model {
                product.model = model;
            }
            if let Some(brand) = update.brand {
                product.brand = brand;
            }
            if let Some(location) = update.location {
                product.location = location;
            }
            if let Some(responsible) = update.responsible {
                product.responsible = responsible;
            }
            if let Some(warranty_limit) = update.warranty_limit {
                product.warranty_limit = warranty_limit;
            }
            if let Some(company_id) = update.company_id {
                product.company_id = Some(company_id);
            }
            if let Some(delegation_id) = update.delegation_id {
                product.delegation_id = Some(delegation_id);
            }
            if let Some(branch_id) = update.branch_id {
                product.branch_id = Some(branch_id);
            }
            if let Some(department) = update.department {
                product.department = Some(department);
            }
            tracing::debug!(product_id = %product.id, "product updated");
            Ok(product.clone())
        })
    }

    fn delete_product(&self, id: &str) -> InventoryResult<()> {
        self.products.delete(id)
    }

    fn add_intervention(
        &self,
        product_id: &str,
        new: NewIntervention,
    ) -> InventoryResult<Intervention> {
        self.products.modify(product_id, |product| {
            let intervention = Intervention::from_new(new_entity_id(), new);
            product.interventions.push(intervention.clone());
            tracing::debug!(
                product_id,
                intervention_id = %intervention.id,
                "intervention added"
            );
            Ok(intervention)
        })
    }

    fn update_intervention(
        &self,
        product_id: &str,
        intervention_id: &str,
        update: NewIntervention,
    ) -> InventoryResult<Intervention> {
        self.products.modify(product_id, |product| {
            let slot = product
                .interventions
                .iter_mut()
                .find(|i| i.id == intervention_id)
                .ok_or_else(|| not_found(EntityType::Intervention, intervention_id))?;
            *slot = Intervention::from_new(slot.id.clone(), update);
            tracing::debug!(product_id, intervention_id, "intervention updated");
            Ok(slot.clone())
        })
    }

    fn delete_intervention(&self, product_id: &str, intervention_id: &str) -> InventoryResult<()> {
        self.products.modify(product_id, |product| {
            let idx = product
                .interventions
                .iter()
                .position(|i| i.id == intervention_id)
                .ok_or_else(|| not_found(EntityType::Intervention, intervention_id))?;
            product.interventions.remove(idx);
            tracing::debug!(product_id, intervention_id, "intervention deleted");
            Ok(())
        })
    }

    fn insert_user(&self, user: User) -> InventoryResult<()> {
        self.users.insert(user)
    }

    fn get_user(&self, id: &str) -> InventoryResult<Option<User>> {
        self.users.get(id)
    }

    fn list_users(&self) -> InventoryResult<Vec<User>> {
        self.users.list()
    }

    fn update_user(&self, id: &str, update: UserUpdate) -> InventoryResult<User> {
        self.users.modify(id, |user| {
            if let Some(name) = update.name {
                user.name = name;
            }
            if let Some(email) = update.email {
                user.email = email;
            }
            if let Some(role) = update.role {
                user.role = role;
            }
            if let Some(last_login) = update.last_login {
                user.last_login = Some(last_login);
            }
            Ok(user.clone())
        })
    }

    fn delete_user(&self, id: &str) -> InventoryResult<()> {
        self.users.delete(id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
