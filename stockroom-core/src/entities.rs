//! Core entity structures
//!
//! Hierarchy references (`company_id`, `delegation_id`, `branch_id`) are
//! plain ids. They are never checked against existing records, so an
//! orphaned reference is accepted as-is.

use crate::{
    month_code, year_code, EntityId, MaintenanceType, ProductCategory, ProductStatus, Timestamp,
    UserRole, ValidationError, MONTH_CODES,
};
use serde::{Deserialize, Serialize};

/// Company - top of the organizational hierarchy.
///
/// The counters are informational and are not recomputed from children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    /// Brazilian company registration number.
    pub cnpj: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    #[serde(default)]
    pub delegation_count: u32,
    #[serde(default)]
    pub branch_count: u32,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub equipment_count: u32,
}

/// Delegation - regional unit beneath a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Delegation {
    pub id: EntityId,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    pub name: String,
    pub region: String,
    pub manager: String,
    #[serde(default)]
    pub branch_count: u32,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub equipment_count: u32,
}

/// Branch - physical site beneath a delegation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Branch {
    pub id: EntityId,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    pub name: String,
    pub country: String,
    pub city: String,
    /// Display name of the parent delegation.
    pub delegation: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub equipment_count: u32,
}

/// Equipment summary attached to a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignedProduct {
    pub id: EntityId,
    pub name: String,
    pub model: String,
    pub brand: String,
    pub category: ProductCategory,
    pub status: ProductStatus,
}

/// Collaborator - person working at a branch, holding equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Collaborator {
    pub id: EntityId,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub products: Vec<AssignedProduct>,
}

/// Maintenance event logged against a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Intervention {
    pub id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub date: Timestamp,
    pub description: String,
    pub technician: String,
    /// Free-text progress note ("Concluído", "Pendente", ...).
    pub status: String,
    pub maintenance_type: MaintenanceType,
    pub observations: String,
}

/// Product - a tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: EntityId,
    pub status: ProductStatus,
    pub category: ProductCategory,
    pub model: String,
    pub brand: String,
    pub part_number: String,
    pub serial_number: String,
    pub location: String,
    pub responsible: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub acquisition_date: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub warranty_limit: Timestamp,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
    /// Precomputed "01".."12". May disagree with `acquisition_date`.
    #[serde(default)]
    pub acquisition_month: Option<String>,
    #[serde(default)]
    pub acquisition_year: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub delegation_name: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

impl Product {
    /// Build a product from a creation payload. Starts with no interventions.
    pub fn from_new(id: EntityId, new: NewProduct) -> Self {
        Self {
            id,
            status: new.status,
            category: new.category,
            model: new.model,
            brand: new.brand,
            part_number: new.part_number,
            serial_number: new.serial_number,
            location: new.location,
            responsible: new.responsible,
            acquisition_date: new.acquisition_date,
            warranty_limit: new.warranty_limit,
            company_id: new.company_id,
            delegation_id: new.delegation_id,
            branch_id: new.branch_id,
            interventions: Vec::new(),
            acquisition_month: new.acquisition_month,
            acquisition_year: new.acquisition_year,
            department: new.department,
            company_name: None,
            delegation_name: None,
            branch_name: None,
        }
    }

    /// Recompute `acquisition_month` and `acquisition_year` from the date.
    pub fn derive_acquisition_fields(&mut self) {
        self.acquisition_month = Some(month_code(&self.acquisition_date));
        self.acquisition_year = Some(year_code(&self.acquisition_date));
    }

    /// Fill the derived acquisition fields only where they are missing.
    pub fn fill_acquisition_fields(&mut self) {
        if self.acquisition_month.is_none() {
            self.acquisition_month = Some(month_code(&self.acquisition_date));
        }
        if self.acquisition_year.is_none() {
            self.acquisition_year = Some(year_code(&self.acquisition_date));
        }
    }

    /// Whether the stored month/year agree with `acquisition_date`.
    pub fn acquisition_fields_consistent(&self) -> bool {
        let month_ok = self
            .acquisition_month
            .as_deref()
            .map_or(true, |m| m == month_code(&self.acquisition_date));
        let year_ok = self
            .acquisition_year
            .as_deref()
            .map_or(true, |y| y == year_code(&self.acquisition_date));
        month_ok && year_ok
    }

    /// Whether any intervention happened in the given month code.
    pub fn has_maintenance_in(&self, month: &str) -> bool {
        self.interventions
            .iter()
            .any(|intervention| month_code(&intervention.date) == month)
    }

    /// Whether the warranty is still running at `now`.
    pub fn under_warranty(&self, now: &Timestamp) -> bool {
        self.warranty_limit >= *now
    }

    pub fn intervention(&self, intervention_id: &str) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id == intervention_id)
    }
}

impl Intervention {
    pub fn from_new(id: EntityId, new: NewIntervention) -> Self {
        Self {
            id,
            date: new.date,
            description: new.description,
            technician: new.technician,
            status: new.status,
            maintenance_type: new.maintenance_type,
            observations: new.observations,
        }
    }
}

/// Dashboard user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub last_login: Option<Timestamp>,
}

// ============================================================================
// CREATION PAYLOADS
// ============================================================================

/// Creation payload for a company. Counters start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewCompany {
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

impl NewCompany {
    pub fn into_company(self, id: EntityId) -> Company {
        Company {
            id,
            name: self.name,
            cnpj: self.cnpj,
            address: self.address,
            city: self.city,
            state: self.state,
            phone: self.phone,
            email: self.email,
            website: self.website,
            delegation_count: 0,
            branch_count: 0,
            employee_count: 0,
            equipment_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewDelegation {
    #[serde(default)]
    pub company_id: Option<EntityId>,
    pub name: String,
    pub region: String,
    pub manager: String,
}

impl NewDelegation {
    pub fn into_delegation(self, id: EntityId) -> Delegation {
        Delegation {
            id,
            company_id: self.company_id,
            name: self.name,
            region: self.region,
            manager: self.manager,
            branch_count: 0,
            employee_count: 0,
            equipment_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewBranch {
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    pub name: String,
    pub country: String,
    pub city: String,
    pub delegation: String,
    pub address: String,
    pub phone: String,
}

impl NewBranch {
    pub fn into_branch(self, id: EntityId) -> Branch {
        Branch {
            id,
            company_id: self.company_id,
            delegation_id: self.delegation_id,
            name: self.name,
            country: self.country,
            city: self.city,
            delegation: self.delegation,
            address: self.address,
            phone: self.phone,
            employee_count: 0,
            equipment_count: 0,
        }
    }
}

/// Creation payload for a collaborator. Starts with no assigned products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewCollaborator {
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
}

impl NewCollaborator {
    pub fn into_collaborator(self, id: EntityId) -> Collaborator {
        Collaborator {
            id,
            company_id: self.company_id,
            delegation_id: self.delegation_id,
            branch_id: self.branch_id,
            name: self.name,
            position: self.position,
            email: self.email,
            phone: self.phone,
            products: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewProduct {
    pub status: ProductStatus,
    pub category: ProductCategory,
    pub model: String,
    pub brand: String,
    pub part_number: String,
    pub serial_number: String,
    pub location: String,
    pub responsible: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub acquisition_date: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub warranty_limit: Timestamp,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub delegation_id: Option<EntityId>,
    #[serde(default)]
    pub branch_id: Option<EntityId>,
    #[serde(default)]
    pub acquisition_month: Option<String>,
    #[serde(default)]
    pub acquisition_year: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl NewProduct {
    /// Reject supplied acquisition month/year values that could never come
    /// from a date. Absent values are fine; they get derived on insert.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(month) = self.acquisition_month.as_deref() {
            if !MONTH_CODES.contains(&month) {
                return Err(ValidationError::InvalidValue {
                    field: "acquisition_month".to_string(),
                    reason: format!("expected \"01\"..\"12\", got {month:?}"),
                });
            }
        }
        if let Some(year) = self.acquisition_year.as_deref() {
            if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ValidationError::InvalidValue {
                    field: "acquisition_year".to_string(),
                    reason: format!("expected four digits, got {year:?}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewIntervention {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub date: Timestamp,
    pub description: String,
    pub technician: String,
    pub status: String,
    pub maintenance_type: MaintenanceType,
    pub observations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl NewUser {
    pub fn into_user(self, id: EntityId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            last_login: None,
        }
    }
}
