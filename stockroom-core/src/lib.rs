//! Stockroom Core - Inventory Types, Filtering and Aggregation
//!
//! Data types for the company → delegation → branch → collaborator/product
//! hierarchy, the filter layer every list view goes through, and the
//! dashboard aggregations. No I/O beyond reading the config file; storage
//! lives in `stockroom-storage`.

mod age;
mod config;
mod entities;
mod enums;
mod error;
mod filter;
mod identity;
mod month;
mod region;
mod session;
pub mod stats;
mod telemetry;

pub use age::{age_in_years, AgeBucket, MILLIS_PER_YEAR};
pub use config::{AuthConfig, StockroomConfig, TelemetryConfig, CONFIG_ENV_VAR};
pub use entities::{
    AssignedProduct, Branch, Collaborator, Company, Delegation, Intervention, NewBranch,
    NewCollaborator, NewCompany, NewDelegation, NewIntervention, NewProduct, NewUser, Product,
    User,
};
pub use enums::{EntityType, MaintenanceType, ProductCategory, ProductStatus, UserRole};
pub use error::{
    AuthError, ConfigError, InventoryError, InventoryResult, StorageError, ValidationError,
};
pub use filter::{filter_products, EntityFilter, FilterLabel, ProductFilter, Scoped, Searchable};
pub use identity::{new_entity_id, EntityId, Timestamp};
pub use month::{month_code, month_label, year_code, MONTH_CODES};
pub use region::{RegionLookup, RegionTable};
pub use session::{validate_password_change, Session};
pub use telemetry::init_tracing;
