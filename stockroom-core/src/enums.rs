//! Enum types for Stockroom entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE ENUMS
// ============================================================================

/// Entity type discriminator, used in storage errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityType {
    Company,
    Delegation,
    Branch,
    Collaborator,
    Product,
    Intervention,
    User,
}

/// Lifecycle status of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    InUse,
    Maintenance,
    Lost,
}

/// Equipment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Computing,
    Network,
    Peripherals,
    Printing,
    Monitoring,
    AudioVideo,
}

/// Kind of maintenance performed during an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
}

/// Access level of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Read-only access
    Guest,
    /// May insert new data
    Moderator,
    /// Full access
    Admin,
}

// ============================================================================
// CODES AND LABELS
// ============================================================================

impl ProductStatus {
    pub const ALL: [ProductStatus; 4] = [
        ProductStatus::Available,
        ProductStatus::InUse,
        ProductStatus::Maintenance,
        ProductStatus::Lost,
    ];

    /// Wire code, as used in filters and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::InUse => "in_use",
            ProductStatus::Maintenance => "maintenance",
            ProductStatus::Lost => "lost",
        }
    }

    /// Human-readable label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::Available => "Disponível",
            ProductStatus::InUse => "Em uso",
            ProductStatus::Maintenance => "Manutenção",
            ProductStatus::Lost => "Extraviado",
        }
    }
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Computing,
        ProductCategory::Network,
        ProductCategory::Peripherals,
        ProductCategory::Printing,
        ProductCategory::Monitoring,
        ProductCategory::AudioVideo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Computing => "computing",
            ProductCategory::Network => "network",
            ProductCategory::Peripherals => "peripherals",
            ProductCategory::Printing => "printing",
            ProductCategory::Monitoring => "monitoring",
            ProductCategory::AudioVideo => "audio_video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Computing => "Computação",
            ProductCategory::Network => "Rede",
            ProductCategory::Peripherals => "Periféricos",
            ProductCategory::Printing => "Impressão",
            ProductCategory::Monitoring => "Monitoramento",
            ProductCategory::AudioVideo => "Áudio e Vídeo",
        }
    }
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "preventive",
            MaintenanceType::Corrective => "corrective",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "Manutenção Preventiva",
            MaintenanceType::Corrective => "Manutenção Corretiva",
        }
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Guest => "Convidado",
            UserRole::Moderator => "Moderador",
            UserRole::Admin => "Administrador",
        }
    }

    /// Whether this role may create or modify records.
    pub fn can_write(&self) -> bool {
        !matches!(self, UserRole::Guest)
    }
}

// ============================================================================
// STRING CONVERSIONS
// ============================================================================

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EntityType::Company => "Company",
            EntityType::Delegation => "Delegation",
            EntityType::Branch => "Branch",
            EntityType::Collaborator => "Collaborator",
            EntityType::Product => "Product",
            EntityType::Intervention => "Intervention",
            EntityType::User => "User",
        };
        write!(f, "{}", value)
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "available" => Ok(ProductStatus::Available),
            "inuse" => Ok(ProductStatus::InUse),
            "maintenance" => Ok(ProductStatus::Maintenance),
            "lost" => Ok(ProductStatus::Lost),
            _ => Err(format!("Invalid ProductStatus: {}", s)),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "computing" => Ok(ProductCategory::Computing),
            "network" => Ok(ProductCategory::Network),
            "peripherals" => Ok(ProductCategory::Peripherals),
            "printing" => Ok(ProductCategory::Printing),
            "monitoring" => Ok(ProductCategory::Monitoring),
            "audiovideo" => Ok(ProductCategory::AudioVideo),
            _ => Err(format!("Invalid ProductCategory: {}", s)),
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MaintenanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "preventive" => Ok(MaintenanceType::Preventive),
            "corrective" => Ok(MaintenanceType::Corrective),
            _ => Err(format!("Invalid MaintenanceType: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "guest" => Ok(UserRole::Guest),
            "moderator" => Ok(UserRole::Moderator),
            "admin" | "administrator" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid UserRole: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip_through_from_str() {
        for status in ProductStatus::ALL {
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_category_codes_roundtrip_through_from_str() {
        for category in ProductCategory::ALL {
            assert_eq!(category.as_str().parse::<ProductCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_from_str_is_lenient_about_separators_and_case() {
        assert_eq!("In-Use".parse::<ProductStatus>().unwrap(), ProductStatus::InUse);
        assert_eq!("AUDIO VIDEO".parse::<ProductCategory>().unwrap(), ProductCategory::AudioVideo);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "broken".parse::<ProductStatus>().unwrap_err();
        assert!(err.contains("broken"));
        assert!("weekly".parse::<MaintenanceType>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case_codes() {
        let json = serde_json::to_string(&ProductStatus::InUse).unwrap();
        assert_eq!(json, "\"in_use\"");
        let json = serde_json::to_string(&ProductCategory::AudioVideo).unwrap();
        assert_eq!(json, "\"audio_video\"");
        let parsed: MaintenanceType = serde_json::from_str("\"corrective\"").unwrap();
        assert_eq!(parsed, MaintenanceType::Corrective);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProductStatus::Lost.label(), "Extraviado");
        assert_eq!(ProductCategory::Monitoring.label(), "Monitoramento");
        assert_eq!(MaintenanceType::Preventive.label(), "Manutenção Preventiva");
        assert_eq!(UserRole::Moderator.label(), "Moderador");
    }

    #[test]
    fn test_role_write_access() {
        assert!(!UserRole::Guest.can_write());
        assert!(UserRole::Moderator.can_write());
        assert!(UserRole::Admin.can_write());
    }
}
