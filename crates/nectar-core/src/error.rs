use thiserror::Error;

use crate::ranges::RangeError;
use crate::types::{ContactId, FlowerId, PlantId};

/// Top-level error type for nectar-core.
#[derive(Debug, Error)]
pub enum NectarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Spawn error: {0}")]
    Spawn(#[from] SpawnError),

    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid physics_dt: {0} (must be > 0)")]
    InvalidPhysicsDt(f32),

    #[error("Invalid range for {field}: [{low}, {high}]")]
    InvalidRange { field: String, low: f32, high: f32 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid randomization range: {0}")]
    Range(#[from] RangeError),
}

/// Flower field composition and lookup errors.
///
/// `UnknownContact` signals that the collision system reported a surface the
/// field never registered: a scene consistency bug, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown contact surface: {0}")]
    UnknownContact(ContactId),

    #[error("Contact surface registered twice: {0}")]
    DuplicateContact(ContactId),

    #[error("Flower references unknown plant: {0}")]
    UnknownPlant(PlantId),

    #[error("Unknown flower: {0}")]
    UnknownFlower(FlowerId),
}

/// Spawn placement errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("No safe spawn position found after {attempts} attempts")]
    NoSafePosition { attempts: u32 },

    #[error("Cannot spawn in front of a flower: field has no flowers")]
    EmptyField,
}

/// Misuse of the motion controller's freeze/unfreeze hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Freeze is not supported in training mode")]
    FreezeInTraining,

    #[error("Unfreeze is not supported in training mode")]
    UnfreezeInTraining,
}

/// Action/observation validation errors.
///
/// Copy + static messages for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Action dimension mismatch: expected {expected}, got {got}")]
    ActionDimMismatch { expected: usize, got: usize },

    #[error("Action contains NaN")]
    ActionContainsNan,

    #[error("Action contains Inf")]
    ActionContainsInf,

    #[error("Observation dimension mismatch: expected {expected}, got {got}")]
    ObservationDimMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nectar_error_from_config_error() {
        let err = ConfigError::InvalidPhysicsDt(-1.0);
        let nectar_err: NectarError = err.into();
        assert!(matches!(nectar_err, NectarError::Config(_)));
        assert!(nectar_err.to_string().contains("-1"));
    }

    #[test]
    fn nectar_error_from_field_error() {
        let err = FieldError::UnknownContact(ContactId(7));
        let nectar_err: NectarError = err.into();
        assert!(matches!(nectar_err, NectarError::Field(_)));
        assert!(nectar_err.to_string().contains("contact#7"));
    }

    #[test]
    fn nectar_error_from_spawn_error() {
        let err = SpawnError::NoSafePosition { attempts: 100 };
        let nectar_err: NectarError = err.into();
        assert!(matches!(nectar_err, NectarError::Spawn(_)));
        assert!(nectar_err.to_string().contains("100 attempts"));
    }

    #[test]
    fn nectar_error_from_control_error() {
        let nectar_err: NectarError = ControlError::FreezeInTraining.into();
        assert!(matches!(nectar_err, NectarError::Control(_)));
    }

    #[test]
    fn nectar_error_from_validation_error() {
        let nectar_err: NectarError = ValidationError::ActionContainsNan.into();
        assert!(matches!(nectar_err, NectarError::Validation(_)));
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn validation_error_display_messages() {
        assert_eq!(
            ValidationError::ActionDimMismatch {
                expected: 5,
                got: 3
            }
            .to_string(),
            "Action dimension mismatch: expected 5, got 3"
        );
        assert_eq!(
            ValidationError::ActionContainsInf.to_string(),
            "Action contains Inf"
        );
        assert_eq!(
            ValidationError::ObservationDimMismatch {
                expected: 10,
                got: 8
            }
            .to_string(),
            "Observation dimension mismatch: expected 10, got 8"
        );
    }

    #[test]
    fn field_error_display_messages() {
        assert_eq!(
            FieldError::UnknownContact(ContactId(3)).to_string(),
            "Unknown contact surface: contact#3"
        );
        assert_eq!(
            FieldError::DuplicateContact(ContactId(4)).to_string(),
            "Contact surface registered twice: contact#4"
        );
        assert_eq!(
            FieldError::UnknownPlant(PlantId(2)).to_string(),
            "Flower references unknown plant: plant#2"
        );
        assert_eq!(
            FieldError::UnknownFlower(FlowerId(9)).to_string(),
            "Unknown flower: flower#9"
        );
    }

    #[test]
    fn spawn_and_control_error_display_messages() {
        assert_eq!(
            SpawnError::EmptyField.to_string(),
            "Cannot spawn in front of a flower: field has no flowers"
        );
        assert_eq!(
            ControlError::UnfreezeInTraining.to_string(),
            "Unfreeze is not supported in training mode"
        );
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::InvalidPhysicsDt(0.0).to_string(),
            "Invalid physics_dt: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidRange {
                field: "spawn.height".into(),
                low: 2.5,
                high: 1.2
            }
            .to_string(),
            "Invalid range for spawn.height: [2.5, 1.2]"
        );
    }
}
