//! Target metal catalog

use std::fmt;
use std::str::FromStr;

use crate::error::PhotoError;

/// Emitter plate materials. The catalog is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetMaterial {
    #[default]
    Sodium,
    Zinc,
    Calcium,
    Copper,
    Platinum,
}

impl TargetMaterial {
    /// Catalog order, as presented in the target selector
    pub const ALL: [TargetMaterial; 5] = [
        TargetMaterial::Sodium,
        TargetMaterial::Zinc,
        TargetMaterial::Calcium,
        TargetMaterial::Copper,
        TargetMaterial::Platinum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TargetMaterial::Sodium => "sodium",
            TargetMaterial::Zinc => "zinc",
            TargetMaterial::Calcium => "calcium",
            TargetMaterial::Copper => "copper",
            TargetMaterial::Platinum => "platinum",
        }
    }

    /// Work function in eV
    pub fn work_function_ev(&self) -> f64 {
        match self {
            TargetMaterial::Sodium => 2.35,
            TargetMaterial::Zinc => 4.24,
            TargetMaterial::Calcium => 2.80,
            TargetMaterial::Copper => 4.40,
            TargetMaterial::Platinum => 5.9,
        }
    }

    /// Optical power scale used by the photocurrent model (W-equivalent)
    pub fn reference_optical_power(&self) -> f64 {
        match self {
            TargetMaterial::Sodium => 5.159120066772471e-14,
            TargetMaterial::Zinc => 5.4195652077219776e-14,
            TargetMaterial::Calcium => 5.246463359088317e-14,
            TargetMaterial::Copper => 4.393591405908849e-14,
            TargetMaterial::Platinum => 3.697302254000795e-14,
        }
    }

    /// Look up a material by catalog key (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self, PhotoError> {
        let key = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| PhotoError::InvalidMaterial(key.to_string()))
    }
}

impl fmt::Display for TargetMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetMaterial {
    type Err = PhotoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(TargetMaterial::from_name("Platinum").unwrap(), TargetMaterial::Platinum);
        assert_eq!(" zinc ".parse::<TargetMaterial>().unwrap(), TargetMaterial::Zinc);
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        match TargetMaterial::from_name("gold") {
            Err(PhotoError::InvalidMaterial(name)) => assert_eq!(name, "gold"),
            other => panic!("expected InvalidMaterial, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_values_are_positive_and_unique() {
        for (i, a) in TargetMaterial::ALL.iter().enumerate() {
            assert!(a.work_function_ev() > 0.0);
            assert!(a.reference_optical_power() > 0.0);
            for b in &TargetMaterial::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_default_is_sodium() {
        assert_eq!(TargetMaterial::default(), TargetMaterial::Sodium);
        assert_eq!(TargetMaterial::Sodium.to_string(), "sodium");
    }
}
