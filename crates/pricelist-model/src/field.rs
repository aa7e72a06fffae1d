//! Canonical catalog fields that supplier columns are mapped onto.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A target field of the product catalog.
///
/// The declaration order is the schema order used for deterministic
/// tie-breaking during mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// Product name / description.
    Name,
    /// Supplier identifier (SKU, SUPC, item code).
    Identifier,
    /// Product category.
    Category,
    /// Selling unit of measure.
    Unit,
    /// Price per selling unit.
    UnitPrice,
    /// Storage location.
    Location,
    /// Descriptive pack size ("4 5LB LB").
    PackSize,
    /// Brand or manufacturer.
    Brand,
}

impl CanonicalField {
    /// Every field in schema order.
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Name,
        CanonicalField::Identifier,
        CanonicalField::Category,
        CanonicalField::Unit,
        CanonicalField::UnitPrice,
        CanonicalField::Location,
        CanonicalField::PackSize,
        CanonicalField::Brand,
    ];

    /// Stable machine key, as used in templates and config files.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Identifier => "identifier",
            Self::Category => "category",
            Self::Unit => "unit",
            Self::UnitPrice => "unit_price",
            Self::Location => "location",
            Self::PackSize => "pack_size",
            Self::Brand => "brand",
        }
    }

    /// Human-readable label, as shown in error reasons.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Identifier => "identifier",
            Self::Category => "category",
            Self::Unit => "unit",
            Self::UnitPrice => "unit price",
            Self::Location => "location",
            Self::PackSize => "pack size",
            Self::Brand => "brand",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    /// Accepts keys, labels and the common supplier aliases of the
    /// product database (`sku`, `price`, `product name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|ch| if ch == '-' || ch == ' ' { '_' } else { ch })
            .collect();
        let field = match normalized.as_str() {
            "name" | "product_name" => Self::Name,
            "identifier" | "id" | "sku" => Self::Identifier,
            "category" => Self::Category,
            "unit" | "uom" => Self::Unit,
            "unit_price" | "price" | "current_price_per_unit" => Self::UnitPrice,
            "location" => Self::Location,
            "pack_size" | "packsize" => Self::PackSize,
            "brand" => Self::Brand,
            _ => return Err(ModelError::UnknownField(s.trim().to_string())),
        };
        Ok(field)
    }
}

/// Whether a field must be present for a row to be importable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRequirement {
    Required,
    Optional,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_labels_and_aliases() {
        assert_eq!("unit_price".parse::<CanonicalField>().unwrap(), CanonicalField::UnitPrice);
        assert_eq!("Unit Price".parse::<CanonicalField>().unwrap(), CanonicalField::UnitPrice);
        assert_eq!("SKU".parse::<CanonicalField>().unwrap(), CanonicalField::Identifier);
        assert_eq!("pack-size".parse::<CanonicalField>().unwrap(), CanonicalField::PackSize);
        assert!("colour".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn keys_round_trip() {
        for field in CanonicalField::ALL {
            assert_eq!(field.key().parse::<CanonicalField>().unwrap(), field);
        }
    }
}
