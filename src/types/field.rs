use arrow_schema::Field;
use serde::{Deserialize, Serialize};

use crate::error::ConvError;
use crate::types::LogicalType;

/// One column of a schema: name, logical type, nullability.
///
/// Identity is name plus position; the position lives on the handler that owns
/// the descriptor, not here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, logical_type: LogicalType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable,
        }
    }

    pub fn to_arrow_field(&self) -> Field {
        Field::new(
            self.name.clone(),
            self.logical_type.to_arrow_type(),
            self.nullable,
        )
    }

    pub fn from_arrow_field(field: &Field) -> Result<Self, ConvError> {
        Ok(Self {
            name: field.name().clone(),
            logical_type: LogicalType::from_arrow_type(field.data_type())?,
            nullable: field.is_nullable(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::DataType;

    #[test]
    fn test_arrow_field_roundtrip() {
        let descriptor = FieldDescriptor::new(
            "amount",
            LogicalType::Decimal {
                precision: 10,
                scale: 2,
            },
            true,
        );
        let field = descriptor.to_arrow_field();
        assert_eq!(field.name(), "amount");
        assert_eq!(field.data_type(), &DataType::Decimal128(10, 2));
        assert!(field.is_nullable());
        assert_eq!(FieldDescriptor::from_arrow_field(&field).unwrap(), descriptor);
    }
}
