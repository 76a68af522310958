// In: src/record/mod.rs

//! Tagged records: structs whose fields map to columns.
//!
//! A record type lists its fields once through `TaggedRecord::field_decls`
//! (normally generated by `arrow_record!`). `RecordLayout::compile` turns that
//! list into the fixed column layout for the type: tags parsed, logical types
//! mapped, positions assigned, getter/setter function pointers captured. The
//! row loops then assign by position only and never look a field up by name.

mod macros;
pub mod native;

pub use native::ArrowNative;

use crate::error::ConvError;
use crate::mapper::{DeclaredType, TypeMapper};
use crate::types::FieldDescriptor;
use crate::value::Value;

pub type Getter<T> = fn(&T) -> Value;
pub type Setter<T> = fn(&mut T, Value) -> Result<(), ConvError>;

/// One struct field as declared, before its tag is interpreted.
pub struct FieldDecl<T> {
    /// The Rust field name, for error messages.
    pub field_name: &'static str,
    /// Raw `key = "value"` pairs from the field's `#[arrow(...)]` attribute.
    pub tag: &'static [(&'static str, &'static str)],
    pub declared: DeclaredType,
    pub nullable: bool,
    pub getter: Getter<T>,
    pub setter: Setter<T>,
}

/// A struct that can be encoded to and decoded from a table.
pub trait TaggedRecord: Default + Sized + 'static {
    fn field_decls() -> Vec<FieldDecl<Self>>;
}

/// The interpreted `arrow` tag of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    pub name: Option<String>,
    pub index: Option<usize>,
    pub arrow_type: Option<String>,
}

/// Parses a field's tag options.
///
/// Recognised keys are `name`, `index` and `arrow_type`. A field without any
/// option, with an unknown or repeated key, without `name` and `index`, or
/// with a non-numeric `index` is an `InvalidTag`.
pub fn parse_arrow_tag(field_name: &str, options: &[(&str, &str)]) -> Result<FieldTag, ConvError> {
    if options.is_empty() {
        return Err(ConvError::InvalidTag(format!(
            "missing `arrow` tag on field `{}`",
            field_name
        )));
    }
    let mut tag = FieldTag::default();
    for (key, value) in options {
        let value = value.trim();
        let duplicate = match *key {
            "name" => tag.name.replace(value.to_string()).is_some(),
            "arrow_type" => tag.arrow_type.replace(value.to_string()).is_some(),
            "index" => {
                let index = value.parse::<usize>().map_err(|_| {
                    ConvError::InvalidTag(format!(
                        "field `{}`: index \"{}\" is not a column position",
                        field_name, value
                    ))
                })?;
                tag.index.replace(index).is_some()
            }
            other => {
                return Err(ConvError::InvalidTag(format!(
                    "field `{}`: unknown option `{}`",
                    field_name, other
                )))
            }
        };
        if duplicate {
            return Err(ConvError::InvalidTag(format!(
                "field `{}`: option `{}` given twice",
                field_name, key
            )));
        }
    }
    if tag.name.is_none() && tag.index.is_none() {
        return Err(ConvError::InvalidTag(format!(
            "field `{}`: `arrow` tag needs `name` or `index`",
            field_name
        )));
    }
    Ok(tag)
}

/// Where a layout entry finds its column in a table being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Name(String),
    Position(usize),
}

pub struct LayoutEntry<T> {
    pub field_name: &'static str,
    pub descriptor: FieldDescriptor,
    pub selector: ColumnSelector,
    pub getter: Getter<T>,
    pub setter: Setter<T>,
}

/// The compiled column layout of a record type, in column order.
pub struct RecordLayout<T> {
    entries: Vec<LayoutEntry<T>>,
}

impl<T: TaggedRecord> RecordLayout<T> {
    /// Interprets every field's tag and fixes column positions.
    ///
    /// Fields with an `index` take that position; the rest fill the remaining
    /// positions in declaration order. Positions must be unique and dense.
    pub fn compile(mapper: &TypeMapper) -> Result<Self, ConvError> {
        let decls = T::field_decls();
        let count = decls.len();
        let mut slots: Vec<Option<LayoutEntry<T>>> = (0..count).map(|_| None).collect();
        let mut unplaced = Vec::new();

        for decl in decls {
            let tag = parse_arrow_tag(decl.field_name, decl.tag)?;
            let logical = mapper
                .map_declared_type(decl.declared, tag.arrow_type.as_deref())
                .map_err(|e| match e {
                    ConvError::UnsupportedType(msg) => {
                        ConvError::UnsupportedType(format!("field `{}`: {}", decl.field_name, msg))
                    }
                    other => other,
                })?;
            let (column_name, selector) = match (&tag.name, tag.index) {
                (Some(name), _) => (name.clone(), ColumnSelector::Name(name.clone())),
                (None, Some(index)) => (index.to_string(), ColumnSelector::Position(index)),
                (None, None) => {
                    return Err(ConvError::InternalError(format!(
                        "tag of field `{}` has neither name nor index",
                        decl.field_name
                    )))
                }
            };
            let entry = LayoutEntry {
                field_name: decl.field_name,
                descriptor: FieldDescriptor::new(column_name, logical, decl.nullable),
                selector,
                getter: decl.getter,
                setter: decl.setter,
            };
            match tag.index {
                Some(index) if index >= count => {
                    return Err(ConvError::InvalidTag(format!(
                        "field `{}`: index {} is past the last of {} columns",
                        decl.field_name, index, count
                    )))
                }
                Some(index) if slots[index].is_some() => {
                    return Err(ConvError::InvalidTag(format!(
                        "field `{}`: index {} is already taken",
                        decl.field_name, index
                    )))
                }
                Some(index) => slots[index] = Some(entry),
                None => unplaced.push(entry),
            }
        }

        let mut unplaced = unplaced.into_iter();
        let entries = slots
            .into_iter()
            .map(|slot| slot.or_else(|| unplaced.next()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ConvError::InternalError("record layout left a gap".to_string()))?;

        log::debug!(
            "compiled record layout for {} with {} columns",
            std::any::type_name::<T>(),
            entries.len()
        );
        Ok(Self { entries })
    }
}

impl<T> RecordLayout<T> {
    pub fn entries(&self) -> &[LayoutEntry<T>] {
        &self.entries
    }

    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The row of `record`'s values in column order.
    pub fn row_of(&self, record: &T) -> Vec<Value> {
        self.entries.iter().map(|e| (e.getter)(record)).collect()
    }
}
