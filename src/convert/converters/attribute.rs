// Author: Dustin Pilgrim
// License: MIT

use super::Converter;
use crate::ast::{Attribute, Element, StringLiteral, Value};
use crate::convert::{ConversionContext, Convertible, ElementRef, Shape, TypeDescriptor};
use crate::error::OclError;

/// Scalars, and sequences of scalars, become `name = value` attributes.
/// Multi-line strings are written as heredocs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeConverter;

impl AttributeConverter {
    pub fn is_attribute_type(ty: &TypeDescriptor) -> bool {
        match ty.shape() {
            Shape::Sequence(seq) => is_scalar(&seq.item()),
            _ => is_scalar(ty),
        }
    }

    /// The literal for a scalar, optional or sequence value. `None` inside a
    /// sequence is skipped.
    pub fn to_value(value: &dyn Convertible) -> Result<Value, OclError> {
        let ty = value.type_descriptor();
        match ty.shape() {
            Shape::Scalar(scalar) => scalar.to_value(value),
            Shape::Optional(optional) => match optional.get(value) {
                Some(inner) => Self::to_value(inner),
                None => Ok(Value::Null),
            },
            Shape::Sequence(seq) => {
                let mut items = Vec::new();
                for item in seq.items(value) {
                    let item = Self::to_value(item)?;
                    if !item.is_null() {
                        items.push(item);
                    }
                }
                Ok(Value::Array(items))
            }
            _ => Err(OclError::unsupported(
                ty.name(),
                Some("Only scalars and sequences of scalars can be attribute values"),
            )),
        }
    }

    pub fn from_value(ty: &TypeDescriptor, value: &Value) -> Result<Box<dyn Convertible>, OclError> {
        match ty.shape() {
            Shape::Scalar(scalar) => scalar.from_value(value),
            Shape::Optional(optional) => {
                if value.is_null() {
                    optional.wrap(None)
                } else {
                    optional.wrap(Some(Self::from_value(&optional.inner(), value)?))
                }
            }
            Shape::Sequence(seq) => {
                let items = value.as_array().ok_or_else(|| {
                    OclError::conversion(
                        format!("Expected an array for {}, got {}", ty.name(), value.type_name()),
                        None,
                        401,
                    )
                })?;

                let item_ty = seq.item();
                let mut collection = seq.create();
                for item in items {
                    seq.push(&mut *collection, Self::from_value(&item_ty, item)?)?;
                }
                Ok(collection)
            }
            _ => Err(OclError::conversion(
                format!("{} cannot be read from an attribute value", ty.name()),
                None,
                402,
            )),
        }
    }
}

fn is_scalar(ty: &TypeDescriptor) -> bool {
    match ty.shape() {
        Shape::Scalar(_) => true,
        Shape::Optional(optional) => is_scalar(&optional.inner()),
        _ => false,
    }
}

impl Converter for AttributeConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        Self::is_attribute_type(ty)
    }

    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError> {
        let name = self.element_name(ctx, name, value);

        let value = match Self::to_value(value)? {
            Value::String(lit) if !lit.is_heredoc() && lit.value().contains('\n') => Value::String(
                StringLiteral::heredoc(lit.into_string(), ctx.options().format.default_heredoc_tag.clone()),
            ),
            other => other,
        };

        Ok(vec![Attribute::new(name, value).into()])
    }

    fn from_element(
        &self,
        _ctx: &ConversionContext<'_>,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        _current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        match element {
            ElementRef::Attribute(attribute) => Self::from_value(ty, attribute.value()),
            other => Err(OclError::conversion(
                format!("Cannot convert {} into the attribute type {}", other.describe(), ty.name()),
                Some("Write this field as 'name = value'"),
                402,
            )),
        }
    }
}
