// Author: Dustin Pilgrim
// License: MIT

use super::Converter;
use crate::ast::Element;
use crate::convert::{ConversionContext, Convertible, ElementRef, Shape, TypeDescriptor};
use crate::error::OclError;

/// Sequences of non-scalars: each item is written under the collection's
/// name, so `cars: Vec<Car>` becomes one `cars` block per car.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionConverter;

fn not_a_sequence(ty: &TypeDescriptor) -> OclError {
    OclError::conversion(format!("{} is not a sequence type", ty.name()), None, 409)
}

impl Converter for CollectionConverter {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty.shape(), Shape::Sequence(_))
    }

    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError> {
        let ty = value.type_descriptor();
        let Shape::Sequence(seq) = ty.shape() else {
            return Err(not_a_sequence(&ty));
        };

        let mut elements = Vec::new();
        for item in seq.items(value) {
            elements.extend(ctx.to_elements(name, item)?);
        }
        Ok(elements)
    }

    /// Adds one item per element to the collection the field already holds.
    fn from_element(
        &self,
        ctx: &ConversionContext<'_>,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        let Shape::Sequence(seq) = ty.shape() else {
            return Err(not_a_sequence(ty));
        };

        let mut collection = current.unwrap_or_else(|| seq.create());
        let item = ctx.from_element(&seq.item(), element, None)?;
        seq.push(&mut *collection, item)?;
        Ok(collection)
    }
}
