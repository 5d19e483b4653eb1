// Author: Dustin Pilgrim
// License: MIT

//! Objects as blocks.
//!
//! [`BlockConverter`] splits block conversion into hooks so a custom
//! converter can change one part (the name, the labels, the body) and keep
//! the default behaviour for the rest. [`BlockAdapter`] puts one into the
//! converter chain.

use super::{AttributeConverter, Converter};
use crate::ast::{Block, Body, Element, Value};
use crate::convert::{
    ConversionContext, Convertible, ElementRef, FieldDescriptor, ObjectShape, Shape, TypeDescriptor,
};
use crate::error::OclError;

pub trait BlockConverter: Send + Sync {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty.shape(), Shape::Object(_))
    }

    fn block_name(&self, ctx: &ConversionContext<'_>, name: &str, _value: &dyn Convertible) -> Result<String, OclError> {
        Ok(ctx.format_name(name))
    }

    fn labels(&self, _ctx: &ConversionContext<'_>, value: &dyn Convertible) -> Result<Vec<String>, OclError> {
        default_labels(value)
    }

    fn elements(&self, ctx: &ConversionContext<'_>, value: &dyn Convertible) -> Result<Vec<Element>, OclError> {
        default_elements(ctx, value)
    }

    fn from_block(
        &self,
        ctx: &ConversionContext<'_>,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        _current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        default_from_block(ctx, ty, element)
    }
}

/// Every object becomes a block: label fields in ordinal order, then one
/// child per remaining field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBlockConverter;

impl BlockConverter for DefaultBlockConverter {}

#[derive(Debug, Clone, Default)]
pub struct BlockAdapter<B>(pub B);

impl<B: BlockConverter> Converter for BlockAdapter<B> {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        self.0.can_convert(ty)
    }

    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError> {
        let name = self.0.block_name(ctx, name, value)?;
        let labels = self.0.labels(ctx, value)?;
        let body = Body::from(self.0.elements(ctx, value)?);
        Ok(vec![Block::with_parts(name, labels, body).into()])
    }

    fn from_element(
        &self,
        ctx: &ConversionContext<'_>,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        self.0.from_block(ctx, ty, element, current)
    }
}

fn object_shape(ty: &TypeDescriptor) -> Result<&ObjectShape, OclError> {
    match ty.shape() {
        Shape::Object(object) => Ok(object),
        other => Err(OclError::conversion(
            format!("{} is a {} type, not an object", ty.name(), other.kind()),
            Some("Describe the type with TypeDescriptor::object"),
            406,
        )),
    }
}

pub fn default_labels(value: &dyn Convertible) -> Result<Vec<String>, OclError> {
    let ty = value.type_descriptor();
    let object = object_shape(&ty)?;

    object
        .labels()
        .into_iter()
        .map(|field| label_text(&ty, field, field.get(value)?))
        .collect()
}

fn label_text(ty: &TypeDescriptor, field: &FieldDescriptor, value: &dyn Convertible) -> Result<String, OclError> {
    match AttributeConverter::to_value(value)? {
        Value::String(lit) => Ok(lit.into_string()),
        Value::Null => Err(OclError::conversion(
            format!("Labels cannot be null ({}.{})", ty.name(), field.name()),
            None,
            405,
        )),
        other => Err(OclError::conversion(
            format!(
                "Labels must be strings ({}.{} is {})",
                ty.name(),
                field.name(),
                other.type_name()
            ),
            Some("Only string fields can be labels"),
            405,
        )),
    }
}

pub fn default_elements(ctx: &ConversionContext<'_>, value: &dyn Convertible) -> Result<Vec<Element>, OclError> {
    let ty = value.type_descriptor();
    let object = object_shape(&ty)?;

    let mut elements = Vec::new();
    for field in object.children() {
        elements.extend(ctx.to_elements(field.name(), field.get(value)?)?);
    }
    Ok(elements)
}

/// Root documents carry label fields as ordinary children, so they are
/// matched by name there.
pub fn default_from_block(
    ctx: &ConversionContext<'_>,
    ty: &TypeDescriptor,
    element: ElementRef<'_>,
) -> Result<Box<dyn Convertible>, OclError> {
    let object = object_shape(ty)?;

    let mut target = object.create().ok_or_else(|| {
        OclError::conversion(
            format!("Could not create instance of {}", ty.name()),
            Some("Give the type a factory, or register a converter for it"),
            406,
        )
    })?;

    let body = element.body().ok_or_else(|| {
        OclError::conversion(
            format!("Cannot convert {} into the block type {}", element.describe(), ty.name()),
            Some("Write this field as a block"),
            402,
        )
    })?;

    if !element.labels().is_empty() {
        set_labels(ty, object, element, &mut *target)?;
    }

    let fields: Vec<&FieldDescriptor> = match element {
        ElementRef::Document(_) => object.fields().iter().collect(),
        _ => object.children().collect(),
    };
    set_properties(ctx, ty, &fields, body, &mut *target)?;

    Ok(target)
}

fn set_labels(
    ty: &TypeDescriptor,
    object: &ObjectShape,
    element: ElementRef<'_>,
    target: &mut dyn Convertible,
) -> Result<(), OclError> {
    let labels = element.labels();
    let fields = object.labels();

    if labels.len() > fields.len() {
        return Err(OclError::conversion(
            format!(
                "The block '{}' defines {} labels ({}) but the type {} only has {} label properties",
                element.name().unwrap_or_default(),
                labels.len(),
                labels.join(", "),
                ty.name(),
                fields.len()
            ),
            Some("Remove the extra labels or add label fields to the type"),
            403,
        ));
    }

    for (label, field) in labels.iter().zip(fields) {
        let value = AttributeConverter::from_value(&field.type_descriptor(), &Value::from(label.as_str()))
            .map_err(|_| {
                OclError::conversion(
                    format!("The label field {}.{} cannot hold the label '{}'", ty.name(), field.name(), label),
                    Some("Only string fields can be labels"),
                    405,
                )
            })?;
        field.set(target, value)?;
    }

    Ok(())
}

fn set_properties(
    ctx: &ConversionContext<'_>,
    ty: &TypeDescriptor,
    fields: &[&FieldDescriptor],
    body: &Body,
    target: &mut dyn Convertible,
) -> Result<(), OclError> {
    for child in body {
        let name = child.name();
        let field = fields
            .iter()
            .find(|f| f.name() == name || ctx.format_name(f.name()) == name)
            .ok_or_else(|| {
                OclError::conversion(
                    format!("The property '{}' was not found on '{}'", name, ty.name()),
                    None,
                    404,
                )
            })?;

        let current = field.take(target);
        let value = ctx.from_element(&field.type_descriptor(), ElementRef::from(child), current)?;
        field.set(target, value)?;
    }

    Ok(())
}
