// Author: Dustin Pilgrim
// License: MIT

//! Conversion between typed values and the document model.
//!
//! A [`ConversionContext`] walks a value through the converter chain: user
//! converters first, in registration order, then the attribute, collection
//! and block defaults. The first converter that claims a type handles it.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::{Attribute, Block, Body, Document, Element};
use crate::error::OclError;
use crate::options::SerializerOptions;

pub mod converters;
mod descriptor;
mod impls;
mod namer;

pub use converters::{
    AttributeConverter, BlockAdapter, BlockConverter, CollectionConverter, Converter, ConverterRegistry,
    DefaultBlockConverter,
};
pub use descriptor::{
    downcast, Convertible, FieldDescriptor, FieldRole, ItemsFn, ObjectBuilder, ObjectShape, OclType, OptionalShape,
    PushFn, ScalarShape, SequenceShape, Shape, TypeDescriptor,
};
pub use namer::{DefaultNamer, Namer, VerbatimNamer};

/// A borrowed node a value is read back from.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Attribute(&'a Attribute),
    Block(&'a Block),
    Document(&'a Document),
}

impl<'a> ElementRef<'a> {
    /// `None` for the document root.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            ElementRef::Attribute(a) => Some(a.name()),
            ElementRef::Block(b) => Some(b.name()),
            ElementRef::Document(_) => None,
        }
    }

    pub fn labels(&self) -> &'a [String] {
        match self {
            ElementRef::Block(b) => b.labels(),
            _ => &[],
        }
    }

    /// Child elements; `None` for an attribute.
    pub fn body(&self) -> Option<&'a Body> {
        match self {
            ElementRef::Attribute(_) => None,
            ElementRef::Block(b) => Some(b.body()),
            ElementRef::Document(d) => Some(d.body()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ElementRef::Attribute(a) => format!("attribute '{}'", a.name()),
            ElementRef::Block(b) => format!("block '{}'", b.name()),
            ElementRef::Document(_) => "the document root".to_string(),
        }
    }
}

impl<'a> From<&'a Element> for ElementRef<'a> {
    fn from(element: &'a Element) -> Self {
        match element {
            Element::Attribute(a) => ElementRef::Attribute(a),
            Element::Block(b) => ElementRef::Block(b),
        }
    }
}

impl<'a> From<&'a Document> for ElementRef<'a> {
    fn from(document: &'a Document) -> Self {
        ElementRef::Document(document)
    }
}

pub struct ConversionContext<'o> {
    options: &'o SerializerOptions,
    converters: Vec<Arc<dyn Converter>>,
}

impl<'o> ConversionContext<'o> {
    pub fn new(options: &'o SerializerOptions) -> Self {
        let mut converters: Vec<Arc<dyn Converter>> = options.converters.iter().cloned().collect();
        converters.push(Arc::new(AttributeConverter));
        converters.push(Arc::new(CollectionConverter));
        converters.push(Arc::new(BlockAdapter(DefaultBlockConverter)));

        Self { options, converters }
    }

    pub fn options(&self) -> &SerializerOptions {
        self.options
    }

    pub fn format_name(&self, name: &str) -> String {
        self.options.get_namer().format_name(name)
    }

    pub fn converter_for(&self, ty: &TypeDescriptor) -> Result<&dyn Converter, OclError> {
        match self.converters.iter().position(|c| c.can_convert(ty)) {
            Some(index) => {
                trace!(ty = ty.name(), index, "converter selected");
                Ok(self.converters[index].as_ref())
            }
            None => Err(OclError::ConverterNotFound {
                type_name: ty.name().to_string(),
                hint: Some("Register a converter that claims this type".into()),
                code: Some(410),
            }),
        }
    }

    /// Elements for `value` under the field name `name`. `None` yields none.
    pub fn to_elements(&self, name: &str, value: &dyn Convertible) -> Result<Vec<Element>, OclError> {
        let ty = value.type_descriptor();
        if let Shape::Optional(optional) = ty.shape() {
            return match optional.get(value) {
                Some(inner) => self.to_elements(name, inner),
                None => Ok(Vec::new()),
            };
        }

        self.converter_for(&ty)?.to_elements(self, name, value)
    }

    pub fn from_element(
        &self,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        if let Shape::Optional(optional) = ty.shape() {
            if let ElementRef::Attribute(attribute) = element {
                if attribute.value().is_null() {
                    return optional.wrap(None);
                }
            }
            let current = current.and_then(|c| optional.unwrap(c));
            let value = self.from_element(&optional.inner(), element, current)?;
            return optional.wrap(Some(value));
        }

        self.converter_for(ty)?.from_element(self, ty, element, current)
    }

    /// The root document for `value`: every field of an object, label fields
    /// included, becomes a top-level element.
    pub fn to_document(&self, value: &dyn Convertible) -> Result<Document, OclError> {
        let ty = value.type_descriptor();
        debug!(ty = ty.name(), "converting value to document");

        match ty.shape() {
            Shape::Optional(optional) => match optional.get(value) {
                Some(inner) => self.to_document(inner),
                None => Ok(Document::new()),
            },
            Shape::Object(object) => {
                let mut body = Body::new();
                for field in object.fields() {
                    for element in self.to_elements(field.name(), field.get(value)?)? {
                        body.push(element);
                    }
                }
                Ok(Document::from(body))
            }
            other => Err(OclError::conversion(
                format!("Cannot convert the {} type {} to a document", other.kind(), ty.name()),
                Some("Only objects can be the root of a document"),
                411,
            )),
        }
    }

    pub fn from_document<T: OclType>(&self, document: &Document) -> Result<T, OclError> {
        let ty = T::descriptor();
        debug!(ty = ty.name(), elements = document.body().len(), "converting document to value");

        let value = self.from_element(&ty, ElementRef::Document(document), None)?;
        downcast::<T>(value)
    }
}

#[cfg(test)]
mod tests;
