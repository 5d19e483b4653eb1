// Author: Dustin Pilgrim
// License: MIT

use std::any::type_name;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{ConversionContext, Convertible, ElementRef, TypeDescriptor};
use crate::ast::Element;
use crate::error::OclError;

pub mod attribute;
pub mod block;
pub mod collection;

pub use attribute::AttributeConverter;
pub use block::{BlockAdapter, BlockConverter, DefaultBlockConverter};
pub use collection::CollectionConverter;

/// One link of the converter chain.
///
/// The context asks each converter in turn whether it claims a type; the
/// first that does handles the value in both directions. Converters call
/// back into the context for nested values.
pub trait Converter: Send + Sync {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool;

    /// Elements for `value`, written under the field name `name`. May be
    /// empty, or contain several elements for a collection.
    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError>;

    /// Rebuilds a value of type `ty` from one element. `current` holds the
    /// field's existing value, if any, so collections can accumulate.
    fn from_element(
        &self,
        ctx: &ConversionContext<'_>,
        ty: &TypeDescriptor,
        element: ElementRef<'_>,
        current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError>;

    fn element_name(&self, ctx: &ConversionContext<'_>, name: &str, _value: &dyn Convertible) -> String {
        ctx.format_name(name)
    }
}

/// User converters, kept in registration order.
///
/// Converters are stored by name. [`register`](Self::register) always
/// appends, naming the converter after its type (`Type`, then `Type#2`,
/// `Type#3` for further instances). [`register_named`](Self::register_named)
/// under a name that is already taken replaces that converter and keeps its
/// position.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: IndexMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `converter` after every converter registered so far.
    pub fn register<C: Converter + 'static>(&mut self, converter: C) -> &mut Self {
        let base = type_name::<C>();
        let mut name = base.to_string();
        let mut n = 1;
        while self.converters.contains_key(&name) {
            n += 1;
            name = format!("{}#{}", base, n);
        }
        self.register_named(name, converter)
    }

    pub fn register_named<C: Converter + 'static>(&mut self, name: impl Into<String>, converter: C) -> &mut Self {
        self.converters.insert(name.into(), Arc::new(converter));
        self
    }

    /// Removes a converter, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> bool {
        self.converters.shift_remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<dyn Converter>> {
        self.converters.values()
    }
}
