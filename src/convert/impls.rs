// Author: Dustin Pilgrim
// License: MIT

use std::any::{type_name, Any};
use std::collections::{BTreeSet, VecDeque};

use super::descriptor::{
    downcast, type_mismatch, Convertible, OclType, OptionalShape, SequenceShape, Shape, TypeDescriptor,
};
use crate::ast::{StringLiteral, Value};
use crate::error::OclError;

fn expected(kind: &str, value: &Value) -> OclError {
    OclError::conversion(
        format!("Expected {}, got {}", kind, value.type_name()),
        Some("Check the attribute's value in the document"),
        401,
    )
}

fn integer_from_value<N: TryFrom<i128>>(value: &Value) -> Result<N, OclError> {
    match value {
        Value::Integer(n) => N::try_from(*n).map_err(|_| {
            OclError::conversion(
                format!("Integer {} is out of range for {}", n, type_name::<N>()),
                None,
                408,
            )
        }),
        other => Err(expected("integer", other)),
    }
}

macro_rules! integer_types {
    ($($t:ty),*) => {
        $(
            impl OclType for $t {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::scalar::<$t>(
                        |n| {
                            i128::try_from(*n).map(Value::Integer).map_err(|_| {
                                OclError::unsupported(
                                    type_name::<$t>(),
                                    Some("Integers above i128::MAX have no OCL form"),
                                )
                            })
                        },
                        integer_from_value::<$t>,
                    )
                }
            }
        )*
    };
}

integer_types!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn float_from_value(value: &Value) -> Result<f64, OclError> {
    match value {
        Value::Float(f) => Ok(*f),
        // `2` parses as an integer
        Value::Integer(n) => Ok(*n as f64),
        other => Err(expected("number", other)),
    }
}

impl OclType for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<f64>(|f| Ok(Value::Float(*f)), float_from_value)
    }
}

impl OclType for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<f32>(
            |f| Ok(Value::Float(f64::from(*f))),
            |v| float_from_value(v).map(|f| f as f32),
        )
    }
}

impl OclType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<bool>(
            |b| Ok(Value::Bool(*b)),
            |v| match v {
                Value::Bool(b) => Ok(*b),
                other => Err(expected("bool", other)),
            },
        )
    }
}

impl OclType for char {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<char>(
            |c| Ok(Value::from(c.to_string())),
            |v| {
                let mut chars = v.as_str().ok_or_else(|| expected("single-character string", v))?.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(expected("single-character string", v)),
                }
            },
        )
    }
}

impl OclType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<String>(
            |s| Ok(Value::from(s.as_str())),
            |v| match v {
                Value::String(lit) => Ok(lit.value().to_string()),
                other => Err(expected("string", other)),
            },
        )
    }
}

/// Keeps the literal form, so a heredoc read from a document is written back
/// as a heredoc.
impl OclType for StringLiteral {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<StringLiteral>(
            |s| Ok(Value::String(s.clone())),
            |v| match v {
                Value::String(lit) => Ok(lit.clone()),
                other => Err(expected("string", other)),
            },
        )
    }
}

impl OclType for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Value>(|v| Ok(v.clone()), |v| Ok(v.clone()))
    }
}

impl<T: OclType> OclType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Option<T>>(Shape::Optional(OptionalShape::of::<T>()))
    }
}

fn items_of<C, T>(value: &dyn Any) -> Vec<&dyn Convertible>
where
    C: 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
    T: OclType,
{
    match value.downcast_ref::<C>() {
        Some(collection) => collection.into_iter().map(|item| item as &dyn Convertible).collect(),
        None => Vec::new(),
    }
}

fn boxed_items<T: OclType>(value: &dyn Any) -> Vec<&dyn Convertible> {
    match value.downcast_ref::<Box<[T]>>() {
        Some(items) => items.iter().map(|item| item as &dyn Convertible).collect(),
        None => Vec::new(),
    }
}

fn target<C: 'static>(target: &mut dyn Any) -> Result<&mut C, OclError> {
    target.downcast_mut::<C>().ok_or_else(type_mismatch::<C>)
}

fn vec_push<T: OclType>(collection: &mut dyn Any, item: Box<dyn Convertible>) -> Result<(), OclError> {
    target::<Vec<T>>(collection)?.push(downcast::<T>(item)?);
    Ok(())
}

fn deque_push<T: OclType>(collection: &mut dyn Any, item: Box<dyn Convertible>) -> Result<(), OclError> {
    target::<VecDeque<T>>(collection)?.push_back(downcast::<T>(item)?);
    Ok(())
}

fn set_push<T: OclType + Ord>(collection: &mut dyn Any, item: Box<dyn Convertible>) -> Result<(), OclError> {
    target::<BTreeSet<T>>(collection)?.insert(downcast::<T>(item)?);
    Ok(())
}

impl<T: OclType> OclType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence::<Vec<T>>(SequenceShape::new(
            T::descriptor,
            items_of::<Vec<T>, T>,
            || Box::new(Vec::<T>::new()),
            Some(vec_push::<T>),
        ))
    }
}

impl<T: OclType> OclType for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence::<VecDeque<T>>(SequenceShape::new(
            T::descriptor,
            items_of::<VecDeque<T>, T>,
            || Box::new(VecDeque::<T>::new()),
            Some(deque_push::<T>),
        ))
    }
}

impl<T: OclType + Ord> OclType for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence::<BTreeSet<T>>(SequenceShape::new(
            T::descriptor,
            items_of::<BTreeSet<T>, T>,
            || Box::new(BTreeSet::<T>::new()),
            Some(set_push::<T>),
        ))
    }
}

/// Fixed-size: can be written, but reading one back fails because items
/// cannot be added.
impl<T: OclType> OclType for Box<[T]> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence::<Box<[T]>>(SequenceShape::new(
            T::descriptor,
            boxed_items::<T>,
            || Box::new(Vec::<T>::new().into_boxed_slice()),
            None,
        ))
    }
}
