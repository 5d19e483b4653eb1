// Author: Dustin Pilgrim
// License: MIT

//! Runtime descriptions of convertible types.
//!
//! The converter chain works on type-erased values (`&dyn Convertible`). A
//! [`TypeDescriptor`] tells it what a value looks like: a scalar that maps
//! to a single [`Value`], an optional wrapper, a sequence of items, an object
//! with label and child fields, or an opaque type only a user converter can
//! handle.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use crate::ast::Value;
use crate::error::OclError;

/// A type the converter chain knows how to describe.
///
/// Implement this for your own types, usually with
/// [`TypeDescriptor::object`]:
///
/// ```
/// use ocl_cfg::convert::{OclType, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Car {
///     name: String,
///     doors: i32,
/// }
///
/// impl OclType for Car {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::object::<Car>()
///             .label(0, "name", |c| &c.name, |c| &mut c.name)
///             .field("doors", |c| &c.doors, |c| &mut c.doors)
///             .build()
///     }
/// }
/// ```
pub trait OclType: Any + Sized {
    fn descriptor() -> TypeDescriptor;
}

/// Object-safe view of an [`OclType`] value.
pub trait Convertible: Any + 'static {
    fn type_descriptor(&self) -> TypeDescriptor;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: OclType> Convertible for T {
    fn type_descriptor(&self) -> TypeDescriptor {
        T::descriptor()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Convertible {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for dyn Convertible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Convertible({})", self.type_descriptor().name())
    }
}

/// Unboxes a converted value into its concrete type.
pub fn downcast<T: Any>(value: Box<dyn Convertible>) -> Result<T, OclError> {
    value
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| type_mismatch::<T>())
}

pub(crate) fn type_mismatch<T>() -> OclError {
    OclError::conversion(
        format!("Expected a value of type {}", type_name::<T>()),
        Some("A converter returned a value of the wrong type"),
        409,
    )
}

pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    shape: Shape,
}

pub enum Shape {
    Scalar(ScalarShape),
    Optional(OptionalShape),
    Sequence(SequenceShape),
    Object(ObjectShape),
    /// Known to the type system but not to the default converters.
    Opaque,
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Scalar(_) => "scalar",
            Shape::Optional(_) => "optional",
            Shape::Sequence(_) => "sequence",
            Shape::Object(_) => "object",
            Shape::Opaque => "opaque",
        }
    }
}

impl TypeDescriptor {
    pub fn new<T: 'static>(shape: Shape) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape,
        }
    }

    /// A type written as a single attribute value.
    pub fn scalar<T: OclType>(
        to_value: fn(&T) -> Result<Value, OclError>,
        from_value: fn(&Value) -> Result<T, OclError>,
    ) -> Self {
        let to = move |any: &dyn Any| -> Result<Value, OclError> {
            let value = any.downcast_ref::<T>().ok_or_else(type_mismatch::<T>)?;
            to_value(value)
        };
        let from = move |value: &Value| -> Result<Box<dyn Convertible>, OclError> {
            from_value(value).map(|v| Box::new(v) as Box<dyn Convertible>)
        };

        Self::new::<T>(Shape::Scalar(ScalarShape {
            to_value: Box::new(to),
            from_value: Box::new(from),
        }))
    }

    pub fn sequence<T: OclType>(shape: SequenceShape) -> Self {
        Self::new::<T>(Shape::Sequence(shape))
    }

    pub fn opaque<T: OclType>() -> Self {
        Self::new::<T>(Shape::Opaque)
    }

    /// Starts describing a struct that can be created with `T::default()`.
    pub fn object<T: OclType + Default>() -> ObjectBuilder<T> {
        ObjectBuilder {
            factory: Some(T::default),
            fields: Vec::new(),
        }
    }

    /// Starts describing a struct the default block converter can write but
    /// not create. Reading one back needs a factory or a user converter.
    pub fn object_without_factory<T: OclType>() -> ObjectBuilder<T> {
        ObjectBuilder {
            factory: None,
            fields: Vec::new(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape.kind())
            .finish()
    }
}

type ToValue = Box<dyn Fn(&dyn Any) -> Result<Value, OclError>>;
type FromValue = Box<dyn Fn(&Value) -> Result<Box<dyn Convertible>, OclError>>;

pub struct ScalarShape {
    to_value: ToValue,
    from_value: FromValue,
}

impl ScalarShape {
    pub fn to_value(&self, value: &dyn Convertible) -> Result<Value, OclError> {
        (self.to_value)(value.as_any())
    }

    pub fn from_value(&self, value: &Value) -> Result<Box<dyn Convertible>, OclError> {
        (self.from_value)(value)
    }
}

/// `Option<T>`: unwrapped before a converter is chosen.
pub struct OptionalShape {
    inner: fn() -> TypeDescriptor,
    get: fn(&dyn Any) -> Option<&dyn Convertible>,
    wrap: fn(Option<Box<dyn Convertible>>) -> Result<Box<dyn Convertible>, OclError>,
    unwrap: fn(Box<dyn Convertible>) -> Option<Box<dyn Convertible>>,
}

impl OptionalShape {
    pub fn of<T: OclType>() -> Self {
        Self {
            inner: T::descriptor,
            get: option_get::<T>,
            wrap: option_wrap::<T>,
            unwrap: option_unwrap::<T>,
        }
    }

    pub fn inner(&self) -> TypeDescriptor {
        (self.inner)()
    }

    pub fn get<'a>(&self, value: &'a dyn Convertible) -> Option<&'a dyn Convertible> {
        (self.get)(value.as_any())
    }

    pub fn wrap(&self, value: Option<Box<dyn Convertible>>) -> Result<Box<dyn Convertible>, OclError> {
        (self.wrap)(value)
    }

    pub fn unwrap(&self, value: Box<dyn Convertible>) -> Option<Box<dyn Convertible>> {
        (self.unwrap)(value)
    }
}

fn option_get<T: OclType>(value: &dyn Any) -> Option<&dyn Convertible> {
    value
        .downcast_ref::<Option<T>>()?
        .as_ref()
        .map(|v| v as &dyn Convertible)
}

fn option_wrap<T: OclType>(value: Option<Box<dyn Convertible>>) -> Result<Box<dyn Convertible>, OclError> {
    let inner = match value {
        Some(v) => Some(downcast::<T>(v)?),
        None => None,
    };
    Ok(Box::new(inner))
}

fn option_unwrap<T: OclType>(value: Box<dyn Convertible>) -> Option<Box<dyn Convertible>> {
    match downcast::<Option<T>>(value) {
        Ok(Some(v)) => Some(Box::new(v)),
        _ => None,
    }
}

pub type ItemsFn = fn(&dyn Any) -> Vec<&dyn Convertible>;
pub type PushFn = fn(&mut dyn Any, Box<dyn Convertible>) -> Result<(), OclError>;

/// A container of items. `push` is `None` for containers that cannot grow
/// one item at a time, which makes them write-only.
pub struct SequenceShape {
    item: fn() -> TypeDescriptor,
    items: ItemsFn,
    create: fn() -> Box<dyn Convertible>,
    push: Option<PushFn>,
}

impl SequenceShape {
    pub fn new(
        item: fn() -> TypeDescriptor,
        items: ItemsFn,
        create: fn() -> Box<dyn Convertible>,
        push: Option<PushFn>,
    ) -> Self {
        Self { item, items, create, push }
    }

    pub fn item(&self) -> TypeDescriptor {
        (self.item)()
    }

    pub fn items<'a>(&self, value: &'a dyn Convertible) -> Vec<&'a dyn Convertible> {
        (self.items)(value.as_any())
    }

    pub fn create(&self) -> Box<dyn Convertible> {
        (self.create)()
    }

    pub fn can_push(&self) -> bool {
        self.push.is_some()
    }

    pub fn push(&self, target: &mut dyn Convertible, item: Box<dyn Convertible>) -> Result<(), OclError> {
        let name = target.type_descriptor().name();
        match self.push {
            Some(push) => push(target.as_any_mut(), item),
            None => Err(OclError::conversion(
                format!("The collection type {} has no way to add items", name),
                Some("Use a growable collection such as Vec for fields that are read back"),
                407,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Written as the block label at this ordinal.
    Label(u32),
    Child,
}

type Getter = Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Convertible>>;
type Setter = Box<dyn Fn(&mut dyn Any, Box<dyn Convertible>) -> Result<(), OclError>>;
type Taker = Box<dyn Fn(&mut dyn Any) -> Option<Box<dyn Convertible>>>;

pub struct FieldDescriptor {
    name: &'static str,
    role: FieldRole,
    ty: fn() -> TypeDescriptor,
    get: Getter,
    set: Setter,
    take: Taker,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> FieldRole {
        self.role
    }

    pub fn is_label(&self) -> bool {
        matches!(self.role, FieldRole::Label(_))
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        (self.ty)()
    }

    pub fn get<'a>(&self, target: &'a dyn Convertible) -> Result<&'a dyn Convertible, OclError> {
        (self.get)(target.as_any()).ok_or_else(|| self.wrong_owner(target))
    }

    pub fn set(&self, target: &mut dyn Convertible, value: Box<dyn Convertible>) -> Result<(), OclError> {
        (self.set)(target.as_any_mut(), value)
    }

    /// Moves the current value out, leaving the field's default behind.
    pub fn take(&self, target: &mut dyn Convertible) -> Option<Box<dyn Convertible>> {
        (self.take)(target.as_any_mut())
    }

    fn wrong_owner(&self, target: &dyn Convertible) -> OclError {
        OclError::conversion(
            format!(
                "Field '{}' does not belong to {}",
                self.name,
                target.type_descriptor().name()
            ),
            None,
            409,
        )
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

// Pins the closure to a higher-ranked signature so the returned borrow is
// tied to the argument.
fn getter<G>(g: G) -> Getter
where
    G: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Convertible> + 'static,
{
    Box::new(g)
}

pub struct ObjectShape {
    create: Option<Box<dyn Fn() -> Box<dyn Convertible>>>,
    fields: Vec<FieldDescriptor>,
}

impl ObjectShape {
    pub fn create(&self) -> Option<Box<dyn Convertible>> {
        self.create.as_ref().map(|create| create())
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Label fields ordered by ordinal.
    pub fn labels(&self) -> Vec<&FieldDescriptor> {
        let mut labels: Vec<&FieldDescriptor> = self.fields.iter().filter(|f| f.is_label()).collect();
        labels.sort_by_key(|f| match f.role {
            FieldRole::Label(ordinal) => ordinal,
            FieldRole::Child => u32::MAX,
        });
        labels
    }

    pub fn children(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_label())
    }
}

pub struct ObjectBuilder<T> {
    factory: Option<fn() -> T>,
    fields: Vec<FieldDescriptor>,
}

impl<T: OclType> ObjectBuilder<T> {
    pub fn factory(mut self, factory: fn() -> T) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Adds a field written as a block label. Labels are ordered by
    /// `ordinal`; the field must hold a string.
    pub fn label<F: OclType + Default>(
        self,
        ordinal: u32,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.push_field(FieldRole::Label(ordinal), name, get, get_mut)
    }

    /// Adds a field written as a child attribute or block.
    pub fn field<F: OclType + Default>(
        self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.push_field(FieldRole::Child, name, get, get_mut)
    }

    fn push_field<F: OclType + Default>(
        mut self,
        role: FieldRole,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        let set = move |any: &mut dyn Any, value: Box<dyn Convertible>| -> Result<(), OclError> {
            let target = any.downcast_mut::<T>().ok_or_else(type_mismatch::<T>)?;
            *get_mut(target) = downcast::<F>(value)?;
            Ok(())
        };
        let take = move |any: &mut dyn Any| -> Option<Box<dyn Convertible>> {
            any.downcast_mut::<T>()
                .map(|target| Box::new(std::mem::take(get_mut(target))) as Box<dyn Convertible>)
        };

        self.fields.push(FieldDescriptor {
            name,
            role,
            ty: F::descriptor,
            get: getter(move |any| any.downcast_ref::<T>().map(|t| get(t) as &dyn Convertible)),
            set: Box::new(set),
            take: Box::new(take),
        });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let create = self.factory.map(|factory| {
            Box::new(move || Box::new(factory()) as Box<dyn Convertible>) as Box<dyn Fn() -> Box<dyn Convertible>>
        });

        TypeDescriptor::new::<T>(Shape::Object(ObjectShape {
            create,
            fields: self.fields,
        }))
    }
}
