#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::ast::{StringFormat, StringLiteral, Value};
#[cfg(test)]
use crate::options::FormatOptions;
#[cfg(test)]
use crate::writer::write_to_string;
#[cfg(test)]
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Default, Clone, PartialEq)]
struct Car {
    name: String,
    doors: i32,
    tags: Vec<String>,
    nickname: Option<String>,
}

impl OclType for Car {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Car>()
            .field("name", |c| &c.name, |c| &mut c.name)
            .field("doors", |c| &c.doors, |c| &mut c.doors)
            .field("tags", |c| &c.tags, |c| &mut c.tags)
            .field("nickname", |c| &c.nickname, |c| &mut c.nickname)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Garage {
    car: Vec<Car>,
}

impl OclType for Garage {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Garage>()
            .field("car", |g| &g.car, |g| &mut g.car)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Wheel {
    size: i32,
}

impl OclType for Wheel {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Wheel>()
            .field("size", |w| &w.size, |w| &mut w.size)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Axle {
    car: Vec<Wheel>,
}

impl OclType for Axle {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Axle>()
            .field("car", |a| &a.car, |a| &mut a.car)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Thing {
    label: String,
    size: i64,
}

impl OclType for Thing {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Thing>()
            .label(0, "label", |t| &t.label, |t| &mut t.label)
            .field("size", |t| &t.size, |t| &mut t.size)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Holder {
    thing: Thing,
    backup: Option<Thing>,
}

impl OclType for Holder {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Holder>()
            .field("thing", |h| &h.thing, |h| &mut h.thing)
            .field("backup", |h| &h.backup, |h| &mut h.backup)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Route {
    from: String,
    to: String,
    distance: f64,
}

impl OclType for Route {
    fn descriptor() -> TypeDescriptor {
        // Declared out of order on purpose
        TypeDescriptor::object::<Route>()
            .label(1, "to", |r| &r.to, |r| &mut r.to)
            .field("distance", |r| &r.distance, |r| &mut r.distance)
            .label(0, "from", |r| &r.from, |r| &mut r.from)
            .build()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Colour {
    #[default]
    Red,
    Green,
}

impl OclType for Colour {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Colour>(
            |c| {
                Ok(Value::from(match c {
                    Colour::Red => "Red",
                    Colour::Green => "Green",
                }))
            },
            |v| match v.as_str() {
                Some("Red") => Ok(Colour::Red),
                Some("Green") => Ok(Colour::Green),
                _ => Err(OclError::conversion("Unknown colour", None, 401)),
            },
        )
    }
}

#[derive(Debug, Default, PartialEq)]
struct Paint {
    main_colour: Colour,
    extras: VecDeque<Colour>,
    codes: BTreeSet<u8>,
    initial: char,
}

impl OclType for Paint {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Paint>()
            .field("MainColour", |p| &p.main_colour, |p| &mut p.main_colour)
            .field("extras", |p| &p.extras, |p| &mut p.extras)
            .field("codes", |p| &p.codes, |p| &mut p.codes)
            .field("initial", |p| &p.initial, |p| &mut p.initial)
            .build()
    }
}

#[derive(Debug, Default)]
struct Handle;

impl OclType for Handle {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::opaque::<Handle>()
    }
}

#[derive(Debug, Default)]
struct Connection {
    handle: Handle,
}

impl OclType for Connection {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Connection>()
            .field("handle", |c| &c.handle, |c| &mut c.handle)
            .build()
    }
}

#[derive(Debug, Default)]
struct Frozen {
    wheels: Box<[Wheel]>,
}

impl OclType for Frozen {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Frozen>()
            .field("wheels", |f| &f.wheels, |f| &mut f.wheels)
            .build()
    }
}

#[derive(Debug)]
struct Sealed {
    id: String,
}

impl OclType for Sealed {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object_without_factory::<Sealed>()
            .field("id", |s| &s.id, |s| &mut s.id)
            .build()
    }
}

#[derive(Debug, Default)]
struct Numbered {
    id: i32,
}

impl OclType for Numbered {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Numbered>()
            .label(0, "id", |n| &n.id, |n| &mut n.id)
            .build()
    }
}

fn to_document<T: OclType>(value: &T) -> Result<Document, OclError> {
    let options = SerializerOptions::default();
    ConversionContext::new(&options).to_document(value)
}

fn from_document<T: OclType>(document: &Document) -> Result<T, OclError> {
    let options = SerializerOptions::default();
    ConversionContext::new(&options).from_document::<T>(document)
}

fn write(document: &Document) -> String {
    write_to_string(document, &FormatOptions::default()).expect("Failed to write document")
}

#[test]
fn test_single_string_attribute() {
    let thing = Thing { label: "abc".into(), size: 0 };
    let doc = to_document(&thing).unwrap();
    assert_eq!(write(&doc), "label = \"abc\"\nsize = 0");
}

#[test]
fn test_collection_writes_sibling_blocks() {
    let axle = Axle {
        car: vec![Wheel { size: 1 }, Wheel { size: 2 }],
    };
    let doc = to_document(&axle).unwrap();

    let expected = "car {
    size = 1
}

car {
    size = 2
}";
    assert_eq!(write(&doc), expected);

    let back: Axle = from_document(&doc).unwrap();
    assert_eq!(back, axle);
}

#[test]
fn test_label_field_round_trip() {
    let holder = Holder {
        thing: Thing { label: "demo".into(), size: 3 },
        backup: None,
    };
    let doc = to_document(&holder).unwrap();
    let text = write(&doc);
    assert_eq!(text, "thing \"demo\" {\n    size = 3\n}");

    let parsed = crate::parser::parse(&text).unwrap();
    let back: Holder = from_document(&parsed).unwrap();
    assert_eq!(back.thing.label, "demo");
    assert_eq!(back, holder);
}

#[test]
fn test_optional_block_round_trip() {
    let holder = Holder {
        thing: Thing::default(),
        backup: Some(Thing { label: "spare".into(), size: 1 }),
    };
    let doc = to_document(&holder).unwrap();
    assert_eq!(doc.body().len(), 2);
    assert_eq!(doc.body().elements()[1].as_block().unwrap().labels(), ["spare".to_string()]);

    let back: Holder = from_document(&doc).unwrap();
    assert_eq!(back, holder);
}

#[test]
fn test_labels_follow_ordinals() {
    let route = Route {
        from: "here".into(),
        to: "there".into(),
        distance: 2.5,
    };
    let options = SerializerOptions::default();
    let ctx = ConversionContext::new(&options);
    let elements = ctx.to_elements("route", &route).unwrap();

    let block = elements[0].as_block().unwrap();
    assert_eq!(block.labels(), ["here".to_string(), "there".to_string()]);
    assert_eq!(block.body().len(), 1);

    let back = ctx
        .from_element(&Route::descriptor(), ElementRef::from(&elements[0]), None)
        .and_then(downcast::<Route>)
        .unwrap();
    assert_eq!(back, route);
}

#[test]
fn test_fewer_labels_than_fields_leaves_defaults() {
    let doc = Document::new().child(Block::new("route").label("only"));
    let options = SerializerOptions::default();
    let ctx = ConversionContext::new(&options);

    let route = ctx
        .from_element(&Route::descriptor(), ElementRef::from(&doc.body().elements()[0]), None)
        .and_then(downcast::<Route>)
        .unwrap();
    assert_eq!(route.from, "only");
    assert_eq!(route.to, "");
}

#[test]
fn test_too_many_labels() {
    let doc = Document::new().child(Block::new("thing").label("a").label("b"));
    let err = from_document::<Holder>(&doc).unwrap_err();

    match err {
        OclError::ConversionError { message, code, .. } => {
            assert_eq!(code, Some(403));
            assert!(message.contains("defines 2 labels (a, b)"), "{}", message);
            assert!(message.contains("only has 1 label properties"), "{}", message);
        }
        other => panic!("Expected conversion error, got {:?}", other),
    }
}

#[test]
fn test_non_string_label_field() {
    let err = to_document(&Wrapper { numbered: Numbered { id: 7 } }).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(405), .. }));

    let doc = Document::new().child(Block::new("numbered").label("7"));
    let err = from_document::<Wrapper>(&doc).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(405), .. }));
}

#[derive(Debug, Default)]
struct Wrapper {
    numbered: Numbered,
}

impl OclType for Wrapper {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object::<Wrapper>()
            .field("numbered", |w| &w.numbered, |w| &mut w.numbered)
            .build()
    }
}

#[test]
fn test_unknown_child_is_rejected() {
    let doc = Document::new().child(Block::new("car").child(Attribute::new("wheels", 4)));
    let err = from_document::<Garage>(&doc).unwrap_err();

    match err {
        OclError::ConversionError { message, code, .. } => {
            assert_eq!(code, Some(404));
            assert!(message.contains("'wheels'"), "{}", message);
        }
        other => panic!("Expected conversion error, got {:?}", other),
    }
}

#[test]
fn test_attribute_where_block_expected() {
    let doc = Document::new().child(Attribute::new("thing", "demo"));
    let err = from_document::<Holder>(&doc).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(402), .. }));
}

#[test]
fn test_optional_and_sequence_attributes() {
    let car = Car {
        name: "Mini".into(),
        doors: 3,
        tags: vec!["small".into(), "red".into()],
        nickname: None,
    };
    let doc = to_document(&car).unwrap();

    let names: Vec<&str> = doc.iter().map(Element::name).collect();
    assert_eq!(names, vec!["name", "doors", "tags"]);
    assert_eq!(write(&doc), "name = \"Mini\"\ndoors = 3\ntags = [\"small\", \"red\"]");

    let back: Car = from_document(&doc).unwrap();
    assert_eq!(back, car);

    let named = Car {
        nickname: Some("Zippy".into()),
        ..car
    };
    let back: Car = from_document(&to_document(&named).unwrap()).unwrap();
    assert_eq!(back.nickname.as_deref(), Some("Zippy"));
}

#[test]
fn test_null_attribute_reads_as_none() {
    let doc = Document::new().child(Attribute::new("nickname", Value::Null));
    let car: Car = from_document(&doc).unwrap();
    assert_eq!(car.nickname, None);
}

#[test]
fn test_multiline_string_becomes_heredoc() {
    let car = Car {
        name: "line one\nline two".into(),
        ..Car::default()
    };
    let doc = to_document(&car).unwrap();

    match doc.body().elements()[0].as_attribute().unwrap().value() {
        Value::String(lit) => {
            assert_eq!(lit.format(), StringFormat::Heredoc);
            assert_eq!(lit.heredoc_tag(), Some("EOT"));
        }
        other => panic!("Expected a string, got {:?}", other),
    }

    let text = write(&doc);
    assert!(text.starts_with("name = <<EOT\nline one\nline two\nEOT\n"), "{}", text);

    let back: Car = from_document(&crate::parser::parse(&text).unwrap()).unwrap();
    assert_eq!(back.name, "line one\nline two");
}

#[test]
fn test_string_literal_field_keeps_its_form() {
    #[derive(Debug, Default)]
    struct Script {
        body: Option<StringLiteral>,
    }

    impl OclType for Script {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::object::<Script>()
                .field("body", |s| &s.body, |s| &mut s.body)
                .build()
        }
    }

    let script = Script {
        body: Some(StringLiteral::indented_heredoc("echo hi", "SH")),
    };
    let text = write(&to_document(&script).unwrap());
    assert_eq!(text, "body = <<-SH\necho hi\nSH");
}

#[test]
fn test_enums_collections_and_naming() {
    let paint = Paint {
        main_colour: Colour::Green,
        extras: VecDeque::from(vec![Colour::Red, Colour::Green]),
        codes: BTreeSet::from([3, 1]),
        initial: 'x',
    };
    let doc = to_document(&paint).unwrap();

    let expected = r#"main_colour = "Green"
extras = ["Red", "Green"]
codes = [1, 3]
initial = "x""#;
    assert_eq!(write(&doc), expected);

    let back: Paint = from_document(&doc).unwrap();
    assert_eq!(back, paint);
}

#[test]
fn test_children_match_declared_names() {
    let doc = Document::new().child(Attribute::new("MainColour", "Red"));
    let paint: Paint = from_document(&doc).unwrap();
    assert_eq!(paint.main_colour, Colour::Red);
}

#[test]
fn test_integer_range_is_checked() {
    let doc = Document::new().child(Attribute::new("codes", vec![1, 300]));
    let err = from_document::<Paint>(&doc).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(408), .. }));

    let doc = Document::new().child(Attribute::new("initial", "xy"));
    let err = from_document::<Paint>(&doc).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(401), .. }));
}

#[test]
fn test_opaque_type_has_no_converter() {
    let err = to_document(&Connection::default()).unwrap_err();
    match err {
        OclError::ConverterNotFound { type_name, .. } => assert!(type_name.ends_with("Handle")),
        other => panic!("Expected converter not found, got {:?}", other),
    }
}

#[test]
fn test_fixed_size_collection_is_write_only() {
    let frozen = Frozen {
        wheels: vec![Wheel { size: 1 }].into_boxed_slice(),
    };
    let doc = to_document(&frozen).unwrap();
    assert_eq!(write(&doc), "wheels {\n    size = 1\n}");

    let err = from_document::<Frozen>(&doc).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(407), .. }));
}

#[test]
fn test_type_without_factory_cannot_be_read() {
    let sealed = Sealed { id: "x".into() };
    let doc = to_document(&sealed).unwrap();
    assert_eq!(write(&doc), "id = \"x\"");

    let err = from_document::<Sealed>(&doc).unwrap_err();
    match err {
        OclError::ConversionError { message, .. } => assert!(message.starts_with("Could not create instance of")),
        other => panic!("Expected conversion error, got {:?}", other),
    }
}

#[test]
fn test_root_document_edge_cases() {
    let none: Option<Car> = None;
    assert_eq!(to_document(&none).unwrap(), Document::new());

    let err = to_document(&42i32).unwrap_err();
    assert!(matches!(err, OclError::ConversionError { code: Some(411), .. }));

    // Label fields are plain children at the root
    let thing = Thing { label: "root".into(), size: 9 };
    let doc = to_document(&thing).unwrap();
    assert_eq!(doc.body().elements()[0], Element::from(Attribute::new("label", "root")));
    let back: Thing = from_document(&doc).unwrap();
    assert_eq!(back, thing);
}

struct CarAsName;

impl Converter for CarAsName {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Car>()
    }

    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError> {
        let car = value.downcast_ref::<Car>().expect("claimed type");
        Ok(vec![Attribute::new(self.element_name(ctx, name, value), car.name.as_str()).into()])
    }

    fn from_element(
        &self,
        _ctx: &ConversionContext<'_>,
        _ty: &TypeDescriptor,
        element: ElementRef<'_>,
        _current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        match element {
            ElementRef::Attribute(a) => Ok(Box::new(Car {
                name: a.value().as_str().unwrap_or_default().to_string(),
                ..Car::default()
            })),
            other => Err(OclError::conversion(format!("Unexpected {}", other.describe()), None, 402)),
        }
    }
}

#[test]
fn test_user_converter_takes_priority() {
    let garage = Garage {
        car: vec![
            Car { name: "a".into(), ..Car::default() },
            Car { name: "b".into(), ..Car::default() },
        ],
    };

    let options = SerializerOptions::new().converter(CarAsName);
    let ctx = ConversionContext::new(&options);
    let doc = ctx.to_document(&garage).unwrap();
    assert_eq!(write(&doc), "car = \"a\"\ncar = \"b\"");

    let back: Garage = ctx.from_document(&doc).unwrap();
    assert_eq!(back, garage);
}

#[test]
fn test_removed_converter_falls_through() {
    let garage = Garage {
        car: vec![Car { name: "a".into(), ..Car::default() }],
    };

    let mut options = SerializerOptions::new().converter(CarAsName);
    assert!(options.converters.remove(std::any::type_name::<CarAsName>()));
    assert!(options.converters.is_empty());

    let doc = ConversionContext::new(&options).to_document(&garage).unwrap();
    assert!(doc.body().elements()[0].is_block());
}

#[test]
fn test_registry_replaces_by_name() {
    let mut registry = ConverterRegistry::new();
    registry.register_named("cars", CarAsName);
    registry.register_named("blocks", BlockAdapter(DefaultBlockConverter));
    registry.register_named("cars", CarAsName);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["cars", "blocks"]);
    assert!(registry.contains("blocks"));
    assert!(!registry.remove("missing"));
}

struct Tagged(&'static str);

impl Converter for Tagged {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Car>()
    }

    fn to_elements(
        &self,
        ctx: &ConversionContext<'_>,
        name: &str,
        value: &dyn Convertible,
    ) -> Result<Vec<Element>, OclError> {
        Ok(vec![Attribute::new(self.element_name(ctx, name, value), self.0).into()])
    }

    fn from_element(
        &self,
        _ctx: &ConversionContext<'_>,
        _ty: &TypeDescriptor,
        _element: ElementRef<'_>,
        _current: Option<Box<dyn Convertible>>,
    ) -> Result<Box<dyn Convertible>, OclError> {
        Ok(Box::new(Car {
            name: self.0.to_string(),
            ..Car::default()
        }))
    }
}

#[test]
fn test_converters_of_one_type_keep_registration_order() {
    let garage = Garage {
        car: vec![Car { name: "a".into(), ..Car::default() }],
    };

    let mut options = SerializerOptions::new().converter(Tagged("first")).converter(Tagged("second"));
    assert_eq!(options.converters.len(), 2);

    let doc = ConversionContext::new(&options).to_document(&garage).unwrap();
    assert_eq!(write(&doc), "car = \"first\"");

    let first = std::any::type_name::<Tagged>();
    let second = format!("{}#2", first);
    assert_eq!(options.converters.names().collect::<Vec<_>>(), vec![first, second.as_str()]);

    assert!(options.converters.remove(first));
    let doc = ConversionContext::new(&options).to_document(&garage).unwrap();
    assert_eq!(write(&doc), "car = \"second\"");
}

struct LoudCars;

impl BlockConverter for LoudCars {
    fn can_convert(&self, ty: &TypeDescriptor) -> bool {
        ty.is::<Wheel>()
    }

    fn block_name(&self, _ctx: &ConversionContext<'_>, name: &str, _value: &dyn Convertible) -> Result<String, OclError> {
        Ok(name.to_uppercase())
    }
}

#[test]
fn test_block_converter_hooks() {
    let axle = Axle {
        car: vec![Wheel { size: 5 }],
    };
    let options = SerializerOptions::new().converter(BlockAdapter(LoudCars));
    let doc = ConversionContext::new(&options).to_document(&axle).unwrap();
    assert_eq!(write(&doc), "CAR {\n    size = 5\n}");
}

struct Shouting;

impl Namer for Shouting {
    fn format_name(&self, name: &str) -> String {
        name.to_uppercase()
    }
}

#[test]
fn test_custom_namer_is_used_both_ways() {
    let options = SerializerOptions::new().namer(Shouting);
    let ctx = ConversionContext::new(&options);

    let wheel = Wheel { size: 4 };
    let doc = ctx.to_document(&wheel).unwrap();
    assert_eq!(write(&doc), "SIZE = 4");

    let back: Wheel = ctx.from_document(&doc).unwrap();
    assert_eq!(back, wheel);
}

#[test]
fn test_unsigned_above_i128_is_unsupported() {
    #[derive(Debug, Default)]
    struct Huge {
        n: u128,
    }

    impl OclType for Huge {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::object::<Huge>().field("n", |h| &h.n, |h| &mut h.n).build()
        }
    }

    assert!(to_document(&Huge { n: 1 }).is_ok());
    let err = to_document(&Huge { n: u128::MAX }).unwrap_err();
    assert!(matches!(err, OclError::UnsupportedValueType { .. }));
}
