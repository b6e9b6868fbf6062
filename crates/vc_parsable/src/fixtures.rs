//! Types shared by the unit tests.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::{ErrorKind, Parsable, ParsableRegistry, Slot, Specialized, TableBuilder, Value, report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

crate::impl_parsable_enum!(Color { Red, Green, Blue });

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Point {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

impl Parsable for Point {
    fn register_attributes(table: &mut TableBuilder<Self>) {
        table
            .serializable("x", Slot::required(|p: &Point| p.x.as_ref(), |p, v| p.x = Some(v)))
            .serializable("y", Slot::required(|p: &Point| p.y.as_ref(), |p, v| p.y = Some(v)));
    }
}

/// One attribute of every category.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Shape {
    pub id: Option<u32>,
    pub label: Option<String>,
    pub tags: BTreeSet<String>,
    pub color: Option<Color>,
    pub origin: Option<Point>,
    pub anchors: BTreeMap<String, Point>,
    pub path: Vec<Point>,
    pub note: Option<String>,
}

impl Parsable for Shape {
    fn register_attributes(table: &mut TableBuilder<Self>) {
        let tags = Slot::always(|s: &Shape| &s.tags, |s, v| s.tags = v).merge(|s, v| {
            s.tags.extend(v);
            Ok(())
        });
        let note = Specialized::new()
            .has(|s: &Shape| s.note.is_some())
            .encode(|s| Ok(Value::from(s.note.clone())))
            .decode(|s, value| match value {
                Value::String(text) => {
                    s.note = Some(text.to_owned());
                    Ok(())
                }
                Value::Null => {
                    s.note = None;
                    Ok(())
                }
                _ => Err(report(ErrorKind::TypeMismatch, "expected note text")),
            });

        table
            .specialized("note", note)
            .list_of_parsables("path", Slot::always(|s: &Shape| &s.path, |s, v| s.path = v))
            .dict_of_parsables("anchors", Slot::always(|s: &Shape| &s.anchors, |s, v| s.anchors = v))
            .parsable("origin", Slot::optional(|s: &Shape| s.origin.as_ref(), |s, v| s.origin = v))
            .enumeration("color", Slot::optional(|s: &Shape| s.color.as_ref(), |s, v| s.color = v))
            .serializable("id", Slot::required(|s: &Shape| s.id.as_ref(), |s, v| s.id = Some(v)))
            .serializable("label", Slot::optional(|s: &Shape| s.label.as_ref(), |s, v| s.label = v))
            .serializable("tags", tags);
    }
}

impl Shape {
    pub fn sample() -> Self {
        let mut anchors = BTreeMap::new();
        anchors.insert(String::from("north"), Point::new(0, 10));
        anchors.insert(String::from("south"), Point::new(0, -10));
        Self {
            id: Some(7),
            label: Some(String::from("kite")),
            tags: ["light", "red"].into_iter().map(String::from).collect(),
            color: Some(Color::Blue),
            origin: Some(Point::new(1, 2)),
            anchors,
            path: alloc::vec![Point::new(0, 0), Point::new(3, 4), Point::new(6, 0)],
            note: Some(String::from("fragile")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

crate::impl_parsable_enum!(Unit { Celsius, Fahrenheit });

/// Decoding `value` reads `unit`, so `unit` is parsed first.
#[derive(Debug, Default)]
pub struct Reading {
    pub unit: Option<Unit>,
    pub celsius: Option<f64>,
}

fn decode_reading(r: &mut Reading, value: &Value) -> crate::Result<()> {
    let Some(raw) = value.as_f64() else {
        return Err(report(ErrorKind::TypeMismatch, "expected a number"));
    };
    r.celsius = match r.unit {
        Some(Unit::Celsius) => Some(raw),
        Some(Unit::Fahrenheit) => Some((raw - 32.0) * 5.0 / 9.0),
        None => return Err(report(ErrorKind::UnsetAttribute, "unit is not set")),
    };
    Ok(())
}

impl Parsable for Reading {
    fn register_attributes(table: &mut TableBuilder<Self>) {
        let value = Specialized::new()
            .required()
            .has(|r: &Reading| r.celsius.is_some())
            .encode(|r| Ok(Value::from(r.celsius)))
            .decode(decode_reading);
        table
            .specialized("value", value)
            .enumeration("unit", Slot::required(|r: &Reading| r.unit.as_ref(), |r, v| r.unit = Some(v)))
            .order(&["unit"]);
    }
}

/// A singly linked chain, as deep as the input.
#[derive(Debug, Default, PartialEq)]
pub struct Node {
    pub value: u32,
    pub child: Option<Box<Node>>,
}

impl Node {
    pub fn chain(len: u32) -> Self {
        let mut node = Node { value: 0, child: None };
        for value in 1..len {
            node = Node {
                value,
                child: Some(Box::new(node)),
            };
        }
        node
    }
}

impl Parsable for Node {
    fn register_attributes(table: &mut TableBuilder<Self>) {
        table
            .serializable("value", Slot::always(|n: &Node| &n.value, |n, v| n.value = v))
            .parsable(
                "child",
                Slot::optional(|n: &Node| n.child.as_deref(), |n, v| n.child = v.map(Box::new)),
            );
    }
}

pub fn registry() -> ParsableRegistry {
    let mut registry = ParsableRegistry::new();
    registry.register::<Shape>().unwrap();
    registry.register::<Reading>().unwrap();
    registry.register::<Node>().unwrap();
    registry
}
