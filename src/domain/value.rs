//! In-memory payload attached to a log record.
//!
//! `Value` is a closed set of variants. Composite variants hold a [`Handle`], a shared and
//! mutable reference with a stable identity, so callers can build graphs that refer back to
//! themselves. The normalizer relies on that identity for cycle detection.

use super::error_value::ErrorValue;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::{BorrowError, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Shared handle to a composite value.
pub struct Handle<T>(Rc<RefCell<T>>);

pub type Object = Handle<Vec<(String, Value)>>;
pub type Array = Handle<Vec<Value>>;
pub type Map = Handle<Vec<(Value, Value)>>;

impl<T> Handle<T> {
    pub fn new(inner: T) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }

    /// Address of the shared allocation. Equal for every clone of the same handle.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.0.try_borrow()
    }
}

impl<T: Default> Default for Handle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

// Contents are not printed: a handle may be part of a cycle.
impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.id())
    }
}

impl Handle<Vec<(String, Value)>> {
    /// Inserts or replaces a member. A replaced member keeps its position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.borrow_mut();
        let index = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

impl Handle<Vec<Value>> {
    pub fn push(&self, value: impl Into<Value>) {
        self.borrow_mut().push(value.into());
    }

    /// Adds an element unless an equal one (by [`Value::same_value`]) is present.
    pub fn add(&self, value: impl Into<Value>) {
        let value = value.into();
        let mut items = self.borrow_mut();
        if !items.iter().any(|existing| existing.same_value(&value)) {
            items.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

impl Handle<Vec<(Value, Value)>> {
    /// Sets the value for a key, replacing the value of an equal key in place.
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.borrow_mut();
        match entries.iter_mut().find(|(k, _)| k.same_value(&key)) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

/// A value with no JSON counterpart, such as a callback or an OS handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    pub type_name: String,
    /// Best-effort text form. `None` means the value is left out of the output.
    pub repr: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    BigInt(i128),
    Buffer(Bytes),
    Date(DateTime<Utc>),
    Array(Array),
    Object(Object),
    Map(Map),
    Set(Array),
    Error(ErrorValue),
    Opaque(Opaque),
}

impl Value {
    pub fn object() -> Self {
        Value::Object(Object::default())
    }

    pub fn array() -> Self {
        Value::Array(Array::default())
    }

    pub fn object_from<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let object = Object::default();
        for (key, value) in entries {
            object.insert(key, value);
        }
        Value::Object(object)
    }

    pub fn array_from<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Array(Array::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn map_from<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Map::default();
        for (key, value) in entries {
            map.set(key, value);
        }
        Value::Map(map)
    }

    pub fn set_from<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let set = Array::default();
        for item in items {
            set.add(item);
        }
        Value::Set(set)
    }

    pub fn buffer(bytes: impl Into<Bytes>) -> Self {
        Value::Buffer(bytes.into())
    }

    pub fn big_int(value: i128) -> Self {
        Value::BigInt(value)
    }

    pub fn opaque(type_name: impl Into<String>, repr: Option<String>) -> Self {
        Value::Opaque(Opaque {
            type_name: type_name.into(),
            repr,
        })
    }

    /// Converts any serializable type through its JSON form.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Value::from(json),
            Err(e) => Value::opaque(
                std::any::type_name::<T>(),
                Some(format!("[Unserializable: {e}]")),
            ),
        }
    }

    /// Key equality for maps and sets: primitives by value, composites by identity.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => a.ptr_eq(b),
            (Value::Buffer(a), Value::Buffer(b)) => a.as_ptr() == b.as_ptr() && a.len() == b.len(),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
                _ => false,
            },
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(n) => Some(n as f64),
            Value::UInt(n) => Some(n as f64),
            Value::Float(n) => Some(n),
            _ => None,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::UInt(n as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Buffer(bytes)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(time: DateTime<Utc>) -> Self {
        Value::Date(time)
    }
}

impl From<ErrorValue> for Value {
    fn from(error: ErrorValue) -> Self {
        Value::Error(error)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array_from(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array_from(items),
            serde_json::Value::Object(members) => Value::object_from(members),
        }
    }
}
