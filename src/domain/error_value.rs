use super::value::{Object, Value};
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A runtime error attached to a log record.
///
/// Carries the error's type name, message, the raw multi-line stack text and any additional
/// properties the caller attached (a service name, a status code, a `cause`).
#[derive(Clone)]
pub struct ErrorValue(Rc<ErrorInner>);

struct ErrorInner {
    name: String,
    message: String,
    stack: RefCell<Option<String>>,
    properties: Object,
}

impl ErrorValue {
    /// Creates an `Error` with the given message and a stack captured at the call site.
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = format!("{name}: {message}\n{}", Backtrace::force_capture());
        Self(Rc::new(ErrorInner {
            name,
            message,
            stack: RefCell::new(Some(stack)),
            properties: Object::default(),
        }))
    }

    /// Builds an error value from a Rust error, following its `source()` chain into `cause`.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let value = Self::named(short_type_name::<E>(), err.to_string());
        if let Some(source) = err.source() {
            value.set_property("cause", Self::from_source(source));
        }
        value
    }

    fn from_source(err: &(dyn std::error::Error + 'static)) -> Self {
        let value = Self::named("Error", err.to_string()).without_stack();
        if let Some(source) = err.source() {
            value.set_property("cause", Self::from_source(source));
        }
        value
    }

    /// Replaces the raw stack text. The first line is expected to repeat `name: message`.
    pub fn with_stack(self, stack: impl Into<String>) -> Self {
        *self.0.stack.borrow_mut() = Some(stack.into());
        self
    }

    pub fn without_stack(self) -> Self {
        *self.0.stack.borrow_mut() = None;
        self
    }

    pub fn with_property(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.properties.insert(key, value);
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    pub fn stack(&self) -> Option<String> {
        self.0.stack.borrow().clone()
    }

    pub fn properties(&self) -> &Object {
        &self.0.properties
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorValue")
            .field("name", &self.0.name)
            .field("message", &self.0.message)
            .field("properties", &self.0.properties)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.name, self.0.message)
    }
}

impl std::error::Error for ErrorValue {}

/// `my_crate::net::TimeoutError<T>` becomes `TimeoutError`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
