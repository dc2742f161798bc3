//! The SOAP property bag.

use std::fmt;

use crate::value::SoapValue;

/// A named, namespaced bag of ordered properties.
///
/// Used both for the outbound operation element and for the object parsed out
/// of a response body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoapObject {
    namespace: String,
    name: String,
    properties: Vec<Property>,
}

/// A single named property of a [`SoapObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Element name of the property.
    pub name: String,
    /// The value.
    pub value: SoapValue,
}

impl SoapObject {
    /// Create an empty object.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        SoapObject {
            namespace: namespace.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Namespace URI of the object element. Empty if none was declared.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Local name of the object element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a property.
    ///
    /// Duplicate names are allowed, as SOAP arrays are repeated elements.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<SoapValue>) {
        self.properties.push(Property {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Builder style [`SoapObject::add_property`].
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> Self {
        self.add_property(name, value);
        self
    }

    /// First property with the given name.
    pub fn property(&self, name: &str) -> Option<&SoapValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Property by position.
    pub fn property_at(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    /// Text of a simple property.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|v| v.as_str())
    }

    /// Nested object property.
    pub fn get_object(&self, name: &str) -> Option<&SoapObject> {
        self.property(name).and_then(|v| v.as_object())
    }

    /// Whether a property with this name exists.
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// All properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Tell if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for SoapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, p) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}={}", p.name, p.value)?;
        }
        write!(f, "}}")
    }
}
