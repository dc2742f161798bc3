//! Values carried by SOAP properties.

use std::fmt;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::object::SoapObject;

/// The value of a single SOAP property.
///
/// Each kind maps to an `xsi:type` on the wire. `Object` and `Untyped` are
/// written without a type attribute, leaving the interpretation to the
/// service.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapValue {
    /// `xsd:string`
    String(String),
    /// `xsd:long`
    Int(i64),
    /// `xsd:double`
    Float(f64),
    /// `xsd:boolean`
    Bool(bool),
    /// `xsd:base64Binary`
    Binary(Vec<u8>),
    /// A nested complex value.
    Object(SoapObject),
    /// An explicit nil, `i:nil="true"`.
    Null,
    /// Text with no declared type.
    ///
    /// Response leaves without an `xsi:type` are read as untyped.
    Untyped(String),
}

impl SoapValue {
    /// The `xsi:type` this value is declared with, using the `d:` prefix bound to
    /// the XML Schema namespace in rendered envelopes.
    pub fn xsi_type(&self) -> Option<&'static str> {
        match self {
            SoapValue::String(_) => Some("d:string"),
            SoapValue::Int(_) => Some("d:long"),
            SoapValue::Float(_) => Some("d:double"),
            SoapValue::Bool(_) => Some("d:boolean"),
            SoapValue::Binary(_) => Some("d:base64Binary"),
            SoapValue::Object(_) | SoapValue::Null | SoapValue::Untyped(_) => None,
        }
    }

    /// Text representation of a simple value, as it is written on the wire.
    ///
    /// `None` for `Object` and `Null`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            SoapValue::String(v) | SoapValue::Untyped(v) => Some(v.clone()),
            SoapValue::Int(v) => Some(v.to_string()),
            SoapValue::Float(v) => Some(double_text(*v)),
            SoapValue::Bool(v) => Some(v.to_string()),
            SoapValue::Binary(v) => Some(BASE64_STANDARD.encode(v)),
            SoapValue::Object(_) | SoapValue::Null => None,
        }
    }

    /// Borrow the text of a `String` or `Untyped` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SoapValue::String(v) | SoapValue::Untyped(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow a nested object.
    pub fn as_object(&self) -> Option<&SoapObject> {
        match self {
            SoapValue::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value, parsing text if needed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SoapValue::Int(v) => Some(*v),
            SoapValue::String(v) | SoapValue::Untyped(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean value, parsing `true`/`false`/`1`/`0` text if needed.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SoapValue::Bool(v) => Some(*v),
            SoapValue::String(v) | SoapValue::Untyped(v) => match v.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Binary value, decoding base64 text if needed.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            SoapValue::Binary(v) => Some(v.clone()),
            SoapValue::String(v) | SoapValue::Untyped(v) => BASE64_STANDARD.decode(v.trim()).ok(),
            _ => None,
        }
    }

    /// Whether this is an explicit nil.
    pub fn is_null(&self) -> bool {
        matches!(self, SoapValue::Null)
    }
}

// xsd:double spells the specials INF, -INF and NaN.
fn double_text(v: f64) -> String {
    if v == f64::INFINITY {
        "INF".to_string()
    } else if v == f64::NEG_INFINITY {
        "-INF".to_string()
    } else if v.is_nan() {
        "NaN".to_string()
    } else {
        v.to_string()
    }
}

impl fmt::Display for SoapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapValue::Object(v) => write!(f, "{}", v),
            SoapValue::Null => write!(f, "nil"),
            _ => write!(f, "{}", self.to_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        SoapValue::String(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        SoapValue::String(value)
    }
}

impl From<i64> for SoapValue {
    fn from(value: i64) -> Self {
        SoapValue::Int(value)
    }
}

impl From<i32> for SoapValue {
    fn from(value: i32) -> Self {
        SoapValue::Int(value.into())
    }
}

impl From<u32> for SoapValue {
    fn from(value: u32) -> Self {
        SoapValue::Int(value.into())
    }
}

impl From<f64> for SoapValue {
    fn from(value: f64) -> Self {
        SoapValue::Float(value)
    }
}

impl From<bool> for SoapValue {
    fn from(value: bool) -> Self {
        SoapValue::Bool(value)
    }
}

impl From<Vec<u8>> for SoapValue {
    fn from(value: Vec<u8>) -> Self {
        SoapValue::Binary(value)
    }
}

impl From<SoapObject> for SoapValue {
    fn from(value: SoapObject) -> Self {
        SoapValue::Object(value)
    }
}

impl<T: Into<SoapValue>> From<Option<T>> for SoapValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SoapValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_kinds_declare_xsi_type() {
        assert_eq!(SoapValue::from("a").xsi_type(), Some("d:string"));
        assert_eq!(SoapValue::from(42_i64).xsi_type(), Some("d:long"));
        assert_eq!(SoapValue::from(1.5).xsi_type(), Some("d:double"));
        assert_eq!(SoapValue::from(true).xsi_type(), Some("d:boolean"));
        assert_eq!(SoapValue::from(vec![1_u8]).xsi_type(), Some("d:base64Binary"));
    }

    #[test]
    fn generic_kinds_have_no_type() {
        assert_eq!(SoapValue::Untyped("x".into()).xsi_type(), None);
        assert_eq!(SoapValue::Null.xsi_type(), None);
        let obj = SoapObject::new("urn:x", "Item");
        assert_eq!(SoapValue::from(obj).xsi_type(), None);
    }

    #[test]
    fn binary_is_base64_text() {
        let v = SoapValue::from(b"hello".to_vec());
        assert_eq!(v.to_text().as_deref(), Some("aGVsbG8="));

        let read = SoapValue::Untyped("aGVsbG8=".into());
        assert_eq!(read.as_bytes(), Some(b"hello".to_vec()));
    }

    #[test]
    fn untyped_text_converts() {
        let v = SoapValue::Untyped(" 42 ".into());
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(SoapValue::Untyped("1".into()).as_bool(), Some(true));
        assert_eq!(SoapValue::Untyped("yes".into()).as_bool(), None);
    }

    #[test]
    fn double_specials() {
        assert_eq!(SoapValue::from(f64::INFINITY).to_text().as_deref(), Some("INF"));
        assert_eq!(SoapValue::from(f64::NEG_INFINITY).to_text().as_deref(), Some("-INF"));
        assert_eq!(SoapValue::from(f64::NAN).to_text().as_deref(), Some("NaN"));
        assert_eq!(SoapValue::from(-0.5).to_text().as_deref(), Some("-0.5"));
    }

    #[test]
    fn option_none_is_nil() {
        let v: SoapValue = Option::<i64>::None.into();
        assert!(v.is_null());
        assert_eq!(v.to_text(), None);
    }
}
