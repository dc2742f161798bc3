use std::fmt;

use crate::object::SoapObject;

/// A SOAP fault returned in place of a result.
///
/// Both SOAP 1.1 (`faultcode`, `faultstring`, `faultactor`, `detail`) and
/// SOAP 1.2 (`Code/Value`, `Reason/Text`, `Role`, `Detail`) faults are read
/// into this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapFault {
    /// Fault code, such as `soap:Client`.
    pub code: String,
    /// Human readable description.
    pub string: String,
    /// URI of the actor that caused the fault.
    pub actor: Option<String>,
    /// Application specific details.
    pub detail: Option<SoapObject>,
}

impl SoapFault {
    /// Create a fault with just a code and description.
    pub fn new(code: impl Into<String>, string: impl Into<String>) -> Self {
        SoapFault {
            code: code.into(),
            string: string.into(),
            actor: None,
            detail: None,
        }
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.string)
    }
}
