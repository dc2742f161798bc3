//! Outbound envelope construction and rendering.
//!
//! Building and rendering are local, infallible-in-practice steps. Nothing
//! here touches the network; the rendered [`RawPayload`] is what the caller
//! transmits.

use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::descriptor::{RequestDescriptor, TransportKind};
use crate::object::SoapObject;
use crate::value::SoapValue;
use crate::{Error, CHARSET, CONTENT_TYPE};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// SOAP 1.1 encoding namespace.
pub const SOAP_ENC_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";
/// XML Schema namespace, bound to `d:`.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
/// XML Schema instance namespace, bound to `i:`.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An outbound SOAP 1.1 envelope.
///
/// The operation element is written in .NET style: it declares the operation
/// namespace as default namespace, so all argument elements are qualified by
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    body: SoapObject,
}

impl Envelope {
    /// Build the envelope for a call.
    ///
    /// Every argument becomes one property, in argument order, with its value
    /// copied as given.
    pub fn build(descriptor: &RequestDescriptor) -> Envelope {
        let mut body = SoapObject::new(descriptor.namespace(), descriptor.operation());

        for (name, value) in descriptor.arguments() {
            body.add_property(name, value.clone());
        }

        Envelope { body }
    }

    /// The operation object carried in the body.
    pub fn body(&self) -> &SoapObject {
        &self.body
    }

    /// Render the envelope to the XML document sent on the wire.
    pub fn to_xml(&self) -> Result<String, Error> {
        let mut w = Writer::new(Vec::new());

        w.write_event(Event::Decl(BytesDecl::new("1.0", Some(CHARSET), None)))
            .map_err(render_err)?;

        w.write_event(Event::Start(BytesStart::new("v:Envelope").with_attributes([
            ("xmlns:i", XSI_NS),
            ("xmlns:d", XSD_NS),
            ("xmlns:c", SOAP_ENC_NS),
            ("xmlns:v", SOAP_ENV_NS),
        ])))
        .map_err(render_err)?;

        w.write_event(Event::Empty(BytesStart::new("v:Header")))
            .map_err(render_err)?;
        w.write_event(Event::Start(BytesStart::new("v:Body")))
            .map_err(render_err)?;

        let mut op = BytesStart::new(self.body.name());
        op.push_attribute(("id", "o0"));
        op.push_attribute(("c:root", "1"));
        op.push_attribute(("xmlns", self.body.namespace()));
        write_object(&mut w, op, &self.body, self.body.namespace())?;

        w.write_event(Event::End(BytesEnd::new("v:Body")))
            .map_err(render_err)?;
        w.write_event(Event::End(BytesEnd::new("v:Envelope")))
            .map_err(render_err)?;

        String::from_utf8(w.into_inner()).map_err(render_err)
    }

    /// Render into the payload for a call.
    pub fn render(&self, action: &str, transport: TransportKind) -> Result<RawPayload, Error> {
        let xml = self.to_xml()?;

        Ok(RawPayload {
            xml,
            action: action.to_string(),
            transport,
        })
    }
}

fn write_object(
    w: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    obj: &SoapObject,
    scope_ns: &str,
) -> Result<(), Error> {
    let end = start.to_end().into_owned();
    w.write_event(Event::Start(start)).map_err(render_err)?;

    for p in obj.properties() {
        write_value(w, &p.name, &p.value, scope_ns)?;
    }

    w.write_event(Event::End(end)).map_err(render_err)
}

fn write_value(
    w: &mut Writer<Vec<u8>>,
    name: &str,
    value: &SoapValue,
    scope_ns: &str,
) -> Result<(), Error> {
    let mut start = BytesStart::new(name);

    match value {
        SoapValue::Null => {
            start.push_attribute(("i:nil", "true"));
            w.write_event(Event::Empty(start)).map_err(render_err)
        }
        SoapValue::Object(obj) => {
            // An empty namespace must undeclare the inherited default.
            let ns = obj.namespace();
            if ns != scope_ns {
                start.push_attribute(("xmlns", ns));
            }
            write_object(w, start, obj, ns)
        }
        _ => {
            if let Some(t) = value.xsi_type() {
                start.push_attribute(("i:type", t));
            }
            let end = start.to_end().into_owned();
            let text = value.to_text().unwrap_or_default();
            w.write_event(Event::Start(start)).map_err(render_err)?;
            w.write_event(Event::Text(BytesText::new(&text)))
                .map_err(render_err)?;
            w.write_event(Event::End(end)).map_err(render_err)
        }
    }
}

fn render_err(e: impl fmt::Display) -> Error {
    Error::Render(e.to_string())
}

/// The rendered request body, ready to be transmitted.
///
/// Produced fresh every time a body is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    xml: String,
    action: String,
    transport: TransportKind,
}

impl RawPayload {
    /// The body bytes, encoded as UTF-8.
    pub fn bytes(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    /// Take the body bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.xml.into_bytes()
    }

    /// The body as text.
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.xml.len()
    }

    /// Tell if the body is empty. It never is for a rendered envelope.
    pub fn is_empty(&self) -> bool {
        self.xml.is_empty()
    }

    /// Character encoding of the body.
    pub fn charset(&self) -> &'static str {
        CHARSET
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// The SOAP action of the call.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Value for the `SOAPAction` header, which is the quoted action.
    pub fn soap_action_header(&self) -> String {
        format!("\"{}\"", self.action)
    }

    /// Transport the payload must be sent over.
    pub fn transport(&self) -> TransportKind {
        self.transport
    }
}
