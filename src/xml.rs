//! Reading SOAP envelopes.
//!
//! The document is pull-parsed into a small element tree, which is then
//! interpreted as a result object, a fault, or an empty body.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::fault::SoapFault;
use crate::object::SoapObject;
use crate::value::SoapValue;
use crate::Error;

/// Max element nesting accepted in a response document.
pub const MAX_DEPTH: usize = 256;

// Total multi-ref substitutions in one document.
const MAX_REF_RESOLVES: usize = 10_000;

#[derive(Debug, Default, Clone)]
struct Element {
    namespace: String,
    name: String,
    id: Option<String>,
    href: Option<String>,
    nil: bool,
    xsi_type: Option<String>,
    text: String,
    children: Vec<Element>,
}

/// Parse a SOAP envelope document and return the object in its body.
///
/// `Ok(None)` means the document was a well formed envelope whose body had
/// no object (or a nil one).
///
/// SOAP encoded multi-ref responses are resolved: an element with
/// `href="#id"` takes the content of the Body element carrying `id="id"`.
pub fn parse_envelope(xml: &str) -> Result<Option<SoapObject>, Error> {
    let root = read_document(xml)?;

    if root.name != "Envelope" {
        return Err(malformed(format!(
            "expected soap Envelope, found {}",
            root.name
        )));
    }

    let body = root
        .children
        .into_iter()
        .find(|e| e.name == "Body")
        .ok_or_else(|| malformed("missing soap Body"))?;

    let mut children = body.children.into_iter();

    let mut first = match children.next() {
        Some(v) => v,
        None => return Ok(None),
    };

    if first.name == "Fault" {
        return Err(first.into_fault().into());
    }

    let refs: HashMap<String, Element> = children
        .filter_map(|mut e| e.id.take().map(|id| (id, e)))
        .collect();

    let mut budget = MAX_REF_RESOLVES;
    resolve_refs(&mut first, &refs, &mut Vec::new(), &mut budget)?;

    if first.nil {
        return Ok(None);
    }

    Ok(Some(first.into_object()))
}

fn read_document(xml: &str) -> Result<Element, Error> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;

        match event {
            Event::Start(e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed("element nesting too deep"));
                }
                let el = Element::open(resolve(ns)?, &e)?;
                stack.push(el);
            }
            Event::Empty(e) => {
                let el = Element::open(resolve(ns)?, &e)?;
                close(el, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected end tag"))?;
                close(el, &mut stack, &mut root)?;
            }
            Event::Text(t) => {
                let text = t.decode().map_err(|e| malformed(e.to_string()))?;
                append_text(&text, &mut stack)?;
            }
            Event::CData(t) => {
                let text = t.decode().map_err(|e| malformed(e.to_string()))?;
                append_text(&text, &mut stack)?;
            }
            Event::GeneralRef(r) => {
                let text = match r.resolve_char_ref()? {
                    Some(c) => c.to_string(),
                    None => {
                        let name = r.decode().map_err(|e| malformed(e.to_string()))?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| malformed(format!("unknown entity &{};", name)))?
                            .to_string()
                    }
                };
                append_text(&text, &mut stack)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unexpected end of document"));
    }

    root.ok_or_else(|| malformed("no root element"))
}

fn resolve(ns: ResolveResult<'_>) -> Result<String, Error> {
    match ns {
        ResolveResult::Bound(n) => Ok(String::from_utf8_lossy(n.as_ref()).into_owned()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(p) => Err(malformed(format!(
            "undeclared namespace prefix {}",
            String::from_utf8_lossy(&p)
        ))),
    }
}

fn close(
    el: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }

    if root.is_some() {
        return Err(malformed("more than one root element"));
    }
    *root = Some(el);

    Ok(())
}

fn append_text(text: &str, stack: &mut [Element]) -> Result<(), Error> {
    match stack.last_mut() {
        Some(top) => {
            top.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed("text outside of root element")),
    }
}

fn resolve_refs<'a>(
    el: &mut Element,
    refs: &'a HashMap<String, Element>,
    active: &mut Vec<&'a str>,
    budget: &mut usize,
) -> Result<(), Error> {
    let Some(href) = el.href.take() else {
        return resolve_children(el, refs, active, budget);
    };

    let id = href.strip_prefix('#').unwrap_or(&href);

    let (key, target) = refs
        .get_key_value(id)
        .ok_or_else(|| malformed(format!("unresolved reference {}", href)))?;

    if active.contains(&key.as_str()) {
        return Err(malformed(format!("cyclic reference {}", href)));
    }
    if *budget == 0 || active.len() >= MAX_DEPTH {
        return Err(malformed("too many references"));
    }
    *budget -= 1;

    // The referencing element keeps its name, the content is the target's.
    el.nil = target.nil;
    el.xsi_type = target.xsi_type.clone();
    el.text = target.text.clone();
    el.children = target.children.clone();

    active.push(key);
    let result = resolve_children(el, refs, active, budget);
    active.pop();

    result
}

fn resolve_children<'a>(
    el: &mut Element,
    refs: &'a HashMap<String, Element>,
    active: &mut Vec<&'a str>,
    budget: &mut usize,
) -> Result<(), Error> {
    for child in &mut el.children {
        resolve_refs(child, refs, active, budget)?;
    }
    Ok(())
}

fn parse_double(text: &str) -> Option<f64> {
    match text {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => text.parse().ok(),
    }
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedXml(msg.into())
}

impl Element {
    fn open(namespace: String, start: &BytesStart<'_>) -> Result<Element, Error> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut el = Element {
            namespace,
            name,
            ..Default::default()
        };

        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed(e.to_string()))?;

            let value = String::from_utf8_lossy(&attr.value);
            let prefixed = attr.key.prefix().is_some();

            match (prefixed, attr.key.local_name().as_ref()) {
                // i:nil / xsi:type
                (true, b"nil") => el.nil = matches!(value.trim(), "true" | "1"),
                (true, b"type") => el.xsi_type = Some(value.into_owned()),
                // multi-ref
                (false, b"id") => el.id = Some(value.into_owned()),
                (false, b"href") => el.href = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(el)
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.trim().to_string())
    }

    fn into_object(self) -> SoapObject {
        let mut obj = SoapObject::new(self.namespace, self.name);
        for child in self.children {
            let name = child.name.clone();
            obj.add_property(name, child.into_value());
        }
        obj
    }

    fn into_value(self) -> SoapValue {
        if self.nil {
            return SoapValue::Null;
        }

        if !self.children.is_empty() {
            return SoapValue::Object(self.into_object());
        }

        let kind = self
            .xsi_type
            .as_deref()
            .map(|t| t.rsplit(':').next().unwrap_or(t));

        let text = self.text;

        let typed = match kind {
            Some("string") | Some("anyURI") | Some("QName") => Some(SoapValue::String(text.clone())),
            Some("long") | Some("int") | Some("short") | Some("byte") | Some("integer")
            | Some("unsignedInt") | Some("unsignedShort") | Some("unsignedByte") => {
                text.trim().parse().ok().map(SoapValue::Int)
            }
            Some("double") | Some("float") | Some("decimal") => {
                parse_double(text.trim()).map(SoapValue::Float)
            }
            Some("boolean") => match text.trim() {
                "true" | "1" => Some(SoapValue::Bool(true)),
                "false" | "0" => Some(SoapValue::Bool(false)),
                _ => None,
            },
            Some("base64Binary") | Some("base64") => BASE64_STANDARD
                .decode(text.trim())
                .ok()
                .map(SoapValue::Binary),
            _ => None,
        };

        typed.unwrap_or(SoapValue::Untyped(text))
    }

    fn into_fault(self) -> SoapFault {
        // SOAP 1.1 first, then the SOAP 1.2 Code/Value, Reason/Text shape.
        let code = self.child_text("faultcode").or_else(|| {
            self.child("Code")
                .and_then(|c| c.child_text("Value"))
        });
        let string = self.child_text("faultstring").or_else(|| {
            self.child("Reason")
                .and_then(|c| c.child_text("Text"))
        });
        let actor = self
            .child_text("faultactor")
            .or_else(|| self.child_text("Role"));

        let detail = self
            .children
            .into_iter()
            .find(|c| c.name == "detail" || c.name == "Detail")
            .filter(|c| !c.children.is_empty())
            .map(|c| c.into_object());

        SoapFault {
            code: code.unwrap_or_default(),
            string: string.unwrap_or_default(),
            actor,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_OPEN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <soap:Body>"#;
    const ENV_CLOSE: &str = "\n  </soap:Body>\n</soap:Envelope>";

    fn envelope(body: &str) -> String {
        format!("{}{}{}", ENV_OPEN, body, ENV_CLOSE)
    }

    #[test]
    fn result_object() {
        let xml = envelope(
            r#"<GetUserResponse xmlns="ns">
      <name>Ana</name>
      <age xsi:type="xsd:int">31</age>
    </GetUserResponse>"#,
        );
        let obj = parse_envelope(&xml).unwrap().unwrap();

        assert_eq!(obj.name(), "GetUserResponse");
        assert_eq!(obj.namespace(), "ns");
        assert_eq!(obj.get_str("name"), Some("Ana"));
        assert_eq!(obj.property("age"), Some(&SoapValue::Int(31)));
    }

    #[test]
    fn nested_objects_and_entities() {
        let xml = envelope(
            r#"<r:Resp xmlns:r="urn:r"><r:user><r:name>Tom &amp; Jerry &#233;</r:name><r:tag><![CDATA[<b>]]></r:tag></r:user></r:Resp>"#,
        );
        let obj = parse_envelope(&xml).unwrap().unwrap();
        let user = obj.get_object("user").unwrap();
        assert_eq!(user.namespace(), "urn:r");
        assert_eq!(user.get_str("name"), Some("Tom & Jerry é"));
        assert_eq!(user.get_str("tag"), Some("<b>"));
    }

    #[test]
    fn empty_body_is_none() {
        let xml = envelope("");
        assert_eq!(parse_envelope(&xml).unwrap(), None);

        let xml = envelope(r#"<Resp xsi:nil="true"/>"#);
        assert_eq!(parse_envelope(&xml).unwrap(), None);
    }

    #[test]
    fn fault_11() {
        let xml = envelope(
            r#"<soap:Fault>
      <faultcode>soap:Client</faultcode>
      <faultstring>Unknown user</faultstring>
      <detail><e:Info xmlns:e="urn:e"><e:id>42</e:id></e:Info></detail>
    </soap:Fault>"#,
        );
        let err = parse_envelope(&xml).unwrap_err();
        let fault = err.as_fault().unwrap();

        assert_eq!(fault.code, "soap:Client");
        assert_eq!(fault.string, "Unknown user");
        assert_eq!(fault.actor, None);
        let detail = fault.detail.as_ref().unwrap();
        assert_eq!(detail.get_object("Info").unwrap().get_str("id"), Some("42"));
    }

    #[test]
    fn fault_12() {
        let xml = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
<env:Body><env:Fault>
  <env:Code><env:Value>env:Sender</env:Value></env:Code>
  <env:Reason><env:Text xml:lang="en">Bad input</env:Text></env:Reason>
  <env:Role>urn:gateway</env:Role>
</env:Fault></env:Body></env:Envelope>"#;
        let err = parse_envelope(xml).unwrap_err();
        let fault = err.as_fault().unwrap();

        assert_eq!(fault.code, "env:Sender");
        assert_eq!(fault.string, "Bad input");
        assert_eq!(fault.actor.as_deref(), Some("urn:gateway"));
        assert!(fault.detail.is_none());
    }

    #[test]
    fn malformed_documents() {
        let cases = [
            "",
            "not xml at all",
            "<a><b></a>",
            "<soap:Envelope xmlns:soap=\"x\"><soap:Body>",
            "<Other/>",
            "<soap:Envelope xmlns:soap=\"x\"/>",
            "<u:Envelope><u:Body/></u:Envelope>",
            "<Envelope><Body/></Envelope><Envelope/>",
        ];

        for xml in cases {
            let err = parse_envelope(xml).unwrap_err();
            assert!(matches!(err, Error::MalformedXml(_)), "{:?} -> {:?}", xml, err);
        }
    }

    fn nested(depth: usize) -> String {
        // Envelope and Body count towards the depth.
        let inner = depth - 2;
        format!(
            "<Envelope><Body>{}{}</Body></Envelope>",
            "<a>".repeat(inner),
            "</a>".repeat(inner)
        )
    }

    #[test]
    fn deep_nesting_rejected() {
        let err = parse_envelope(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err, Error::MalformedXml("element nesting too deep".into()));
    }

    #[test]
    fn nesting_up_to_limit_accepted() {
        let obj = parse_envelope(&nested(MAX_DEPTH)).unwrap().unwrap();
        assert_eq!(obj.name(), "a");
    }

    #[test]
    fn multi_ref_resolved() {
        let xml = envelope(
            r##"<ns1:GetUserResponse xmlns:ns1="urn:u" soap:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
      <return href="#id0"/>
    </ns1:GetUserResponse>
    <multiRef id="id0" xsi:type="ns2:User" xmlns:ns2="urn:u">
      <name xsi:type="xsd:string">Ana</name>
      <address href="#id1"/>
    </multiRef>
    <multiRef id="id1"><city>Lisboa</city></multiRef>"##,
        );
        let obj = parse_envelope(&xml).unwrap().unwrap();

        assert_eq!(obj.name(), "GetUserResponse");
        let user = obj.get_object("return").unwrap();
        assert_eq!(user.property("name"), Some(&SoapValue::String("Ana".into())));
        let address = user.get_object("address").unwrap();
        assert_eq!(address.name(), "address");
        assert_eq!(address.get_str("city"), Some("Lisboa"));
    }

    #[test]
    fn shared_multi_ref_resolved_twice() {
        let xml = envelope(
            r##"<R><a href="#x"/><b href="#x"/></R><multiRef id="x"><v>1</v></multiRef>"##,
        );
        let obj = parse_envelope(&xml).unwrap().unwrap();
        assert_eq!(obj.get_object("a").unwrap().get_str("v"), Some("1"));
        assert_eq!(obj.get_object("b").unwrap().get_str("v"), Some("1"));
    }

    #[test]
    fn bad_multi_refs_rejected() {
        let missing = envelope(r##"<R><a href="#nope"/></R>"##);
        assert_eq!(
            parse_envelope(&missing).unwrap_err(),
            Error::MalformedXml("unresolved reference #nope".into())
        );

        let cyclic = envelope(
            r##"<R><a href="#x"/></R><multiRef id="x"><b href="#x"/></multiRef>"##,
        );
        assert_eq!(
            parse_envelope(&cyclic).unwrap_err(),
            Error::MalformedXml("cyclic reference #x".into())
        );
    }

    #[test]
    fn double_specials() {
        let xml = envelope(
            r#"<R><a xsi:type="xsd:double">INF</a><b xsi:type="xsd:double">-INF</b><c xsi:type="xsd:double">NaN</c></R>"#,
        );
        let obj = parse_envelope(&xml).unwrap().unwrap();
        assert_eq!(obj.property("a"), Some(&SoapValue::Float(f64::INFINITY)));
        assert_eq!(obj.property("b"), Some(&SoapValue::Float(f64::NEG_INFINITY)));
        assert!(matches!(obj.property("c"), Some(SoapValue::Float(v)) if v.is_nan()));
    }

    #[test]
    fn bad_typed_text_stays_untyped() {
        let xml = envelope(r#"<R><n xsi:type="xsd:int">many</n></R>"#);
        let obj = parse_envelope(&xml).unwrap().unwrap();
        assert_eq!(obj.property("n"), Some(&SoapValue::Untyped("many".into())));
    }
}
