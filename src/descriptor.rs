//! What to call, and where.

use http::uri::Scheme;
use http::Uri;

use crate::value::SoapValue;
use crate::Error;

/// Which transport the request must be sent over.
///
/// The caller's connection layer is expected to wrap the connection in TLS for
/// `Secure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Plain `http`.
    Plain,
    /// `https`.
    Secure,
}

impl TransportKind {
    /// Pick the transport for an endpoint.
    ///
    /// Only the `https` scheme selects `Secure`.
    pub fn for_uri(uri: &Uri) -> Self {
        if uri.scheme() == Some(&Scheme::HTTPS) {
            TransportKind::Secure
        } else {
            TransportKind::Plain
        }
    }

    /// Tell if this is the secure variant.
    pub fn is_secure(&self) -> bool {
        *self == TransportKind::Secure
    }
}

/// Immutable description of a single SOAP operation invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    uri: Uri,
    namespace: String,
    operation: String,
    action: String,
    arguments: Vec<(String, SoapValue)>,
    transport: TransportKind,
}

impl RequestDescriptor {
    /// Describe a call with the action derived as `{namespace}#{operation}`.
    pub fn new<I, K, V>(
        url: &str,
        namespace: &str,
        operation: &str,
        arguments: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SoapValue>,
    {
        let mut builder = RequestDescriptor::builder(url, namespace, operation);
        for (k, v) in arguments {
            builder = builder.argument(k, v);
        }
        builder.build()
    }

    /// Start building a descriptor.
    pub fn builder(url: &str, namespace: &str, operation: &str) -> DescriptorBuilder {
        DescriptorBuilder {
            url: url.to_string(),
            namespace: namespace.to_string(),
            operation: operation.to_string(),
            action: None,
            arguments: Vec::new(),
        }
    }

    /// The endpoint.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// XML namespace of the operation element.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The SOAP action, explicit or derived.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Arguments in the order they were given.
    pub fn arguments(&self) -> impl Iterator<Item = (&str, &SoapValue)> {
        self.arguments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up an argument.
    pub fn argument(&self, name: &str) -> Option<&SoapValue> {
        self.arguments
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Transport chosen from the endpoint scheme.
    pub fn transport(&self) -> TransportKind {
        self.transport
    }
}

/// Builder for [`RequestDescriptor`].
#[derive(Debug)]
pub struct DescriptorBuilder {
    url: String,
    namespace: String,
    operation: String,
    action: Option<String>,
    arguments: Vec<(String, SoapValue)>,
}

impl DescriptorBuilder {
    /// Use an explicit SOAP action instead of `{namespace}#{operation}`.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Add an argument. An argument with the same name is replaced.
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.arguments.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.arguments.push((name, value)),
        }
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<RequestDescriptor, Error> {
        if self.namespace.is_empty() {
            return Err(Error::EmptyNamespace);
        }
        if self.operation.is_empty() {
            return Err(Error::EmptyOperation);
        }

        // Names become element names in the envelope.
        check_name(&self.operation)?;
        for (name, value) in &self.arguments {
            check_name(name)?;
            check_value(value)?;
        }

        let uri: Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| Error::BadUri(format!("{}: {}", self.url, e)))?;

        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(Error::BadUri(format!("{}: not an absolute url", self.url)));
        }

        let action = self
            .action
            .unwrap_or_else(|| derive_action(&self.namespace, &self.operation));

        let transport = TransportKind::for_uri(&uri);

        Ok(RequestDescriptor {
            uri,
            namespace: self.namespace,
            operation: self.operation,
            action,
            arguments: self.arguments,
            transport,
        })
    }
}

fn derive_action(namespace: &str, operation: &str) -> String {
    format!("{}#{}", namespace, operation)
}

fn check_value(value: &SoapValue) -> Result<(), Error> {
    let SoapValue::Object(obj) = value else {
        return Ok(());
    };
    for p in obj.properties() {
        check_name(&p.name)?;
        check_value(&p.value)?;
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), Error> {
    if is_element_name(name) {
        Ok(())
    } else {
        Err(Error::BadName(name.to_string()))
    }
}

/// An unprefixed XML name (`NCName`). Elements are written in the default
/// namespace, so a `:` is not allowed.
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '-'
            | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}
