use std::fmt;

use crate::fault::SoapFault;

/// Error type for soap-proto
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Error {
    EmptyNamespace,
    EmptyOperation,
    BadName(String),
    BadUri(String),
    BadHeader(String),
    Render(String),
    Decoding(String),
    MalformedXml(String),
    Fault(Box<SoapFault>),
    EmptyResponse,
    Transport(String),
    HttpParseFail(String),
    HttpParseTooManyHeaders,
    BadContentLengthHeader,
    BodyIsChunked,
}

/// Broad classification of an [`Error`].
///
/// A request framework typically reports these differently: a `Parse` error
/// means a response arrived but could not be used, `Transport` means the
/// exchange itself did not produce a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call could not be constructed or rendered.
    Request,
    /// The response was received but could not be decoded, parsed, or was a SOAP fault.
    Parse,
    /// The exchange failed or produced no SOAP object.
    Transport,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyNamespace
            | Error::EmptyOperation
            | Error::BadName(_)
            | Error::BadUri(_)
            | Error::BadHeader(_)
            | Error::Render(_) => ErrorKind::Request,
            Error::Decoding(_) | Error::MalformedXml(_) | Error::Fault(_) => ErrorKind::Parse,
            Error::EmptyResponse
            | Error::Transport(_)
            | Error::HttpParseFail(_)
            | Error::HttpParseTooManyHeaders
            | Error::BadContentLengthHeader
            | Error::BodyIsChunked => ErrorKind::Transport,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Parse`.
    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    /// The SOAP fault, if this error is one.
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match self {
            Error::Fault(v) => Some(&**v),
            _ => None,
        }
    }
}

impl From<httparse::Error> for Error {
    fn from(value: httparse::Error) -> Self {
        Error::HttpParseFail(value.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::MalformedXml(value.to_string())
    }
}

impl From<SoapFault> for Error {
    fn from(value: SoapFault) -> Self {
        Error::Fault(Box::new(value))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyNamespace => write!(f, "soap namespace is empty"),
            Error::EmptyOperation => write!(f, "soap operation name is empty"),
            Error::BadName(v) => write!(f, "not a valid xml element name: {:?}", v),
            Error::BadUri(v) => write!(f, "bad endpoint uri: {}", v),
            Error::BadHeader(v) => write!(f, "bad header: {}", v),
            Error::Render(v) => write!(f, "failed to render soap envelope: {}", v),
            Error::Decoding(v) => write!(f, "failed to decode response: {}", v),
            Error::MalformedXml(v) => write!(f, "failed to parse response xml: {}", v),
            Error::Fault(v) => write!(f, "soap fault: {}", v),
            Error::EmptyResponse => {
                write!(f, "response parsed but no soap object was produced")
            }
            Error::Transport(v) => write!(f, "transport failed: {}", v),
            Error::HttpParseFail(v) => write!(f, "http parse fail: {}", v),
            Error::HttpParseTooManyHeaders => write!(f, "http parse resulted in too many headers"),
            Error::BadContentLengthHeader => write!(f, "content-length header not a number"),
            Error::BodyIsChunked => write!(f, "body is chunked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_class_errors() {
        assert!(Error::Decoding("x".into()).is_parse_error());
        assert!(Error::MalformedXml("x".into()).is_parse_error());
        let fault = SoapFault::new("soap:Server", "boom");
        assert!(Error::from(fault).is_parse_error());
    }

    #[test]
    fn empty_response_is_transport_class() {
        let err = Error::EmptyResponse;
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.is_parse_error());
        assert_ne!(err, Error::MalformedXml(String::new()));
    }

    #[test]
    fn messages_name_the_stage() {
        assert!(Error::Decoding("unknown charset".into())
            .to_string()
            .starts_with("failed to decode"));
        assert!(Error::MalformedXml("eof".into())
            .to_string()
            .starts_with("failed to parse"));
        assert!(Error::EmptyResponse.to_string().contains("no soap object"));
        let fault = Error::from(SoapFault::new("soap:Client", "Invalid id"));
        assert_eq!(fault.to_string(), "soap fault: soap:Client: Invalid id");
    }

    #[test]
    fn descriptor_errors_are_request_class() {
        assert_eq!(Error::EmptyNamespace.kind(), ErrorKind::Request);
        assert_eq!(Error::EmptyOperation.kind(), ErrorKind::Request);
        assert_eq!(Error::BadUri("".into()).kind(), ErrorKind::Request);
        assert_eq!(Error::BadName("a b".into()).kind(), ErrorKind::Request);
    }
}
