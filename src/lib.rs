//! SOAP call support crate
//!
//! Adapts a single SOAP operation invocation to the request/response lifecycle
//! of a request framework: the framework owns connections, threads, timers and
//! the actual sending, this crate turns a call description into an envelope and
//! a received response into a result or a typed error.
//!
//! Like a sans-IO protocol crate, nothing here performs I/O.
//!
//! * [`RequestDescriptor`] - what to call: endpoint, namespace, operation,
//!   SOAP action and arguments.
//! * [`Envelope`] - builds and renders the outbound envelope.
//! * [`interpret()`] - reads a response body into a [`SoapObject`] or an
//!   [`Error`].
//! * [`Call`] - the lifecycle, see the [state graph][crate::call].
//!
//! # In scope:
//!
//! * SOAP 1.1 request envelopes, .NET style
//! * SOAP 1.1 and 1.2 responses and faults
//! * Charset handling of responses
//! * Retry bookkeeping and cache header metadata
//!
//! # Out of scope:
//!
//! * Opening/closing sockets
//! * TLS (https)
//! * Cookies, sessions and authorization
//! * Caching responses
//!
//! # The http crate
//!
//! Requests and responses are those of the [http crate](https://crates.io/crates/http),
//! re-exported as [`soap_proto::http`](http).

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod cache;
mod config;
mod descriptor;
mod envelope;
mod error;
mod ext;
mod fault;
mod object;
mod parser;
mod response;
mod retry;
mod util;
mod value;
mod xml;

pub mod call;

pub use cache::CacheEntry;
pub use call::{Call, RetryResult};
pub use config::Config;
pub use descriptor::{DescriptorBuilder, RequestDescriptor, TransportKind};
pub use envelope::{Envelope, RawPayload, SOAP_ENC_NS, SOAP_ENV_NS, XSD_NS, XSI_NS};
pub use error::{Error, ErrorKind};
pub use fault::SoapFault;
pub use object::{Property, SoapObject};
pub use parser::MAX_RESPONSE_HEADERS;
pub use response::{decode_body, interpret, interpret_response, SoapResponse};
pub use retry::{RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use value::SoapValue;
pub use xml::{parse_envelope, MAX_DEPTH};

pub use http;

/// Character encoding of request bodies.
pub const CHARSET: &str = "utf-8";

/// Content type of request bodies.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";
