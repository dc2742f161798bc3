use std::sync::{Arc, Mutex};

use http::{HeaderValue, Response};

use crate::call::state::{Deliver, Prepare, RecvResponse, SendBody};
use crate::call::Call;
use crate::config::Config;
use crate::descriptor::RequestDescriptor;
use crate::object::SoapObject;
use crate::value::SoapValue;
use crate::Error;

/// What a listener was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivered {
    Response(SoapObject),
    Error(Error),
}

/// Listener invocations, shared with the closures given to the call.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Delivered>>>);

impl Recorder {
    pub fn delivered(&self) -> Vec<Delivered> {
        self.0.lock().unwrap().clone()
    }

    /// Number of live handles to the recording, including those held by the
    /// listener closures.
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

pub struct Scenario {
    descriptor: RequestDescriptor,
    config: Config,
    recorder: Recorder,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::new()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn to_prepare(&self) -> Call<Prepare> {
        let on_response = {
            let recorder = self.recorder.clone();
            move |obj| recorder.0.lock().unwrap().push(Delivered::Response(obj))
        };
        let on_error = {
            let recorder = self.recorder.clone();
            move |err| recorder.0.lock().unwrap().push(Delivered::Error(err))
        };

        Call::with_config(
            self.descriptor.clone(),
            self.config.clone(),
            on_response,
            on_error,
        )
    }

    pub fn to_send_body(&self) -> Call<SendBody> {
        self.to_prepare().proceed()
    }

    pub fn to_recv_response(&self) -> Call<RecvResponse> {
        let call = self.to_send_body();
        call.body().unwrap();
        call.proceed()
    }

    pub fn to_deliver(&self, xml: &str) -> Call<Deliver> {
        let mut call = self.to_recv_response();
        call.set_response(xml_response(200, xml));
        call.proceed().unwrap()
    }
}

pub fn xml_response(status: u16, xml: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(status)
        .header(
            "content-type",
            HeaderValue::from_static("text/xml; charset=utf-8"),
        )
        .body(xml.as_bytes().to_vec())
        .unwrap()
}

pub struct ScenarioBuilder {
    url: String,
    namespace: String,
    operation: String,
    arguments: Vec<(String, SoapValue)>,
    config: Config,
}

#[allow(unused)]
impl ScenarioBuilder {
    pub fn new() -> Self {
        ScenarioBuilder {
            url: "http://svc.test/Users".to_string(),
            namespace: "ns".to_string(),
            operation: "GetUser".to_string(),
            arguments: vec![("id".to_string(), SoapValue::from("42"))],
            config: Config::default(),
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn operation(mut self, operation: &str) -> Self {
        self.operation = operation.to_string();
        self
    }

    pub fn argument(mut self, name: &str, value: impl Into<SoapValue>) -> Self {
        self.arguments.push((name.to_string(), value.into()));
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Scenario {
        let descriptor = RequestDescriptor::new(
            &self.url,
            &self.namespace,
            &self.operation,
            self.arguments,
        )
        .unwrap();

        Scenario {
            descriptor,
            config: self.config,
            recorder: Recorder::default(),
        }
    }
}

pub const GET_USER_RESPONSE: &str = "\
    <soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
    <soap:Body><GetUserResponse xmlns=\"ns\"><name>Ana</name></GetUserResponse></soap:Body>\
    </soap:Envelope>";

pub const FAULT_RESPONSE: &str = "\
    <soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
    <soap:Body><soap:Fault><faultcode>soap:Server</faultcode>\
    <faultstring>Database down</faultstring></soap:Fault></soap:Body>\
    </soap:Envelope>";
