use std::time::Duration;

use http::{header, Request};

use crate::descriptor::TransportKind;
use crate::envelope::{Envelope, RawPayload};
use crate::util::log_data;
use crate::{Error, CONTENT_TYPE};

use super::state::{RecvResponse, SendBody};
use super::Call;

impl Call<SendBody> {
    /// Build and render the envelope.
    ///
    /// This is done anew on every call, also when resending after a retry.
    pub fn payload(&self) -> Result<RawPayload, Error> {
        let descriptor = &self.inner.descriptor;

        let envelope = Envelope::build(descriptor);
        let payload = envelope.render(descriptor.action(), descriptor.transport())?;

        if self.inner.config.is_verbose_envelope() {
            debug!("SOAP envelope -> {}", payload.as_str());
        } else {
            log_data(">> ", payload.bytes());
        }

        Ok(payload)
    }

    /// The request body, UTF-8 encoded.
    pub fn body(&self) -> Result<Vec<u8>, Error> {
        Ok(self.payload()?.into_bytes())
    }

    /// The request body when posting. Same as [`Call::body()`].
    pub fn post_body(&self) -> Result<Vec<u8>, Error> {
        self.body()
    }

    /// The complete HTTP request to transmit.
    ///
    /// A `POST` to the endpoint with `content-type`, `soapaction` and
    /// `content-length` set.
    pub fn request(&self) -> Result<Request<Vec<u8>>, Error> {
        let payload = self.payload()?;
        let len = payload.len();

        Request::post(self.inner.descriptor.uri().clone())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .header("soapaction", payload.soap_action_header())
            .header(header::CONTENT_LENGTH, len)
            .body(payload.into_bytes())
            .map_err(|e| Error::BadHeader(e.to_string()))
    }

    /// Transport the request must be sent over.
    pub fn transport(&self) -> TransportKind {
        self.inner.descriptor.transport()
    }

    /// Timeout for this attempt. Grows with each retry.
    pub fn current_timeout(&self) -> Duration {
        self.inner.retry.current_timeout()
    }

    /// Number of retries so far.
    pub fn retries(&self) -> u32 {
        self.inner.retry.retries()
    }

    /// Continue to awaiting the response.
    ///
    /// The body is transmitted by the caller.
    pub fn proceed(self) -> Call<RecvResponse> {
        Call::wrap(self.inner)
    }
}
