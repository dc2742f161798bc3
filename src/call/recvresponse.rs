use std::time::Duration;

use http::Response;

use crate::parser::try_parse_response;
use crate::response::interpret_response;
use crate::Error;

use super::state::{Deliver, RecvResponse};
use super::{Call, RetryResult};

impl Call<RecvResponse> {
    /// Hand over a received response.
    ///
    /// Replaces any response set earlier.
    pub fn set_response(&mut self, response: Response<Vec<u8>>) {
        self.inner.response = Some(response);
    }

    /// Try to read a raw HTTP/1.x response from `input`.
    ///
    /// Can be called repeatedly with a growing input until the full response is
    /// there. Returns how much input was used, `0` if more is needed.
    ///
    /// Bodies are delimited by `content-length`. Without one, the whole
    /// remaining input is taken to be the body. Chunked bodies are an error.
    pub fn try_response(&mut self, input: &[u8]) -> Result<usize, Error> {
        if self.inner.response.is_some() {
            return Ok(0);
        }

        let Some((input_used, response)) = try_parse_response(input)? else {
            return Ok(0);
        };

        debug!("Received response {}", response.status());

        self.inner.response = Some(response);

        Ok(input_used)
    }

    /// Check whether a response has been received.
    pub fn can_proceed(&self) -> bool {
        self.inner.response.is_some()
    }

    /// Interpret the response and proceed to delivering.
    ///
    /// Returns `None` if no response was received yet. It is guaranteed that if
    /// `can_proceed()` returns `true`, this will return `Some`.
    pub fn proceed(mut self) -> Option<Call<Deliver>> {
        let response = self.inner.response.take()?;

        let outcome = interpret_response(&response);

        if let Err(e) = &outcome {
            debug!("Response failed: {}", e);
        }

        self.inner.outcome = Some(outcome);

        Some(Call::wrap(self.inner))
    }

    /// The attempt failed, for instance by a timeout. Retry if the policy allows.
    ///
    /// When the retries are exhausted, `error` becomes the outcome to deliver.
    pub fn retry(mut self, error: Error) -> RetryResult {
        self.inner.response = None;

        if self.inner.retry.retry() {
            debug!(
                "Retry {} after: {}, timeout {:?}",
                self.inner.retry.retries(),
                error,
                self.inner.retry.current_timeout()
            );
            RetryResult::SendBody(Call::wrap(self.inner))
        } else {
            debug!("No retries left after: {}", error);
            self.inner.outcome = Some(Err(error));
            RetryResult::Deliver(Call::wrap(self.inner))
        }
    }

    /// The attempt failed in a way not worth retrying. Deliver `error`.
    pub fn fail(mut self, error: Error) -> Call<Deliver> {
        self.inner.response = None;
        self.inner.outcome = Some(Err(error));
        Call::wrap(self.inner)
    }

    /// Timeout for the current attempt.
    pub fn current_timeout(&self) -> Duration {
        self.inner.retry.current_timeout()
    }

    /// Number of retries so far.
    pub fn retries(&self) -> u32 {
        self.inner.retry.retries()
    }
}
