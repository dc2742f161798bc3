use crate::cache::CacheEntry;
use crate::response::SoapResponse;
use crate::Error;

use super::state::{Deliver, Finished};
use super::Call;

impl Call<Deliver> {
    /// The interpreted outcome.
    pub fn outcome(&self) -> Result<&SoapResponse, &Error> {
        // Unwrap is OK, because we can't be here without an outcome.
        self.inner.outcome.as_ref().unwrap().as_ref()
    }

    /// Tell if the outcome is a success.
    pub fn is_success(&self) -> bool {
        self.outcome().is_ok()
    }

    /// Caching metadata of a successful response.
    pub fn cache_entry(&self) -> Option<&CacheEntry> {
        self.outcome().ok().and_then(|r| r.cache_entry())
    }

    /// Invoke the success or the error listener with the outcome, and finish.
    pub fn deliver(mut self) -> Call<Finished> {
        let outcome = self.inner.outcome.take();
        let listeners = self.inner.listeners.take();

        if let (Some(outcome), Some(listeners)) = (outcome, listeners) {
            listeners.deliver(outcome);
            self.inner.delivered = true;
        }

        Call::wrap(self.inner)
    }
}
