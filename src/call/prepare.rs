use crate::config::Config;
use crate::descriptor::RequestDescriptor;
use crate::object::SoapObject;
use crate::retry::RetryState;
use crate::Error;

use super::state::{Prepare, SendBody};
use super::{Call, Inner, Listeners};

impl Call<Prepare> {
    /// Create a new call with the default [`Config`].
    ///
    /// `on_response` receives the object of a successful response, `on_error`
    /// any failure. At most one of them is ever invoked.
    pub fn new<F, E>(descriptor: RequestDescriptor, on_response: F, on_error: E) -> Self
    where
        F: FnOnce(SoapObject) + Send + 'static,
        E: FnOnce(Error) + Send + 'static,
    {
        Call::with_config(descriptor, Config::default(), on_response, on_error)
    }

    /// Create a new call with a specific config.
    pub fn with_config<F, E>(
        descriptor: RequestDescriptor,
        config: Config,
        on_response: F,
        on_error: E,
    ) -> Self
    where
        F: FnOnce(SoapObject) + Send + 'static,
        E: FnOnce(Error) + Send + 'static,
    {
        let retry = RetryState::new(*config.get_retry_policy());

        let inner = Inner {
            descriptor,
            config,
            retry,
            listeners: Some(Listeners {
                on_response: Box::new(on_response),
                on_error: Box::new(on_error),
            }),
            response: None,
            outcome: None,
            delivered: false,
        };

        Call::wrap(inner)
    }

    /// Continue to producing the body.
    pub fn proceed(self) -> Call<SendBody> {
        Call::wrap(self.inner)
    }
}
