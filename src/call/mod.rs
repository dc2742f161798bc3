//! Lifecycle of a SOAP call
//!
//! Sans-IO, which means the call never sends or receives anything itself. The
//! request framework asks for the body, transmits it, and hands the response
//! back.
//!
//! The [`Call`] object encodes the lifecycle using state variables, for example
//! `Call<SendBody>` to represent the stage where the body is to be sent.
//!
//! The states are:
//!
//! * **Prepare** - The call is created, nothing has been rendered yet.
//! * **SendBody** - The envelope is rendered on demand, as many times as the
//!   framework asks for it.
//! * **RecvResponse** - The body has been handed to the transport and we are
//!   waiting for a response. A failed attempt may go back to SendBody if the
//!   retry policy allows it.
//! * **Deliver** - The response has been interpreted into a result or an error.
//! * **Finished** - The listeners are released. No further delivery is
//!   possible.
//!
//! Any state can go straight to Finished with [`Call::finish()`], which is how
//! a call is cancelled.
//!
//! ```text
//!            ┌──────────────────┐
//!            │     Prepare      │
//!            └──────────────────┘
//!                      │
//!                      ▼
//!            ┌──────────────────┐
//!            │     SendBody     │◀──┐
//!            └──────────────────┘   │
//!                      │            │ retry
//!                      ▼            │
//!            ┌──────────────────┐   │
//!            │   RecvResponse   │───┘
//!            └──────────────────┘
//!                      │
//!                      ▼
//!            ┌──────────────────┐
//!            │     Deliver      │
//!            └──────────────────┘
//!                      │
//!                      ▼
//!            ┌──────────────────┐
//!            │     Finished     │
//!            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//! use soap_proto::*;
//!
//! let descriptor = RequestDescriptor::new(
//!     "http://svc.test/Users",
//!     "ns",
//!     "GetUser",
//!     [("id", "42")],
//! ).unwrap();
//!
//! let (tx, rx) = mpsc::channel();
//!
//! // ********************************** Prepare
//!
//! let call = Call::new(
//!     descriptor,
//!     move |user: SoapObject| tx.send(user).unwrap(),
//!     |err: Error| panic!("call failed: {}", err),
//! );
//!
//! // ********************************** SendBody
//!
//! let call = call.proceed();
//!
//! let request = call.request().unwrap();
//! assert_eq!(request.method(), "POST");
//! assert_eq!(request.headers()["soapaction"], "\"ns#GetUser\"");
//! assert_eq!(request.headers()["content-type"], "text/xml; charset=utf-8");
//!
//! // The framework sends the request, with the timeout from
//! // call.current_timeout().
//!
//! // ********************************** RecvResponse
//!
//! let mut call = call.proceed();
//!
//! let input = b"HTTP/1.1 200 OK\r\n\
//!     Content-Type: text/xml; charset=utf-8\r\n\
//!     Content-Length: 156\r\n\
//!     \r\n\
//!     <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\">\
//!     <s:Body><GetUserResponse xmlns=\"ns\"><name>Ana</name></GetUserResponse>\
//!     </s:Body></s:Envelope>";
//!
//! let input_used = call.try_response(input).unwrap();
//! assert_eq!(input_used, input.len());
//!
//! // ********************************** Deliver
//!
//! let call = match call.proceed() {
//!     Some(v) => v,
//!     None => panic!(),
//! };
//! assert!(call.is_success());
//!
//! // ********************************** Finished
//!
//! let call = call.deliver();
//! assert!(call.was_delivered());
//!
//! let user = rx.recv().unwrap();
//! assert_eq!(user.get_str("name"), Some("Ana"));
//! ```

use std::fmt;
use std::marker::PhantomData;

use http::Response;

use crate::config::Config;
use crate::descriptor::RequestDescriptor;
use crate::object::SoapObject;
use crate::response::SoapResponse;
use crate::retry::{RetryPolicy, RetryState};
use crate::{Error, CONTENT_TYPE};

#[cfg(test)]
mod test;

/// State types for the Call state machine.
///
/// These types are used as type parameters to `Call<State>` to represent
/// the current stage of the call lifecycle.
pub mod state {
    pub(crate) trait Named {
        fn name() -> &'static str;
    }

    macro_rules! call_state {
        ($n:tt) => {
            #[doc(hidden)]
            pub struct $n(());
            impl Named for $n {
                fn name() -> &'static str {
                    stringify!($n)
                }
            }
        };
    }

    call_state!(Prepare);
    call_state!(SendBody);
    call_state!(RecvResponse);
    call_state!(Deliver);
    call_state!(Finished);
}
use self::state::*;

/// A SOAP call, in some state following the [state graph][crate::call].
pub struct Call<State> {
    inner: Inner,
    _ph: PhantomData<State>,
}

// pub(crate) for tests to inspect state
#[derive(Debug)]
pub(crate) struct Inner {
    pub descriptor: RequestDescriptor,
    pub config: Config,
    pub retry: RetryState,
    pub listeners: Option<Listeners>,
    pub response: Option<Response<Vec<u8>>>,
    pub outcome: Option<Result<SoapResponse, Error>>,
    pub delivered: bool,
}

type OnResponse = Box<dyn FnOnce(SoapObject) + Send>;
type OnError = Box<dyn FnOnce(Error) + Send>;

/// One-shot success and error listeners. Invoking one consumes both.
pub(crate) struct Listeners {
    on_response: OnResponse,
    on_error: OnError,
}

impl Listeners {
    fn deliver(self, outcome: Result<SoapResponse, Error>) {
        match outcome {
            Ok(v) => (self.on_response)(v.into_object()),
            Err(e) => (self.on_error)(e),
        }
    }
}

impl<S> Call<S> {
    fn wrap(inner: Inner) -> Call<S>
    where
        S: Named,
    {
        let wrapped = Call {
            inner,
            _ph: PhantomData,
        };

        debug!("{:?}", wrapped);

        wrapped
    }

    /// The call being made.
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.inner.descriptor
    }

    /// The config the call was created with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The retry policy for the request framework to apply.
    pub fn retry_policy(&self) -> &RetryPolicy {
        self.inner.retry.policy()
    }

    /// Content type of the request body.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Content type of the request body when posting. Same as
    /// [`Call::content_type()`].
    pub fn post_body_content_type(&self) -> &'static str {
        self.content_type()
    }

    /// End the call, releasing the listeners.
    ///
    /// Called from any state other than `Deliver` this cancels the call:
    /// neither listener will be invoked.
    pub fn finish(mut self) -> Call<Finished> {
        self.inner.listeners = None;
        self.inner.response = None;
        self.inner.outcome = None;
        Call::wrap(self.inner)
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Inner {
        &self.inner
    }
}

// //////////////////////////////////////////////////////////////////////////////////////////// PREPARE

mod prepare;

// //////////////////////////////////////////////////////////////////////////////////////////// SEND BODY

mod sendbody;

// //////////////////////////////////////////////////////////////////////////////////////////// RECV RESPONSE

mod recvresponse;

/// Possible state transitions after a failed attempt.
///
/// See the [state graph][crate::call].
pub enum RetryResult {
    /// The policy allows another attempt. Send the body again.
    SendBody(Call<SendBody>),

    /// The policy is exhausted. The failure is delivered.
    Deliver(Call<Deliver>),
}

// //////////////////////////////////////////////////////////////////////////////////////////// DELIVER

mod deliver;

// //////////////////////////////////////////////////////////////////////////////////////////// FINISHED

impl Call<Finished> {
    /// Tell if a listener was invoked before finishing.
    pub fn was_delivered(&self) -> bool {
        self.inner.delivered
    }

    /// Tell if the call still holds on to its listeners. Always `false`.
    pub fn has_listeners(&self) -> bool {
        self.inner.listeners.is_some()
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////

impl<State: Named> fmt::Debug for Call<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call<{}>", State::name())
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").finish()
    }
}
