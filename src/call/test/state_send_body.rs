use std::time::Duration;

use http::header;

use crate::config::Config;
use crate::descriptor::TransportKind;
use crate::retry::RetryPolicy;

use super::scenario::Scenario;

#[test]
fn body_is_rendered_envelope() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body();

    let body = String::from_utf8(call.body().unwrap()).unwrap();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<GetUser id=\"o0\" c:root=\"1\" xmlns=\"ns\">"));
    assert!(body.contains("<id i:type=\"d:string\">42</id>"));
}

#[test]
fn body_is_not_memoized() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body();

    let first = call.payload().unwrap();
    let second = call.payload().unwrap();

    assert_eq!(first.as_str(), second.as_str());
    assert_ne!(first.bytes().as_ptr(), second.bytes().as_ptr());
}

#[test]
fn post_body_same_as_body() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body();

    assert_eq!(call.body().unwrap(), call.post_body().unwrap());
    assert_eq!(call.content_type(), "text/xml; charset=utf-8");
    assert_eq!(call.post_body_content_type(), call.content_type());
}

#[test]
fn verbose_envelope_renders_the_same() {
    let quiet = Scenario::builder().build();
    let verbose = Scenario::builder()
        .config(Config::new().verbose_envelope(true))
        .build();

    let quiet_call = quiet.to_send_body();
    let verbose_call = verbose.to_send_body();

    assert!(verbose_call.config().is_verbose_envelope());
    assert!(!quiet_call.config().is_verbose_envelope());
    assert_eq!(quiet_call.body().unwrap(), verbose_call.body().unwrap());
}

#[test]
fn request_headers() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body();

    let request = call.request().unwrap();
    assert_eq!(request.method(), "POST");
    assert_eq!(request.uri(), "http://svc.test/Users");
    assert_eq!(request.headers()["soapaction"], "\"ns#GetUser\"");
    assert_eq!(
        request.headers()[header::CONTENT_TYPE],
        "text/xml; charset=utf-8"
    );
    assert_eq!(
        request.headers()[header::CONTENT_LENGTH],
        request.body().len().to_string().as_str()
    );
}

#[test]
fn transport_follows_scheme() {
    let plain = Scenario::builder().build();
    assert_eq!(plain.to_send_body().transport(), TransportKind::Plain);

    let secure = Scenario::builder().url("https://svc.test/Users").build();
    assert_eq!(secure.to_send_body().transport(), TransportKind::Secure);
}

#[test]
fn first_attempt_uses_policy_timeout() {
    let policy = RetryPolicy::new(Duration::from_secs(3), 2, 1.0);
    let scenario = Scenario::builder()
        .config(Config::new().retry_policy(policy))
        .build();
    let call = scenario.to_send_body();

    assert_eq!(call.current_timeout(), Duration::from_secs(3));
    assert_eq!(call.retries(), 0);
    assert_eq!(call.retry_policy(), &policy);
}

#[test]
fn nothing_delivered_while_sending() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body();
    call.body().unwrap();

    assert!(scenario.recorder().delivered().is_empty());
}
