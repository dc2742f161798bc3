use super::scenario::{Scenario, GET_USER_RESPONSE};

#[test]
fn finish_from_prepare() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_prepare();
    assert_eq!(scenario.recorder().handles(), 3);

    let call = call.finish();
    assert_eq!(scenario.recorder().handles(), 1);
    assert!(!call.was_delivered());
    assert!(!call.has_listeners());
}

#[test]
fn finish_from_send_body() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_send_body().finish();

    assert_eq!(scenario.recorder().handles(), 1);
    assert!(!call.was_delivered());
}

#[test]
fn finish_from_recv_response() {
    let scenario = Scenario::builder().build();
    let mut call = scenario.to_recv_response();
    call.set_response(super::scenario::xml_response(200, GET_USER_RESPONSE));

    let call = call.finish();

    assert_eq!(scenario.recorder().handles(), 1);
    assert!(!call.was_delivered());
    assert!(call.inner().response.is_none());
    assert!(scenario.recorder().delivered().is_empty());
}

#[test]
fn cancel_before_delivery() {
    let scenario = Scenario::builder().build();
    let call = scenario.to_deliver(GET_USER_RESPONSE);

    // Cancelled with an outcome ready. It is dropped, never delivered.
    let call = call.finish();

    assert!(!call.was_delivered());
    assert!(call.inner().outcome.is_none());
    assert!(scenario.recorder().delivered().is_empty());
    assert_eq!(scenario.recorder().handles(), 1);
}
