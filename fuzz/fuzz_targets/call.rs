#![no_main]

use libfuzzer_sys::fuzz_target;
use soap_proto::{Call, Error, RequestDescriptor, RetryResult, SoapObject};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let descriptor = match RequestDescriptor::new(
        "http://svc.test/Users",
        "ns",
        "GetUser",
        [("id", data[0] as i64)],
    ) {
        Ok(v) => v,
        Err(_) => return,
    };

    let call = Call::new(descriptor, |_: SoapObject| {}, |_: Error| {});

    let call = call.proceed();
    if call.body().is_err() {
        return;
    }

    let mut call = call.proceed();

    // Use the first byte to decide whether the first attempt times out
    if data[1] % 4 == 0 {
        call = match call.retry(Error::Transport("timeout".into())) {
            RetryResult::SendBody(call) => call.proceed(),
            RetryResult::Deliver(call) => {
                call.deliver();
                return;
            }
        };
    }

    // Feed the response in two pieces
    let split = (data[0] as usize) % data.len();
    let input = &data[2..];

    let mut used = match call.try_response(&input[..split.min(input.len())]) {
        Ok(v) => v,
        Err(_) => return,
    };

    if used == 0 {
        used = match call.try_response(input) {
            Ok(v) => v,
            Err(_) => return,
        };
    }

    assert!(used <= input.len());

    if !call.can_proceed() {
        call.finish();
        return;
    }

    let Some(call) = call.proceed() else {
        panic!("can_proceed() but no Deliver");
    };

    let call = call.deliver();
    assert!(call.was_delivered());
    assert!(!call.has_listeners());
});
