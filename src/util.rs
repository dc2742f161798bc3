/// Trace log a body, line by line.
pub(crate) fn log_data(prefix: &str, data: &[u8]) {
    if !log_enabled!(log::Level::Trace) {
        return;
    }

    let text = String::from_utf8_lossy(data);
    for line in text.lines() {
        trace!("{}{}", prefix, line);
    }
}
