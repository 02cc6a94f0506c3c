// Pure URL helpers; no browser types so they can be tested on the host.

/// WebSocket URL for `path` on the page's own host, secure when the page is.
/// A `path` that is already a socket URL is returned unchanged.
pub fn socket_url(page_protocol: &str, host: &str, path: &str) -> String {
    if path.starts_with("ws://") || path.starts_with("wss://") {
        return path.to_string();
    }
    let scheme = if page_protocol.eq_ignore_ascii_case("https:") {
        "wss"
    } else {
        "ws"
    };
    format!("{}://{}/{}", scheme, host, path.trim_start_matches('/'))
}
