//! Client address resolution for rate limiting

use actix_web::dev::ConnectionInfo;
use std::net::SocketAddr;

/// Address used when the peer is unknown (e.g. unit tests without a socket)
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The requesting client's IP.
///
/// Proxy headers (`Forwarded`, `X-Forwarded-For`) are only honoured when the
/// service runs behind a trusted proxy; otherwise a client could pick its own
/// rate limit subject.
pub fn client_ip(info: &ConnectionInfo, trust_proxy_headers: bool) -> String {
    let raw = if trust_proxy_headers {
        info.realip_remote_addr()
    } else {
        info.peer_addr()
    };

    raw.map(strip_port)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn strip_port(addr: &str) -> String {
    match addr.parse::<SocketAddr>() {
        Ok(socket) => socket.ip().to_string(),
        Err(_) => addr.trim().to_string(),
    }
}
