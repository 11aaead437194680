//! Response header hygiene.
//!
//! The service is stateless: no response may establish a session, so any
//! `Set-Cookie` emitted by a downstream handler is dropped on the way out.

use axum::{extract::State, http::header, response::Response};

/// Response mapper; the state flag turns stripping on or off.
pub async fn strip_set_cookie(State(enabled): State<bool>, mut response: Response) -> Response {
    if !enabled {
        return response;
    }
    let headers = response.headers_mut();
    if headers.contains_key(header::SET_COOKIE) {
        let dropped = headers.get_all(header::SET_COOKIE).iter().count();
        headers.remove(header::SET_COOKIE);
        tracing::debug!(dropped, "Stripped Set-Cookie from response");
    }
    response
}
