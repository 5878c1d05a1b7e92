//! Responses for routes other than the health query.
//!
//! GET requests are sent back to `/`; everything else gets a plain 403.

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use rand::seq::SliceRandom;

const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

const ALLOWED_HEADERS: &str = "Content-Type, Access-Control-Allow-Headers, Authorization, \
     X-Requested-With, Access-Key, API-usr, Token, ref-key, lu-key";

const POWERED_BY: &[&str] = &[
    "A hamster on a very small wheel",
    "Two tin cans and a string",
    "Leftover holiday lights",
    "A suspiciously warm toaster",
    "Three raccoons in a trench coat",
    "The finest artisanal punch cards",
];

/// Fallback handler for unmatched routes.
pub async fn deny_handler(method: Method) -> Response {
    if method == Method::GET {
        return Redirect::to("/").into_response();
    }

    let powered_by = POWERED_BY
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("network-state-checker");

    (
        StatusCode::FORBIDDEN,
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
            (X_POWERED_BY, powered_by),
        ],
        "403: Access denied",
    )
        .into_response()
}
