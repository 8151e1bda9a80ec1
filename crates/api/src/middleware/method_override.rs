//! `_method` override for HTML forms.
//!
//! Browsers can only submit GET and POST, so edit and delete forms POST to
//! `...?_method=PUT` or `...?_method=DELETE`. The rewrite has to happen
//! before routing, so it wraps the whole [`Router`](axum::Router) as a
//! [`MapRequest`](tower::util::MapRequest) service rather than being a
//! router layer.

use axum::extract::Request;
use axum::http::Method;

/// Query parameter carrying the tunnelled method.
pub const METHOD_PARAM: &str = "_method";

/// Rewrite a POST carrying `_method=PUT|PATCH|DELETE` into that method.
///
/// Any other request is passed through unchanged.
pub fn apply_method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    if let Some(method) = req.uri().query().and_then(override_method) {
        tracing::trace!(%method, path = req.uri().path(), "Method override");
        *req.method_mut() = method;
    }
    req
}

fn override_method(query: &str) -> Option<Method> {
    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == METHOD_PARAM)
        .map(|(_, value)| value)?;

    match raw.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn post_with_override_is_rewritten() {
        let req = apply_method_override(request(Method::POST, "/listings/1?_method=DELETE"));
        assert_eq!(req.method(), Method::DELETE);

        let req = apply_method_override(request(Method::POST, "/listings/1?x=1&_method=put"));
        assert_eq!(req.method(), Method::PUT);
    }

    #[test]
    fn get_is_never_rewritten() {
        let req = apply_method_override(request(Method::GET, "/listings/1?_method=DELETE"));
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn unknown_override_is_ignored() {
        let req = apply_method_override(request(Method::POST, "/listings?_method=TRACE"));
        assert_eq!(req.method(), Method::POST);

        let req = apply_method_override(request(Method::POST, "/listings"));
        assert_eq!(req.method(), Method::POST);
    }
}
