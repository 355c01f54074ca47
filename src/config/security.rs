use std::env;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";

/// Static response headers for a JSON-only API surface.
fn security_headers() -> Vec<(HeaderName, &'static str)> {
    vec![
        (HeaderName::from_static("x-content-type-options"), "nosniff"),
        (HeaderName::from_static("x-frame-options"), "DENY"),
        (HeaderName::from_static("content-security-policy"), CSP_API_VALUE),
        (
            HeaderName::from_static("referrer-policy"),
            "strict-origin-when-cross-origin",
        ),
    ]
}

fn hsts_enabled() -> bool {
    let is_production = env::var("RUST_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false);

    if is_production {
        tracing::info!("Security: HSTS header enabled (production mode)");
    } else {
        tracing::info!("Security: HSTS header disabled (development mode)");
    }
    is_production
}

/// Layers the security headers onto the router. HSTS is only meaningful
/// behind HTTPS, so it is added in production alone.
pub fn apply_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = router;
    for (name, value) in security_headers() {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }
    if hsts_enabled() {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        ));
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_values_parse() {
        for (_, value) in security_headers() {
            assert!(HeaderValue::from_str(value).is_ok());
        }
        assert!(HeaderValue::from_str(HSTS_VALUE).is_ok());
    }

    #[test]
    fn hsts_defaults_off_outside_production() {
        std::env::remove_var("RUST_ENV");
        assert!(!hsts_enabled());
    }
}
