// Endpoint resolution.
//
// Health endpoints are configured either as absolute URLs or as paths on
// the landing page's own origin (`/solar_news/api/health`).

use url::Url;

use crate::error::Error;

/// Resolve a configured endpoint against an optional base URL.
///
/// Absolute URLs are returned as-is. Anything else is joined onto `base`,
/// so `/svc/api/health` against `http://host:8080/landing/` yields
/// `http://host:8080/svc/api/health`.
pub fn resolve_endpoint(base: Option<&Url>, endpoint: &str) -> Result<Url, Error> {
    match Url::parse(endpoint) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| Error::MissingBaseUrl {
                endpoint: endpoint.to_owned(),
            })?;
            Ok(base.join(endpoint)?)
        }
        Err(e) => Err(Error::InvalidUrl(e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn absolute_endpoint_ignores_base() {
        let base = Url::parse("http://landing.local").unwrap();
        let url = resolve_endpoint(Some(&base), "https://svc.example/health").unwrap();
        assert_eq!(url.as_str(), "https://svc.example/health");
    }

    #[test]
    fn root_relative_endpoint_joins_origin() {
        let base = Url::parse("http://localhost:8080/landing/").unwrap();
        let url = resolve_endpoint(Some(&base), "/solar_news/api/health").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/solar_news/api/health");
    }

    #[test]
    fn relative_endpoint_without_base_fails() {
        let err = resolve_endpoint(None, "/solar_news/api/health").unwrap_err();
        assert!(matches!(err, Error::MissingBaseUrl { .. }), "got {err:?}");
    }

    #[test]
    fn malformed_endpoint_fails() {
        let err = resolve_endpoint(None, "http://[::1").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)), "got {err:?}");
    }
}
