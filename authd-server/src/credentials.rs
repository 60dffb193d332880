//! Credential extraction from call metadata.
//!
//! Both parsers read the `Authorization` header. Absence of a credential is
//! never an error here; only a credential that is present but malformed is.

use crate::errors::AuthError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use http::HeaderMap;

/// An id/secret pair presented via HTTP Basic authentication. Depending on
/// the grant, the pair names a client or a resource owner.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub id: String,
    pub secret: String,
}

/// Extract a bearer token value from call metadata. The scheme comparison is
/// case-insensitive; a non-bearer header yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if value.len() > 7 && value[..7].eq_ignore_ascii_case("bearer ") {
        let token = value[7..].trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    } else {
        None
    }
}

/// Extract Basic credentials from call metadata.
///
/// Returns `Ok(None)` when no Basic credential is present. A Basic credential
/// that fails to decode, or decodes without an id:secret separator, is an
/// `InvalidArgument` error.
pub fn basic_credentials(headers: &HeaderMap) -> Result<Option<BasicCredentials>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };
    if value.len() < 6 || !value[..6].eq_ignore_ascii_case("basic ") {
        return Ok(None);
    }

    let decoded = STANDARD
        .decode(value[6..].trim())
        .map_err(|_| AuthError::InvalidArgument("invalid basic auth encoding".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::InvalidArgument("invalid basic auth encoding".to_string()))?;
    let (id, secret) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::InvalidArgument("invalid basic auth credential".to_string()))?;

    Ok(Some(BasicCredentials {
        id: id.to_string(),
        secret: secret.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let headers = headers_with_auth("bEaReR abc123");
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_or_foreign_scheme_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with_auth("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with_auth("Bearer ")), None);
    }

    #[test]
    fn basic_credentials_are_decoded() {
        let encoded = STANDARD.encode("client:password");
        let headers = headers_with_auth(&format!("Basic {encoded}"));
        let creds = basic_credentials(&headers).unwrap().unwrap();
        assert_eq!(creds.id, "client");
        assert_eq!(creds.secret, "password");
    }

    #[test]
    fn secret_may_contain_colons() {
        let encoded = STANDARD.encode("client:pass:word");
        let headers = headers_with_auth(&format!("Basic {encoded}"));
        let creds = basic_credentials(&headers).unwrap().unwrap();
        assert_eq!(creds.secret, "pass:word");
    }

    #[test]
    fn absent_basic_credential_is_ok_none() {
        assert!(basic_credentials(&HeaderMap::new()).unwrap().is_none());
        assert!(basic_credentials(&headers_with_auth("Bearer abc"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_basic_credential_is_invalid_argument() {
        let bad_base64 = headers_with_auth("Basic !!!not-base64!!!");
        assert!(matches!(
            basic_credentials(&bad_base64),
            Err(AuthError::InvalidArgument(_))
        ));

        let no_separator = headers_with_auth(&format!("Basic {}", STANDARD.encode("nocolon")));
        assert!(matches!(
            basic_credentials(&no_separator),
            Err(AuthError::InvalidArgument(_))
        ));
    }
}
