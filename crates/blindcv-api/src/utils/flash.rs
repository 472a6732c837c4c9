//! Signed flash messages carried across a redirect.
//!
//! Cookie value = base64url(json(notices)) "." base64url(HMAC-SHA256(secret, payload)).
//! A value that fails verification is ignored.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use base64::Engine;
use blindcv_core::Notice;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const FLASH_COOKIE: &str = "blindcv_flash";

const COOKIE_ATTRIBUTES: &str = "HttpOnly; SameSite=Lax; Path=/";

#[derive(Clone)]
pub struct FlashSigner {
    mac: Hmac<Sha256>,
}

impl FlashSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mac = Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key size");
        Self { mac }
    }

    /// Signed cookie value for `notices`.
    pub fn sign(&self, notices: &[Notice]) -> String {
        let json = serde_json::to_vec(notices).unwrap_or_else(|_| b"[]".to_vec());
        let payload = base64_url_encode(&json);

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let tag = mac.finalize().into_bytes();

        format!("{}.{}", payload, base64_url_encode(&tag))
    }

    /// Notices of a cookie value produced by [`FlashSigner::sign`].
    pub fn verify(&self, value: &str) -> Option<Vec<Notice>> {
        let (payload, tag) = value.split_once('.')?;
        let tag = base64_url_decode(tag).ok()?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag).ok()?;

        let json = base64_url_decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// `Set-Cookie` value storing `notices`.
    pub fn set_cookie(&self, notices: &[Notice]) -> String {
        format!("{}={}; {}", FLASH_COOKIE, self.sign(notices), COOKIE_ATTRIBUTES)
    }

    /// Pending, correctly signed notices from the request cookies.
    pub fn read(&self, headers: &HeaderMap) -> Option<Vec<Notice>> {
        cookie_value(headers, FLASH_COOKIE).and_then(|value| self.verify(&value))
    }
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_cookie() -> String {
    format!("{}=; Max-Age=0; {}", FLASH_COOKIE, COOKIE_ATTRIBUTES)
}

/// Value of cookie `name`, if the request carries it.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn base64_url_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

fn base64_url_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn signer() -> FlashSigner {
        FlashSigner::new(b"test-secret")
    }

    #[test]
    fn test_sign_and_verify() {
        let notices = vec![
            Notice::error("Nenhum arquivo selecionado."),
            Notice::success("ok"),
        ];
        let value = signer().sign(&notices);
        assert_eq!(signer().verify(&value), Some(notices));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let value = signer().sign(&[Notice::error("original")]);
        let (_, tag) = value.split_once('.').unwrap();
        let forged_payload = base64_url_encode(br#"[{"level":"success","text":"forged"}]"#);
        let forged = format!("{}.{}", forged_payload, tag);

        assert_eq!(signer().verify(&forged), None);
    }

    #[test]
    fn test_other_secret_or_garbage_is_rejected() {
        let value = signer().sign(&[Notice::error("x")]);
        assert_eq!(FlashSigner::new(b"other-secret").verify(&value), None);
        assert_eq!(signer().verify("not-a-cookie"), None);
        assert_eq!(signer().verify(""), None);
    }

    #[test]
    fn test_read_from_cookie_header() {
        let notices = vec![Notice::error("falhou")];
        let mut headers = HeaderMap::new();
        let cookie = format!("theme=dark; {}={}", FLASH_COOKIE, signer().sign(&notices));
        headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(signer().read(&headers), Some(notices));
        assert_eq!(cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(signer().read(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let set = signer().set_cookie(&[]);
        assert!(set.starts_with("blindcv_flash="));
        assert!(set.ends_with("HttpOnly; SameSite=Lax; Path=/"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
