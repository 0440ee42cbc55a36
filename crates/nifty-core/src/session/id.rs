//! Session identifier generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Bytes of OS randomness behind every generated session id.
pub const SESSION_ID_BYTES: usize = 32;

/// Generate a new opaque session id: 32 random bytes, URL-safe base64 (43 chars).
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Use the client-supplied id as-is, or generate one if it is absent or blank.
pub fn resolve_session_id(requested: Option<&str>) -> String {
    match requested {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => generate_session_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_decodes_to_32_bytes() {
        let id = generate_session_id();
        assert_eq!(id.len(), 43);
        let decoded = URL_SAFE_NO_PAD.decode(&id).unwrap();
        assert_eq!(decoded.len(), SESSION_ID_BYTES);
    }

    #[test]
    fn test_generated_id_is_url_safe() {
        let id = generate_session_id();
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_resolve_keeps_client_id_verbatim() {
        assert_eq!(resolve_session_id(Some("user-42")), "user-42");
        assert_eq!(resolve_session_id(Some(" padded ")), " padded ");
    }

    #[test]
    fn test_resolve_generates_for_missing_or_blank() {
        assert_eq!(resolve_session_id(None).len(), 43);
        assert_eq!(resolve_session_id(Some("")).len(), 43);
        assert_eq!(resolve_session_id(Some("   ")).len(), 43);
    }
}
