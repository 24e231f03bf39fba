//! # Payload Codec
//!
//! Decodes the QR wire format into a `SignedCredential`.
//!
//! ## Wire Format (issuance contract, stable)
//!
//! ```text
//! base64url_nopad(payload JSON) "." base64url_nopad(signature)
//! ```
//!
//! The signature is a detached Ed25519 signature over the *decoded* payload
//! segment bytes, i.e. over the exact JSON document the issuer serialized.
//! The payload bytes are kept verbatim in `SignedCredential::signed_bytes`
//! so verification never depends on JSON re-serialization being canonical.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use shared_types::{CredentialPayload, Signature, SignedCredential};

use super::errors::FormatError;

/// Separator between the payload and signature segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Decode a raw scanned string into a signed credential.
///
/// Input is untrusted: every malformed shape returns a `FormatError` value,
/// never a panic. No side effects.
pub fn decode(raw: &str) -> Result<SignedCredential, FormatError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormatError::Empty);
    }

    let mut segments = raw.splitn(3, SEGMENT_SEPARATOR);
    let payload_b64 = segments.next().ok_or(FormatError::MissingSeparator)?;
    let signature_b64 = segments.next().ok_or(FormatError::MissingSeparator)?;
    if segments.next().is_some() {
        return Err(FormatError::TrailingSegment);
    }

    let signed_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| FormatError::Base64 { segment: "payload" })?;

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| FormatError::Base64 {
            segment: "signature",
        })?;

    let signature: Signature =
        signature_bytes
            .as_slice()
            .try_into()
            .map_err(|_| FormatError::SignatureLength {
                got: signature_bytes.len(),
            })?;

    let payload: CredentialPayload =
        serde_json::from_slice(&signed_bytes).map_err(|e| FormatError::Payload {
            message: e.to_string(),
        })?;

    Ok(SignedCredential {
        payload,
        signed_bytes,
        signature,
    })
}

/// Encode payload bytes and a detached signature into the wire format.
///
/// This is the issuer side of the contract; the terminal only uses it in
/// tests and enrollment tooling, but it lives here so the format has exactly
/// one definition.
pub fn encode_segments(signed_bytes: &[u8], signature: &Signature) -> String {
    format!(
        "{}{}{}",
        URL_SAFE_NO_PAD.encode(signed_bytes),
        SEGMENT_SEPARATOR,
        URL_SAFE_NO_PAD.encode(signature)
    )
}
