//! # Ed25519 Verification
//!
//! Pure domain logic for detached-signature verification against the
//! enrollment public key.
//!
//! ## Security Notes
//!
//! - **Strict Verification**: `verify_strict` rejects small-order and
//!   mixed-order components that plain `verify` accepts.
//! - **Constant-Time**: signature equality inside ed25519-dalek is
//!   constant-time; no early-exit comparison happens here.
//! - **No Panics on Malformed Input**: undecodable key bytes or a signature
//!   over different bytes both return `false`, which the orchestrator maps
//!   to an INVALID outcome.

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use shared_types::{KeyMaterial, Signature, SignedCredential};

/// Verify a detached signature over exactly `payload_bytes`.
///
/// Returns `false` for any verification failure: corrupted key bytes,
/// tampered payload, or a signature produced by a different key. Absence of
/// key material is not handled here; the orchestrator treats that as the
/// fatal not-enrolled condition before verification is attempted.
pub fn verify(payload_bytes: &[u8], signature: &Signature, key: &KeyMaterial) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key.public_key) else {
        return false;
    };

    let signature = DalekSignature::from_bytes(signature);
    verifying_key
        .verify_strict(payload_bytes, &signature)
        .is_ok()
}

/// Verify a decoded credential against the enrollment key.
///
/// The credential's `kid` must name the enrolled key; a mismatch fails
/// verification rather than erroring, since an attacker controls that field.
pub fn verify_credential(credential: &SignedCredential, key: &KeyMaterial) -> bool {
    if credential.payload.kid != key.key_id {
        return false;
    }
    verify(&credential.signed_bytes, &credential.signature, key)
}

// =============================================================================
// TEST HELPERS
// =============================================================================
