//! Signature & merkle verifier.
//!
//! ## Flow
//!
//! 1. Decode the signature bytes into a [`SignatureFormat`] (or fail with
//!    `MalformedSignature`).
//! 2. For bulk and order-root formats, fold the proof over the leaf with the
//!    commutative pair hash to rebuild the signed root.
//! 3. Wrap the leaf or root with the signer domain and the message typehash.
//! 4. Ask the signer (canonical selector, then legacy alias) whether the
//!    signature authorizes that digest.
//! 5. Return the single-order digest of the leaf as the order identity.

mod format;
mod merkle;
mod verifier;

pub use format::{SignatureFormat, DEFAULT_SIGNATURE_WORDS, FIXED_PROOF_LEN};
pub use merkle::{compute_root, hash_pair, BulkTree};
pub use verifier::SignatureVerifier;
