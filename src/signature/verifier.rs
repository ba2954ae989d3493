//! Signature and merkle verification.

use alloy_primitives::{Address, B256};
use tracing::debug;

use super::format::SignatureFormat;
use super::merkle::compute_root;
use crate::error::{ExchangeError, Result};
use crate::hashing::typehash::{IS_VALID_SIGNATURE, IS_VALID_SIGNATURE_LEGACY};
use crate::hashing::{Domain, MessageKind};
use crate::host::Host;

/// Authorizes order leaves against their signer
#[derive(Debug, Clone, Copy)]
pub struct SignatureVerifier {
    domain: Domain,
    max_proof_depth: usize,
}

impl SignatureVerifier {
    pub fn new(domain: Domain, max_proof_depth: usize) -> Self {
        Self {
            domain,
            max_proof_depth,
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Digest the signer must have authorized for `leaf` under `format`
    pub fn signing_digest(&self, format: &SignatureFormat<'_>, leaf: B256) -> B256 {
        let kind = format.message_kind();
        let value = match kind {
            MessageKind::SingleOrder => leaf,
            MessageKind::BulkOrder | MessageKind::OrderRoot => compute_root(leaf, format.proof()),
        };
        self.domain.wrap(kind, value)
    }

    /// Verify `signature` over `leaf` and return the order's canonical digest.
    ///
    /// The returned digest is always the single-order digest of `leaf`, even
    /// when a bulk or order-root signature authorized it.
    ///
    /// # Errors
    ///
    /// - `MalformedSignature` if the bytes do not decode
    /// - `InvalidSignature` if the signer rejects the digest or the call fails
    pub fn verify(
        &self,
        host: &mut dyn Host,
        signer: Address,
        leaf: B256,
        signature: &[u8],
    ) -> Result<B256> {
        let format = SignatureFormat::decode(signature, self.max_proof_depth)?;
        let digest = self.signing_digest(&format, leaf);
        debug!(
            %signer,
            format = format.tag(),
            proof_len = format.proof().len(),
            %digest,
            "verifying order signature"
        );

        if !signer_accepts(host, signer, digest, format.signature()) {
            return Err(ExchangeError::InvalidSignature);
        }
        Ok(self.domain.wrap(MessageKind::SingleOrder, leaf))
    }
}

/// Canonical `isValidSignature` first, then the legacy alias
fn signer_accepts(host: &mut dyn Host, signer: Address, digest: B256, signature: &[u8]) -> bool {
    [IS_VALID_SIGNATURE, IS_VALID_SIGNATURE_LEGACY]
        .into_iter()
        .any(|selector| {
            match host.is_valid_signature(signer, selector, digest, signature) {
                Ok(magic) => magic == selector,
                Err(failure) => {
                    debug!(%signer, %selector, %failure, "signature check call failed");
                    false
                }
            }
        })
}
