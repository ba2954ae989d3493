//! Signature wire format.
//!
//! A signature is a sequence of 32-byte words. Word 0 selects the format:
//!
//! | tag | format | layout |
//! |-----|--------|--------|
//! | 0 | bulk, fixed proof | `[0, p0, p1, sig…]` |
//! | 1 | order root, fixed proof | `[1, p0, p1, sig…]` |
//! | 2 | bulk, variable proof | `[2, n, p0..pn-1, sig…]` |
//! | 3 | order root, variable proof | `[3, n, p0..pn-1, sig…]` |
//! | 4 | single order, explicit length | `[4, n, s0..sn-1]` |
//! | 5 | single order, default | `[5, s0, s1]` |
//!
//! Decoding is the only place raw tags are inspected; everything downstream
//! matches on [`SignatureFormat`].

use alloy_primitives::{Bytes, B256, U256};

use crate::error::{ExchangeError, Result};
use crate::hashing::MessageKind;

const WORD: usize = 32;

/// Proof length of the fixed merkle formats
pub const FIXED_PROOF_LEN: usize = 2;

/// Word count of the default single-order signature
pub const DEFAULT_SIGNATURE_WORDS: usize = 2;

/// Decoded signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureFormat<'a> {
    BulkFixed {
        proof: [B256; FIXED_PROOF_LEN],
        signature: &'a [u8],
    },
    OrderRootFixed {
        proof: [B256; FIXED_PROOF_LEN],
        signature: &'a [u8],
    },
    BulkVariable {
        proof: Vec<B256>,
        signature: &'a [u8],
    },
    OrderRootVariable {
        proof: Vec<B256>,
        signature: &'a [u8],
    },
    SingleMulti {
        signature: &'a [u8],
    },
    SingleDefault {
        signature: &'a [u8],
    },
}

impl<'a> SignatureFormat<'a> {
    /// Decode `bytes`, rejecting proofs deeper than `max_proof_depth`
    pub fn decode(bytes: &'a [u8], max_proof_depth: usize) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % WORD != 0 {
            return Err(ExchangeError::MalformedSignature("length is not a whole number of words"));
        }
        let words = Words(bytes);

        let tag = usize::try_from(words.uint(0))
            .map_err(|_| ExchangeError::MalformedSignature("unknown format"))?;

        let format = match tag {
            0 | 1 => {
                let proof = [words.word(1)?, words.word(2)?];
                let signature = words.rest(1 + FIXED_PROOF_LEN)?;
                if tag == 0 {
                    SignatureFormat::BulkFixed { proof, signature }
                } else {
                    SignatureFormat::OrderRootFixed { proof, signature }
                }
            }
            2 | 3 => {
                let depth = words.count(1)?;
                if depth > max_proof_depth {
                    return Err(ExchangeError::MalformedSignature("proof too deep"));
                }
                let proof = (0..depth)
                    .map(|i| words.word(2 + i))
                    .collect::<Result<Vec<_>>>()?;
                let signature = words.rest(2 + depth)?;
                if tag == 2 {
                    SignatureFormat::BulkVariable { proof, signature }
                } else {
                    SignatureFormat::OrderRootVariable { proof, signature }
                }
            }
            4 => {
                let len = words.count(1)?;
                if len == 0 {
                    return Err(ExchangeError::MalformedSignature("empty signature"));
                }
                let signature = words.exact(2, len)?;
                SignatureFormat::SingleMulti { signature }
            }
            5 => {
                let signature = words.exact(1, DEFAULT_SIGNATURE_WORDS)?;
                SignatureFormat::SingleDefault { signature }
            }
            _ => return Err(ExchangeError::MalformedSignature("unknown format")),
        };
        Ok(format)
    }

    /// Wire discriminator
    pub fn tag(&self) -> u8 {
        match self {
            SignatureFormat::BulkFixed { .. } => 0,
            SignatureFormat::OrderRootFixed { .. } => 1,
            SignatureFormat::BulkVariable { .. } => 2,
            SignatureFormat::OrderRootVariable { .. } => 3,
            SignatureFormat::SingleMulti { .. } => 4,
            SignatureFormat::SingleDefault { .. } => 5,
        }
    }

    /// Message kind the signer authorized
    pub fn message_kind(&self) -> MessageKind {
        match self {
            SignatureFormat::BulkFixed { .. } | SignatureFormat::BulkVariable { .. } => {
                MessageKind::BulkOrder
            }
            SignatureFormat::OrderRootFixed { .. } | SignatureFormat::OrderRootVariable { .. } => {
                MessageKind::OrderRoot
            }
            SignatureFormat::SingleMulti { .. } | SignatureFormat::SingleDefault { .. } => {
                MessageKind::SingleOrder
            }
        }
    }

    /// Merkle proof (empty for single-order formats)
    pub fn proof(&self) -> &[B256] {
        match self {
            SignatureFormat::BulkFixed { proof, .. }
            | SignatureFormat::OrderRootFixed { proof, .. } => proof.as_slice(),
            SignatureFormat::BulkVariable { proof, .. }
            | SignatureFormat::OrderRootVariable { proof, .. } => proof.as_slice(),
            SignatureFormat::SingleMulti { .. } | SignatureFormat::SingleDefault { .. } => &[],
        }
    }

    /// Bytes handed to the signer
    pub fn signature(&self) -> &'a [u8] {
        match self {
            SignatureFormat::BulkFixed { signature, .. }
            | SignatureFormat::OrderRootFixed { signature, .. }
            | SignatureFormat::BulkVariable { signature, .. }
            | SignatureFormat::OrderRootVariable { signature, .. }
            | SignatureFormat::SingleMulti { signature }
            | SignatureFormat::SingleDefault { signature } => signature,
        }
    }

    /// Wire encoding; the inverse of [`SignatureFormat::decode`]
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::new();
        out.extend_from_slice(&U256::from(self.tag()).to_be_bytes::<32>());
        match self {
            SignatureFormat::BulkVariable { proof, .. }
            | SignatureFormat::OrderRootVariable { proof, .. } => {
                out.extend_from_slice(&U256::from(proof.len()).to_be_bytes::<32>());
            }
            SignatureFormat::SingleMulti { signature } => {
                let len = signature.len().div_ceil(WORD);
                out.extend_from_slice(&U256::from(len).to_be_bytes::<32>());
            }
            _ => {}
        }
        for node in self.proof() {
            out.extend_from_slice(node.as_slice());
        }
        let signature = self.signature();
        out.extend_from_slice(signature);
        out.resize(out.len() + (WORD - signature.len() % WORD) % WORD, 0);
        Bytes::from(out)
    }
}

/// Word-indexed view of a signature
struct Words<'a>(&'a [u8]);

impl<'a> Words<'a> {
    fn len(&self) -> usize {
        self.0.len() / WORD
    }

    fn word(&self, index: usize) -> Result<B256> {
        if index >= self.len() {
            return Err(ExchangeError::MalformedSignature("truncated"));
        }
        Ok(B256::from_slice(&self.0[index * WORD..(index + 1) * WORD]))
    }

    fn uint(&self, index: usize) -> U256 {
        // index 0 always exists: decode rejects empty input
        self.word(index)
            .map(|word| U256::from_be_bytes(word.0))
            .unwrap_or(U256::MAX)
    }

    /// Word at `index` read as a length that must fit in the remaining words
    fn count(&self, index: usize) -> Result<usize> {
        let value = U256::from_be_bytes(self.word(index)?.0);
        usize::try_from(value)
            .ok()
            .filter(|count| *count <= self.len())
            .ok_or(ExchangeError::MalformedSignature("length prefix out of range"))
    }

    /// Every word from `start` on; must be non-empty
    fn rest(&self, start: usize) -> Result<&'a [u8]> {
        if start >= self.len() {
            return Err(ExchangeError::MalformedSignature("missing signature"));
        }
        Ok(&self.0[start * WORD..])
    }

    /// Exactly `count` words from `start` to the end
    fn exact(&self, start: usize, count: usize) -> Result<&'a [u8]> {
        if start + count != self.len() {
            return Err(ExchangeError::MalformedSignature("unexpected signature length"));
        }
        Ok(&self.0[start * WORD..])
    }
}
