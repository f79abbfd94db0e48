use std::fmt;

use serde::{Deserialize, Serialize};

const REF_PREFIX: &str = "appl_";
const KEY_CONTEXT: &str = "credit-ledger 2024-06 applicant-ref key";
const DOMAIN: &[u8] = b"credit-applicant-ref-v1:";

/// Pseudonymous applicant reference as stored in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantRef(String);

impl ApplicantRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns caller applicant tokens into ledger references.
///
/// With a secret the reference is a keyed blake3 MAC, so it cannot be
/// recomputed from a guessed token without the key. Without one it is a
/// domain-separated hash, still stable across restarts.
#[derive(Clone, Default)]
pub struct ApplicantHasher {
    key: Option<[u8; 32]>,
}

impl ApplicantHasher {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            key: secret
                .filter(|s| !s.is_empty())
                .map(|s| blake3::derive_key(KEY_CONTEXT, s.as_bytes())),
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    pub fn reference(&self, applicant_id: &str) -> ApplicantRef {
        let hash = match &self.key {
            Some(key) => blake3::keyed_hash(key, applicant_id.as_bytes()),
            None => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(DOMAIN);
                hasher.update(applicant_id.as_bytes());
                hasher.finalize()
            }
        };
        ApplicantRef(format!("{REF_PREFIX}{}", &hash.to_hex().as_str()[..32]))
    }
}

impl fmt::Debug for ApplicantHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicantHasher")
            .field("keyed", &self.is_keyed())
            .finish()
    }
}
