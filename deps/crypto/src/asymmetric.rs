// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

pub mod rsa {
    use serde::{Deserialize, Serialize};

    #[cfg(feature = "openssl")]
    pub use crate::native::rsa::*;

    #[cfg(all(feature = "rust-crypto", not(feature = "openssl")))]
    pub use crate::rust::rsa::*;

    /// Definitions of different Padding mode for encryption. Refer to
    /// <https://datatracker.ietf.org/doc/html/rfc7518#section-4.1> for
    /// more information.
    #[derive(
        EnumString, AsRefStr, Display, Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy,
        Default,
    )]
    pub enum PaddingMode {
        /// RSAES OAEP using SHA-256 and MGF1 with SHA-256
        #[strum(serialize = "RSA-OAEP-256")]
        #[serde(rename = "RSA-OAEP-256")]
        OAEP,

        /// RSA PKCS#1 v1.5. Fingerprint receivers expect this by default.
        #[default]
        #[strum(serialize = "RSA1_5")]
        #[serde(rename = "RSA1_5")]
        PKCS1v15,
    }

    impl PaddingMode {
        /// Largest plaintext that fits a single block of a key whose modulus
        /// is `modulus_len` bytes long.
        pub fn max_plaintext_len(&self, modulus_len: usize) -> usize {
            let overhead = match self {
                // 2 * SHA-256 output + 2
                PaddingMode::OAEP => 66,
                PaddingMode::PKCS1v15 => 11,
            };
            modulus_len.saturating_sub(overhead)
        }
    }

}
