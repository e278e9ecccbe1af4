// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! RSA helper used to protect host fingerprints in transit.
//!
//! The probe never touches key material. Callers hand over PEM-encoded keys
//! and byte payloads, and get ciphertext or plaintext back.

#[macro_use]
extern crate strum;

mod asymmetric;
pub use asymmetric::*;

mod error;
pub use error::{CryptoError, Result};

#[cfg(feature = "openssl")]
mod native;

#[cfg(all(feature = "rust-crypto", not(feature = "openssl")))]
mod rust;

/// Encrypt `plaintext` with the PEM encoded public key.
///
/// Accepts SubjectPublicKeyInfo (`PUBLIC KEY`) and PKCS#1 (`RSA PUBLIC KEY`)
/// documents. Fails with [`CryptoError::Key`] when the key cannot be parsed.
pub fn encrypt(
    public_pem: &[u8],
    padding: crate::rsa::PaddingMode,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let key = crate::rsa::PublicKey::from_pem(public_pem)?;
    key.encrypt(padding, plaintext)
}

/// Decrypt `ciphertext` with the PEM encoded private key (PKCS#8 or PKCS#1).
pub fn decrypt(
    private_pem: &[u8],
    padding: crate::rsa::PaddingMode,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let key = crate::rsa::PrivateKey::from_pem(private_pem)?;
    key.decrypt(padding, ciphertext)
}

/// Drop the NUL padding some key stores leave around a PEM document.
pub(crate) fn trim_pem(pem: &[u8]) -> &[u8] {
    let start = pem.iter().position(|b| *b != 0).unwrap_or(pem.len());
    let end = pem.iter().rposition(|b| *b != 0).map_or(start, |i| i + 1);
    &pem[start..end]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decrypt, encrypt, trim_pem, CryptoError};
    use crate::rsa::PaddingMode;

    const PUBLIC_PEM: &[u8] = include_bytes!("../tests/data/public.pem");
    const PUBLIC_PKCS1_PEM: &[u8] = include_bytes!("../tests/data/public_pkcs1.pem");
    const PRIVATE_PEM: &[u8] = include_bytes!("../tests/data/private.pem");
    const PRIVATE_PKCS1_PEM: &[u8] = include_bytes!("../tests/data/private_pkcs1.pem");
    const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("../tests/data/other_private.pem");

    #[rstest]
    #[case(PUBLIC_PEM, PRIVATE_PEM, PaddingMode::PKCS1v15)]
    #[case(PUBLIC_PEM, PRIVATE_PEM, PaddingMode::OAEP)]
    #[case(PUBLIC_PKCS1_PEM, PRIVATE_PKCS1_PEM, PaddingMode::PKCS1v15)]
    #[case(PUBLIC_PKCS1_PEM, PRIVATE_PEM, PaddingMode::OAEP)]
    fn en_decrypt(
        #[case] public_pem: &[u8],
        #[case] private_pem: &[u8],
        #[case] padding: PaddingMode,
    ) {
        let plaintext = b"architecture=x64\nisElevated=false\n";
        let ciphertext = encrypt(public_pem, padding, plaintext).expect("encryption failed");
        assert_ne!(&ciphertext[..], &plaintext[..]);
        let decrypted = decrypt(private_pem, padding, &ciphertext).expect("decryption failed");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_nul_padded_public_key() {
        let mut padded = PUBLIC_PEM.to_vec();
        padded.extend_from_slice(&[0, 0, 0, 0]);
        let ciphertext = encrypt(&padded, PaddingMode::PKCS1v15, b"alice").unwrap();
        let plaintext = decrypt(PRIVATE_PEM, PaddingMode::PKCS1v15, &ciphertext).unwrap();
        assert_eq!(plaintext, b"alice");
    }

    #[test]
    fn test_bad_public_key() {
        let res = encrypt(b"not a key", PaddingMode::PKCS1v15, b"alice");
        assert!(matches!(res, Err(CryptoError::Key(_))));
    }

    #[test]
    fn test_bad_private_key() {
        let res = decrypt(PUBLIC_PEM, PaddingMode::PKCS1v15, &[0u8; 256]);
        assert!(matches!(res, Err(CryptoError::Key(_))));
    }

    #[test]
    fn test_wrong_key_oaep() {
        let ciphertext = encrypt(PUBLIC_PEM, PaddingMode::OAEP, b"session=1").unwrap();
        let res = decrypt(OTHER_PRIVATE_PEM, PaddingMode::OAEP, &ciphertext);
        assert!(matches!(res, Err(CryptoError::Decrypt(_))));
    }

    // OpenSSL 3.2+ applies implicit rejection to PKCS#1 v1.5 and returns
    // random bytes instead of an error.
    #[cfg(not(feature = "openssl"))]
    #[test]
    fn test_wrong_key_pkcs1v15() {
        let ciphertext = encrypt(PUBLIC_PEM, PaddingMode::PKCS1v15, b"session=1").unwrap();
        let res = decrypt(OTHER_PRIVATE_PEM, PaddingMode::PKCS1v15, &ciphertext);
        assert!(matches!(res, Err(CryptoError::Decrypt(_))));
    }

    #[test]
    fn test_garbage_ciphertext() {
        let res = decrypt(PRIVATE_PEM, PaddingMode::PKCS1v15, b"definitely not rsa");
        assert!(matches!(res, Err(CryptoError::Decrypt(_))));
    }

    #[rstest]
    #[case(b"\0\0abc\0", b"abc")]
    #[case(b"abc", b"abc")]
    #[case(b"\0\0", b"")]
    #[case(b"", b"")]
    fn test_trim_pem(#[case] input: &[u8], #[case] expected: &[u8]) {
        assert_eq!(trim_pem(input), expected);
    }
}
