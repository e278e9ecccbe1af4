// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use log::debug;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::sha2::Sha256;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

use crate::rsa::PaddingMode;
use crate::{trim_pem, CryptoError, Result};

fn pem_str(pem: &[u8]) -> Result<&str> {
    std::str::from_utf8(trim_pem(pem))
        .map_err(|e| CryptoError::Key(format!("PEM is not UTF-8: {e}")))
}

#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Parse a SubjectPublicKeyInfo or PKCS#1 PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = pem_str(pem)?;
        let inner = match RsaPublicKey::from_public_key_pem(pem) {
            Ok(key) => key,
            Err(spki_err) => {
                debug!("public key is not SPKI ({spki_err}), trying PKCS#1");
                RsaPublicKey::from_pkcs1_pem(pem)
                    .map_err(|e| CryptoError::Key(format!("parse RSA public key: {e}")))?
            }
        };
        Ok(Self { inner })
    }

    /// Export as a SubjectPublicKeyInfo PEM document.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Key(format!("export RSA public key: {e}")))
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn max_plaintext_len(&self, mode: PaddingMode) -> usize {
        mode.max_plaintext_len(self.size())
    }

    pub fn encrypt(&self, mode: PaddingMode, plaintext: &[u8]) -> Result<Vec<u8>> {
        let max = self.max_plaintext_len(mode);
        if plaintext.len() > max {
            return Err(CryptoError::MessageTooLong {
                len: plaintext.len(),
                max,
            });
        }

        let mut rng = rand::thread_rng();
        let res = match mode {
            PaddingMode::OAEP => {
                self.inner
                    .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
            }
            PaddingMode::PKCS1v15 => self.inner.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext),
        };
        res.map_err(|e| CryptoError::Encrypt(e.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    pub fn generate(bits: usize) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let inner = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CryptoError::Key(format!("generate RSA key: {e}")))?;
        Ok(Self { inner })
    }

    /// Parse a PKCS#8 or PKCS#1 PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = pem_str(pem)?;
        let inner = match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => key,
            Err(pkcs8_err) => {
                debug!("private key is not PKCS#8 ({pkcs8_err}), trying PKCS#1");
                RsaPrivateKey::from_pkcs1_pem(pem)
                    .map_err(|e| CryptoError::Key(format!("parse RSA private key: {e}")))?
            }
        };
        Ok(Self { inner })
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey {
            inner: self.inner.to_public_key(),
        })
    }

    pub fn decrypt(&self, mode: PaddingMode, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let res = match mode {
            PaddingMode::OAEP => self.inner.decrypt(Oaep::new::<Sha256>(), ciphertext),
            PaddingMode::PKCS1v15 => self.inner.decrypt(Pkcs1v15Encrypt, ciphertext),
        };
        res.map_err(|e| CryptoError::Decrypt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_round_trip() {
        let private = PrivateKey::generate(1024).unwrap();
        let public = private.public_key().unwrap();
        let public = PublicKey::from_pem(public.to_pem().unwrap().as_bytes()).unwrap();
        assert_eq!(public.size(), 128);

        let payload = vec![0x5a; public.max_plaintext_len(PaddingMode::PKCS1v15)];
        let ciphertext = public.encrypt(PaddingMode::PKCS1v15, &payload).unwrap();
        assert_eq!(ciphertext.len(), 128);
        assert_eq!(
            private.decrypt(PaddingMode::PKCS1v15, &ciphertext).unwrap(),
            payload
        );
    }

    #[test]
    fn test_message_too_long() {
        let private = PrivateKey::generate(1024).unwrap();
        let public = private.public_key().unwrap();
        let payload = vec![0u8; public.max_plaintext_len(PaddingMode::OAEP) + 1];
        let res = public.encrypt(PaddingMode::OAEP, &payload);
        assert!(matches!(
            res,
            Err(CryptoError::MessageTooLong { len: 63, max: 62 })
        ));
    }
}
