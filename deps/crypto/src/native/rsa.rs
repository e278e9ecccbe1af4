// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use openssl::encrypt::{Decrypter, Encrypter};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::{Padding, Rsa};

use crate::rsa::PaddingMode;
use crate::{trim_pem, CryptoError, Result};

fn openssl_padding(mode: PaddingMode) -> Padding {
    match mode {
        PaddingMode::OAEP => Padding::PKCS1_OAEP,
        PaddingMode::PKCS1v15 => Padding::PKCS1,
    }
}

#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: PKey<Public>,
}

impl PublicKey {
    /// Parse a SubjectPublicKeyInfo or PKCS#1 PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = trim_pem(pem);
        let inner = match PKey::public_key_from_pem(pem) {
            Ok(key) => key,
            Err(_) => Rsa::public_key_from_pem_pkcs1(pem)
                .and_then(PKey::from_rsa)
                .map_err(|e| CryptoError::Key(format!("parse RSA public key: {e}")))?,
        };
        if inner.rsa().is_err() {
            return Err(CryptoError::Key("public key is not an RSA key".into()));
        }
        Ok(Self { inner })
    }

    pub fn to_pem(&self) -> Result<String> {
        let pem = self
            .inner
            .public_key_to_pem()
            .map_err(|e| CryptoError::Key(format!("export RSA public key: {e}")))?;
        String::from_utf8(pem).map_err(|e| CryptoError::Key(e.to_string()))
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

        let encrypt = || -> std::result::Result<Vec<u8>, openssl::error::ErrorStack> {
            let mut encrypter = Encrypter::new(&self.inner)?;
            encrypter.set_rsa_padding(openssl_padding(mode))?;
            if mode == PaddingMode::OAEP {
                encrypter.set_rsa_oaep_md(MessageDigest::sha256())?;
                encrypter.set_rsa_mgf1_md(MessageDigest::sha256())?;
            }
            let mut ciphertext = vec![0; encrypter.encrypt_len(plaintext)?];
            let len = encrypter.encrypt(plaintext, &mut ciphertext)?;
            ciphertext.truncate(len);
            Ok(ciphertext)
        };
        encrypt().map_err(|e| CryptoError::Encrypt(e.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: PKey<Private>,
}

impl PrivateKey {
    pub fn generate(bits: usize) -> Result<Self> {
        let bits = u32::try_from(bits).map_err(|e| CryptoError::Key(e.to_string()))?;
        let inner = Rsa::generate(bits)
            .and_then(PKey::from_rsa)
            .map_err(|e| CryptoError::Key(format!("generate RSA key: {e}")))?;
        Ok(Self { inner })
    }

    /// Parse a PKCS#8 or PKCS#1 PEM document.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let inner = PKey::private_key_from_pem(trim_pem(pem))
            .map_err(|e| CryptoError::Key(format!("parse RSA private key: {e}")))?;
        if inner.rsa().is_err() {
            return Err(CryptoError::Key("private key is not an RSA key".into()));
        }
        Ok(Self { inner })
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        let der = self
            .inner
            .public_key_to_der()
            .map_err(|e| CryptoError::Key(e.to_string()))?;
        let inner = PKey::public_key_from_der(&der).map_err(|e| CryptoError::Key(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    pub fn decrypt(&self, mode: PaddingMode, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let decrypt = || -> std::result::Result<Vec<u8>, openssl::error::ErrorStack> {
            let mut decrypter = Decrypter::new(&self.inner)?;
            decrypter.set_rsa_padding(openssl_padding(mode))?;
            if mode == PaddingMode::OAEP {
                decrypter.set_rsa_oaep_md(MessageDigest::sha256())?;
                decrypter.set_rsa_mgf1_md(MessageDigest::sha256())?;
            }
            let mut plaintext = vec![0; decrypter.decrypt_len(ciphertext)?];
            let len = decrypter.decrypt(ciphertext, &mut plaintext)?;
            plaintext.truncate(len);
            Ok(plaintext)
        };
        decrypt().map_err(|e| CryptoError::Decrypt(e.to_string()))
    }
}
