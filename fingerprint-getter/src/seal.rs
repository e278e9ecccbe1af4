// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Block-wise RSA sealing of encoded reports.
//!
//! A report can be longer than one RSA block. The plaintext is cut into
//! chunks of at most `max_plaintext_len` bytes and every chunk is encrypted
//! on its own, so the sealed blob is a concatenation of modulus-sized blocks.

use anyhow::{bail, Context, Result};
use crypto::rsa::{PaddingMode, PrivateKey, PublicKey};

pub fn seal(key: &PublicKey, padding: PaddingMode, plaintext: &[u8]) -> Result<Vec<u8>> {
    let chunk_len = key.max_plaintext_len(padding);
    if chunk_len == 0 {
        bail!("RSA key of {} bytes is too small for {padding}", key.size());
    }

    let mut sealed = Vec::with_capacity(plaintext.len().div_ceil(chunk_len) * key.size());
    for chunk in plaintext.chunks(chunk_len) {
        sealed.extend(key.encrypt(padding, chunk).context("seal report chunk")?);
    }
    Ok(sealed)
}

pub fn unseal(key: &PrivateKey, padding: PaddingMode, sealed: &[u8]) -> Result<Vec<u8>> {
    let block_len = key.public_key()?.size();
    if sealed.len() % block_len != 0 {
        bail!(
            "sealed report of {} bytes is not a multiple of the {block_len} byte RSA block",
            sealed.len()
        );
    }

    let mut plaintext = Vec::new();
    for block in sealed.chunks(block_len) {
        plaintext.extend(key.decrypt(padding, block).context("unseal report block")?);
    }
    Ok(plaintext)
}
