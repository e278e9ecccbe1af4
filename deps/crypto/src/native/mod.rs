// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! This mod implements the RSA helper on top of OpenSSL.

pub mod rsa;
