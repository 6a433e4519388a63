//! HMAC utilities using RustCrypto.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384};

use crate::buffer::Buf;
use crate::types::HashAlgorithm;

/// Compute the TLS P_hash expansion of `full_seed` into `out`.
pub(super) fn p_hash(
    hash_alg: HashAlgorithm,
    secret: &[u8],
    full_seed: &[u8],
    out: &mut Buf,
    output_len: usize,
) -> Result<(), String> {
    out.clear();

    match hash_alg {
        HashAlgorithm::SHA256 => p_hash_with::<Hmac<Sha256>>(secret, full_seed, out, output_len),
        HashAlgorithm::SHA384 => p_hash_with::<Hmac<Sha384>>(secret, full_seed, out, output_len),
    }
}

fn p_hash_with<M: Mac + KeyInit>(
    secret: &[u8],
    full_seed: &[u8],
    out: &mut Buf,
    output_len: usize,
) -> Result<(), String> {
    let new_mac =
        || <M as KeyInit>::new_from_slice(secret).map_err(|_| "Invalid HMAC key length".to_string());

    // A(1) = HMAC_hash(secret, A(0)) where A(0) = seed
    let mut a_hmac = new_mac()?;
    a_hmac.update(full_seed);
    let mut a = a_hmac.finalize().into_bytes();

    while out.len() < output_len {
        // HMAC_hash(secret, A(i) + seed)
        let mut ctx = new_mac()?;
        ctx.update(&a);
        ctx.update(full_seed);
        let output = ctx.finalize().into_bytes();

        let remaining = output_len - out.len();
        let to_copy = std::cmp::min(remaining, output.len());
        out.extend_from_slice(&output[..to_copy]);

        if out.len() < output_len {
            // A(i+1) = HMAC_hash(secret, A(i))
            let mut next_a = new_mac()?;
            next_a.update(&a);
            a = next_a.finalize().into_bytes();
        }
    }

    Ok(())
}
