use tinyvec::ArrayVec;

use crate::buffer::Buf;
use crate::crypto::provider::CryptoProvider;
use crate::types::{HashAlgorithm, ProtocolVersion, Role, MAX_FINISHED_LEN};
use crate::Error;

/// Finished verify_data. Capacity fits the largest version's length.
pub type VerifyData = ArrayVec<[u8; MAX_FINISHED_LEN]>;

/// Finished digest over the transcript hash.
///
/// verify_data = PRF(master_secret, finished_label, Hash(handshake_messages))
/// truncated to the length pinned by `version`.
///
/// Every version goes through the TLS 1.2 P_hash with the suite hash. Only
/// the TLS 1.2 digest is wire-compatible with other implementations. The
/// SSLv3 digest (labels `"CLNT"`/`"SRVR"`, 36 bytes) and the TLS 1.0/1.1
/// digests are not the MD5/SHA-1 constructions of those versions, so they
/// only verify between peers that both use this crate.
pub fn compute_verify_data(
    provider: &CryptoProvider,
    version: ProtocolVersion,
    hash: HashAlgorithm,
    master_secret: &[u8],
    sender: Role,
    transcript_hash: &[u8],
) -> Result<VerifyData, Error> {
    let len = version.finished_len();
    let label = sender.finished_label(version);

    let mut out = Buf::new();
    let mut scratch = Buf::new();
    provider
        .prf_provider
        .prf_tls12(
            master_secret,
            label,
            transcript_hash,
            &mut out,
            len,
            &mut scratch,
            hash,
        )
        .map_err(Error::CryptoError)?;

    if out.len() != len {
        return Err(Error::CryptoError(format!(
            "PRF returned {} bytes, expected {}",
            out.len(),
            len
        )));
    }

    let mut verify_data = VerifyData::default();
    verify_data.extend_from_slice(&out);
    Ok(verify_data)
}

/// Key expansion
/// as specified in RFC 5246 Section 6.3
///
/// key_block = PRF(master_secret, "key expansion", server_random + client_random)
pub fn key_expansion(
    provider: &CryptoProvider,
    master_secret: &[u8],
    client_random: &[u8],
    server_random: &[u8],
    key_material_length: usize,
    hash: HashAlgorithm,
) -> Result<Buf, Error> {
    let mut seed = Buf::new();
    seed.extend_from_slice(server_random);
    seed.extend_from_slice(client_random);

    let mut out = Buf::new();
    let mut scratch = Buf::new();
    provider
        .prf_provider
        .prf_tls12(
            master_secret,
            "key expansion",
            &seed,
            &mut out,
            key_material_length,
            &mut scratch,
            hash,
        )
        .map_err(Error::CryptoError)?;

    Ok(out)
}
