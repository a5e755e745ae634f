//! Cryptographic capabilities the handshake needs from its host.
//!
//! The engine never draws randomness or hashes on its own; it goes through a
//! [`CryptoProvider`] so hosts can plug in their own implementation and tests
//! can pin the nonce.

use rand::RngCore;
use sha1::{Digest, Sha1};

/// Length of a SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// Random bytes and SHA-1, supplied by the host.
pub trait CryptoProvider {
    /// Fill `buf` with random bytes suitable for a handshake nonce.
    fn fill_random(&self, buf: &mut [u8]);

    /// SHA-1 of `data`.
    fn sha1_digest(&self, data: &[u8]) -> [u8; SHA1_LEN];
}

/// Default provider: thread-local CSPRNG and the RustCrypto SHA-1.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemCrypto;

impl CryptoProvider for SystemCrypto {
    fn fill_random(&self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }

    fn sha1_digest(&self, data: &[u8]) -> [u8; SHA1_LEN] {
        Sha1::digest(data).into()
    }
}

impl<C: CryptoProvider + ?Sized> CryptoProvider for &C {
    fn fill_random(&self, buf: &mut [u8]) {
        (**self).fill_random(buf)
    }

    fn sha1_digest(&self, data: &[u8]) -> [u8; SHA1_LEN] {
        (**self).sha1_digest(data)
    }
}
