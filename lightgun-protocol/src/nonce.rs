use rand::RngCore;

/// Source of the 16-byte random identifier the connect sequence hashes
/// into a nonce. Injected so tests can script the exact bytes the
/// golden-trace scenario checks against.
pub trait NonceSource: Send + Sync {
    fn generate_identifier(&self) -> [u8; 16];
}

/// Production source: a fresh random identifier per connect attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNonceSource;

impl NonceSource for SystemNonceSource {
    fn generate_identifier(&self) -> [u8; 16] {
        let mut id = [0u8; 16];
        rand::rng().fill_bytes(&mut id);
        id
    }
}

/// Test source: always returns the same identifier.
#[derive(Debug, Clone, Copy)]
pub struct FixedNonceSource(pub [u8; 16]);

impl NonceSource for FixedNonceSource {
    fn generate_identifier(&self) -> [u8; 16] {
        self.0
    }
}
