use base64ct::{Base64Unpadded, Encoding};
use rand::{rngs::OsRng, RngCore};

const TOKEN_BYTES: usize = 32;

/// Length of a minted token in characters: 32 bytes of unpadded base64.
pub const TOKEN_LEN: usize = (TOKEN_BYTES * 4 + 2) / 3;

/// Mint an opaque bearer token from OS randomness. Issued once at
/// registration and never rotated; uniqueness is probabilistic, not
/// enforced by a constraint.
pub fn mint_access_token() -> String {
    let mut raw = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut raw);
    Base64Unpadded::encode_string(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_expected_length() {
        assert_eq!(mint_access_token().len(), TOKEN_LEN);
        assert_eq!(TOKEN_LEN, 43);
    }

    #[test]
    fn tokens_are_unpadded_base64() {
        let token = mint_access_token();
        assert!(!token.contains('='));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/'));
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(mint_access_token(), mint_access_token());
    }
}
