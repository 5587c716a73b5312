//! User-Password hiding per RFC 2865 Section 5.2
//!
//! The password is padded with NULs to a multiple of 16 bytes and split into
//! blocks `p1..pn`. Each block is XORed with an MD5 keystream block:
//!
//! ```text
//! b1 = MD5(S + RA)       c(1) = p1 xor b1
//! b2 = MD5(S + c(1))     c(2) = p2 xor b2
//!        ...                    ...
//! bi = MD5(S + c(i-1))   c(i) = pi xor bi
//! ```
//!
//! The hidden form carries no length, so trailing NULs are stripped on the way
//! back. A password that really ends in NUL cannot survive the trip; that is a
//! property of the wire format.

use thiserror::Error;

const BLOCK_SIZE: usize = 16;

/// Longest User-Password value the protocol allows (RFC 2865 Section 5.2)
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Hidden password length {0} is not a positive multiple of 16")]
    InvalidLength(usize),
    #[error("Password too long: {0} bytes (max 128)")]
    TooLong(usize),
}

/// Hide a plaintext password for the User-Password attribute
pub fn encrypt_user_password(
    password: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PasswordError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong(password.len()));
    }

    // Pad to a multiple of 16 bytes; an empty password still occupies one block
    let padded_len = password.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
    let mut padded = password.to_vec();
    padded.resize(padded_len, 0);

    let mut result = Vec::with_capacity(padded_len);
    let mut previous_block = *authenticator;

    for chunk in padded.chunks(BLOCK_SIZE) {
        let hash = keystream_block(secret, &previous_block);
        for (i, (p, b)) in chunk.iter().zip(hash.iter()).enumerate() {
            previous_block[i] = p ^ b;
        }
        result.extend_from_slice(&previous_block);
    }

    Ok(result)
}

/// Recover the plaintext from a User-Password attribute value
pub fn decrypt_user_password(
    encrypted: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PasswordError> {
    if encrypted.is_empty() || encrypted.len() % BLOCK_SIZE != 0 {
        return Err(PasswordError::InvalidLength(encrypted.len()));
    }
    if encrypted.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong(encrypted.len()));
    }

    let mut result = Vec::with_capacity(encrypted.len());
    let mut previous_block: &[u8] = authenticator;

    for chunk in encrypted.chunks(BLOCK_SIZE) {
        let hash = keystream_block(secret, previous_block);
        result.extend(chunk.iter().zip(hash.iter()).map(|(c, b)| c ^ b));
        previous_block = chunk;
    }

    // Remove padding (null bytes at the end)
    while result.last() == Some(&0) {
        result.pop();
    }

    Ok(result)
}

fn keystream_block(secret: &[u8], previous_block: &[u8]) -> [u8; 16] {
    let mut context = md5::Context::new();
    context.consume(secret);
    context.consume(previous_block);
    context.compute().0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret";
    const REQUEST_AUTH: [u8; 16] = [
        0x0b, 0x6c, 0x7d, 0x52, 0x4c, 0x44, 0x4e, 0x11, 0xd3, 0x39, 0x20, 0xc3, 0x6a, 0x06, 0xf1,
        0x7d,
    ];

    #[test]
    fn test_reveal_single_block() {
        let hidden = [
            0xdb, 0xa1, 0xdd, 0x74, 0x79, 0x53, 0x23, 0x4a, 0xf0, 0xb9, 0xcd, 0x58, 0x54, 0x8f,
            0xfe, 0x72,
        ];
        let plain = decrypt_user_password(&hidden, SECRET, &REQUEST_AUTH).unwrap();
        assert_eq!(plain, b"loudyard");
    }

    #[test]
    fn test_reveal_chained_blocks() {
        let hidden = [
            0xdb, 0xa1, 0xdd, 0x74, 0x5f, 0x6d, 0x28, 0x4f, 0x82, 0xdd, 0x92, 0x07, 0x32, 0xe6,
            0x90, 0x16, 0x79, 0x78, 0xbe, 0x9f, 0xc3, 0x99, 0xed, 0x2e, 0x2a, 0x1c, 0x5e, 0x4c,
            0xfa, 0xd7, 0x2c, 0x0e,
        ];
        let plain = decrypt_user_password(&hidden, SECRET, &REQUEST_AUTH).unwrap();
        assert_eq!(plain, b"loud__yard__find__settle");
    }

    #[test]
    fn test_hide_matches_known_vector() {
        let hidden = encrypt_user_password(b"loudyard", SECRET, &REQUEST_AUTH).unwrap();
        assert_eq!(
            hidden,
            vec![
                0xdb, 0xa1, 0xdd, 0x74, 0x79, 0x53, 0x23, 0x4a, 0xf0, 0xb9, 0xcd, 0x58, 0x54,
                0x8f, 0xfe, 0x72
            ]
        );
    }

    #[test]
    fn test_round_trip_block_boundaries() {
        for len in [1usize, 15, 16, 17, 32, 33, 128] {
            let password: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
            let hidden = encrypt_user_password(&password, SECRET, &REQUEST_AUTH).unwrap();
            assert_eq!(hidden.len(), len.div_ceil(16) * 16, "length {}", len);

            let revealed = decrypt_user_password(&hidden, SECRET, &REQUEST_AUTH).unwrap();
            assert_eq!(revealed, password, "length {}", len);

            let rehidden = encrypt_user_password(&revealed, SECRET, &REQUEST_AUTH).unwrap();
            assert_eq!(rehidden, hidden, "length {}", len);
        }
    }

    #[test]
    fn test_blocks_chain_on_ciphertext() {
        // Same plaintext in both blocks must not produce the same ciphertext
        let hidden = encrypt_user_password(&[b'x'; 32], SECRET, &REQUEST_AUTH).unwrap();
        assert_ne!(hidden[..16], hidden[16..]);
    }

    #[test]
    fn test_empty_password_is_one_block() {
        let hidden = encrypt_user_password(b"", SECRET, &REQUEST_AUTH).unwrap();
        assert_eq!(hidden.len(), 16);
        assert!(decrypt_user_password(&hidden, SECRET, &REQUEST_AUTH)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_trailing_nul_is_lost() {
        let hidden = encrypt_user_password(b"abc\0", SECRET, &REQUEST_AUTH).unwrap();
        assert_eq!(
            decrypt_user_password(&hidden, SECRET, &REQUEST_AUTH).unwrap(),
            b"abc"
        );
    }

    #[test]
    fn test_wrong_secret_does_not_reveal() {
        let hidden = encrypt_user_password(b"loudyard", SECRET, &REQUEST_AUTH).unwrap();
        let revealed = decrypt_user_password(&hidden, b"not_the_secret", &REQUEST_AUTH).unwrap();
        assert_ne!(revealed, b"loudyard");
    }

    #[test]
    fn test_reveal_rejects_unaligned_input() {
        assert_eq!(
            decrypt_user_password(&[0u8; 15], SECRET, &REQUEST_AUTH),
            Err(PasswordError::InvalidLength(15))
        );
        assert_eq!(
            decrypt_user_password(&[0u8; 17], SECRET, &REQUEST_AUTH),
            Err(PasswordError::InvalidLength(17))
        );
        assert_eq!(
            decrypt_user_password(&[], SECRET, &REQUEST_AUTH),
            Err(PasswordError::InvalidLength(0))
        );
    }

    #[test]
    fn test_length_limit() {
        assert_eq!(
            encrypt_user_password(&[b'a'; 129], SECRET, &REQUEST_AUTH),
            Err(PasswordError::TooLong(129))
        );
        assert_eq!(
            decrypt_user_password(&[0u8; 144], SECRET, &REQUEST_AUTH),
            Err(PasswordError::TooLong(144))
        );
    }
}
