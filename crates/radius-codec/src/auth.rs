use crate::packet::{Code, Packet};
use rand::Rng;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// Calculate Response Authenticator per RFC 2865 Section 3
///
/// Response Authenticator = MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)
///
/// `length` is the reply's own length field and `attributes` its encoded
/// attribute list (empty for a bare Access-Accept or Access-Reject).
pub fn calculate_response_authenticator(
    code: Code,
    identifier: u8,
    length: u16,
    request_authenticator: &[u8; 16],
    attributes: &[u8],
    secret: &[u8],
) -> [u8; 16] {
    let mut context = md5::Context::new();
    context.consume([code.as_u8(), identifier]);
    context.consume(length.to_be_bytes());
    context.consume(request_authenticator);
    context.consume(attributes);
    context.consume(secret);
    context.compute().0
}

/// Verify the Response Authenticator of a reply against the request it answers
pub fn verify_response_authenticator(
    response: &Packet,
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    let calculated = calculate_response_authenticator(
        response.code,
        response.identifier,
        response.length,
        request_authenticator,
        &response.attributes,
        secret,
    );
    response.authenticator == calculated
}
