use super::Code;
use crate::attributes::Attributes;
use crate::auth::calculate_response_authenticator;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("Datagram too short: {received} bytes (minimum {min})")]
    TooShort { received: usize, min: usize },
    #[error("Declared length {declared} does not match {actual} available bytes")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("Invalid packet code: {0}")]
    InvalidCode(u8),
    #[error("Malformed attribute (type {attr_type}) at offset {offset}")]
    MalformedAttribute { attr_type: u8, offset: usize },
    #[error("Attribute {attr_type} value too long: {len} bytes (max 253)")]
    AttributeTooLong { attr_type: u8, len: usize },
    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),
}

/// RADIUS Packet structure as defined in RFC 2865 Section 3
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Code      |  Identifier   |            Length             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                         Authenticator                         |
/// |                                                               |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attributes ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-
/// ```
///
/// The attribute list is held as the raw encoded blob; use
/// [`Packet::decoded_attributes`] to get a structured view.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Packet type (1 byte)
    pub code: Code,
    /// Packet identifier for matching requests/responses (1 byte)
    pub identifier: u8,
    /// Total packet length including the header (2 bytes)
    ///
    /// Must equal `20 + attributes.len()` before encoding, see [`Packet::update_length`].
    pub length: u16,
    /// Request or Response Authenticator (16 bytes)
    pub authenticator: [u8; 16],
    /// Encoded attribute list
    pub attributes: Vec<u8>,
}

impl Packet {
    /// Header size (20 bytes: 1 code + 1 id + 2 length + 16 authenticator)
    pub const HEADER_SIZE: usize = 20;
    /// Maximum RADIUS packet size (4096 bytes as per RFC 2865)
    pub const MAX_PACKET_SIZE: usize = 4096;

    /// Build a packet around an already encoded attribute blob.
    pub fn new(code: Code, identifier: u8, authenticator: [u8; 16], attributes: Vec<u8>) -> Self {
        let mut packet = Packet {
            code,
            identifier,
            length: 0,
            authenticator,
            attributes,
        };
        packet.update_length();
        packet
    }

    /// Build a packet from a structured attribute collection.
    pub fn with_attributes(
        code: Code,
        identifier: u8,
        authenticator: [u8; 16],
        attributes: &Attributes,
    ) -> Result<Self, PacketError> {
        Ok(Self::new(code, identifier, authenticator, attributes.encode()?))
    }

    /// Recompute `length` from the attribute blob.
    ///
    /// Saturates at `u16::MAX`; [`Packet::encode`] rejects anything above
    /// [`Packet::MAX_PACKET_SIZE`] regardless.
    pub fn update_length(&mut self) {
        let total = Self::HEADER_SIZE + self.attributes.len();
        self.length = u16::try_from(total).unwrap_or(u16::MAX);
    }

    /// Encode packet to bytes
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let total_length = Self::HEADER_SIZE + self.attributes.len();
        if total_length > Self::MAX_PACKET_SIZE {
            return Err(PacketError::PacketTooLarge(total_length));
        }
        if usize::from(self.length) != total_length {
            return Err(PacketError::LengthMismatch {
                declared: usize::from(self.length),
                actual: total_length,
            });
        }

        let mut buffer = Vec::with_capacity(total_length);
        buffer.push(self.code.as_u8());
        buffer.push(self.identifier);
        buffer.extend_from_slice(&self.length.to_be_bytes());
        buffer.extend_from_slice(&self.authenticator);
        buffer.extend_from_slice(&self.attributes);

        Ok(buffer)
    }

    /// Decode the first `received_len` bytes of `buffer`
    ///
    /// Octets past the declared length are treated as padding and ignored
    /// (RFC 2865 Section 3). A declared length larger than what was received is
    /// a framing error.
    pub fn decode(buffer: &[u8], received_len: usize) -> Result<Self, PacketError> {
        if received_len < Self::HEADER_SIZE || buffer.len() < received_len {
            return Err(PacketError::TooShort {
                received: received_len.min(buffer.len()),
                min: Self::HEADER_SIZE,
            });
        }
        let data = &buffer[..received_len];

        let code = Code::from_u8(data[0]).ok_or(PacketError::InvalidCode(data[0]))?;
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]);

        let declared = usize::from(length);
        if declared < Self::HEADER_SIZE || declared > Self::MAX_PACKET_SIZE || declared > received_len
        {
            return Err(PacketError::LengthMismatch {
                declared,
                actual: received_len,
            });
        }

        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&data[4..Self::HEADER_SIZE]);

        Ok(Packet {
            code,
            identifier,
            length,
            authenticator,
            attributes: data[Self::HEADER_SIZE..declared].to_vec(),
        })
    }

    /// Decode the attribute blob into a type-keyed collection
    pub fn decoded_attributes(&self) -> Result<Attributes, PacketError> {
        Attributes::decode(&self.attributes)
    }

    /// Build a bare reply to `request` with the given response code
    ///
    /// The reply carries no attributes; its Response Authenticator is
    /// computed over the reply header, the request's authenticator and `secret`.
    pub fn reply(request: &Packet, code: Code, secret: &[u8]) -> Packet {
        let mut response = Packet::new(code, request.identifier, [0u8; 16], Vec::new());
        response.authenticator = calculate_response_authenticator(
            response.code,
            response.identifier,
            response.length,
            &request.authenticator,
            &response.attributes,
            secret,
        );
        response
    }

    pub fn access_accept(request: &Packet, secret: &[u8]) -> Packet {
        Self::reply(request, Code::AccessAccept, secret)
    }

    pub fn access_reject(request: &Packet, secret: &[u8]) -> Packet {
        Self::reply(request, Code::AccessReject, secret)
    }
}

impl PartialEq for Packet {
    /// Structural equality: header fields must match exactly and the attribute
    /// lists must decode to the same collection. Blobs that fail to decode are
    /// compared byte for byte.
    fn eq(&self, other: &Self) -> bool {
        if self.code != other.code
            || self.identifier != other.identifier
            || self.length != other.length
            || self.authenticator != other.authenticator
        {
            return false;
        }

        match (self.decoded_attributes(), other.decoded_attributes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.attributes == other.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeType;
    use proptest::prelude::*;

    const RA1: [u8; 16] = [
        0x0b, 0x6c, 0x7d, 0x52, 0x4c, 0x44, 0x4e, 0x11, 0xd3, 0x39, 0x20, 0xc3, 0x6a, 0x06, 0xf1,
        0x7d,
    ];
    const RA2: [u8; 16] = [
        0x50, 0x20, 0x8c, 0x8d, 0x1f, 0x70, 0x15, 0xbf, 0xc1, 0x18, 0x42, 0x6a, 0x6c, 0xe6, 0x92,
        0xec,
    ];
    const IDENTIFIER: u8 = 172;

    const ATTRS: [u8; 57] = [
        0x01, 0x09, 0x65, 0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65, 0x02, 0x12, 0x7e, 0x67, 0x02, 0x04,
        0xef, 0xa0, 0x7b, 0x48, 0x1d, 0xf2, 0xc2, 0x4b, 0xf7, 0x25, 0xf1, 0x07, 0x04, 0x06, 0x7f,
        0x00, 0x00, 0x01, 0x05, 0x06, 0x00, 0x00, 0x07, 0xcf, 0x50, 0x12, 0x33, 0x10, 0x58, 0x08,
        0x06, 0xbb, 0x91, 0x1f, 0x43, 0xbe, 0x5c, 0x88, 0xd0, 0xa2, 0x59, 0x17,
    ];

    fn captured_request() -> Vec<u8> {
        let mut bytes = vec![0x01, IDENTIFIER, 0x00, 0x4d];
        bytes.extend_from_slice(&RA2);
        bytes.extend_from_slice(&ATTRS);
        bytes
    }

    #[test]
    fn test_decode_captured_access_request() {
        let bytes = captured_request();
        let packet = Packet::decode(&bytes, bytes.len()).unwrap();

        assert_eq!(packet.code, Code::AccessRequest);
        assert_eq!(packet.identifier, IDENTIFIER);
        assert_eq!(packet.length, 0x4d);
        assert_eq!(packet.authenticator, RA2);

        let attrs = packet.decoded_attributes().unwrap();
        assert_eq!(attrs.len(), 5);
        assert_eq!(attrs.get(AttributeType::UserName as u8), Some(&b"example"[..]));
        assert_eq!(
            attrs.get(AttributeType::UserPassword as u8),
            Some(&ATTRS[11..27])
        );
        assert_eq!(
            attrs.get(AttributeType::NasIpAddress as u8),
            Some(&[0x7f, 0x00, 0x00, 0x01][..])
        );
        assert_eq!(
            attrs.get(AttributeType::NasPort as u8),
            Some(&[0x00, 0x00, 0x07, 0xcf][..])
        );
        assert_eq!(
            attrs.get(AttributeType::MessageAuthenticator as u8),
            Some(&ATTRS[41..57])
        );
    }

    #[test]
    fn test_decode_matches_constructed_packet() {
        let bytes = captured_request();
        let decoded = Packet::decode(&bytes, bytes.len()).unwrap();
        let built = Packet::new(Code::AccessRequest, IDENTIFIER, RA2, ATTRS.to_vec());
        assert_eq!(decoded, built);
    }

    #[test]
    fn test_packet_encode_decode() {
        let packet = Packet::new(Code::AccessRequest, 42, [1u8; 16], ATTRS.to_vec());
        let encoded = packet.encode().unwrap();
        assert_eq!(encoded.len(), usize::from(packet.length));

        let decoded = Packet::decode(&encoded, encoded.len()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_encode_field_order() {
        let packet = Packet::new(Code::AccessAccept, 7, RA1, vec![0x12, 0x04, b'h', b'i']);
        let encoded = packet.encode().unwrap();
        assert_eq!(&encoded[..4], &[0x02, 0x07, 0x00, 0x18]);
        assert_eq!(&encoded[4..20], &RA1);
        assert_eq!(&encoded[20..], &[0x12, 0x04, b'h', b'i']);
    }

    #[test]
    fn test_packet_min_size() {
        let data = vec![0u8; 10];
        assert!(matches!(
            Packet::decode(&data, data.len()),
            Err(PacketError::TooShort { received: 10, .. })
        ));
    }

    #[test]
    fn test_received_len_beyond_buffer() {
        let data = vec![0x01u8; 20];
        assert!(matches!(
            Packet::decode(&data, 64),
            Err(PacketError::TooShort { .. })
        ));
    }

    #[test]
    fn test_declared_length_exceeds_received() {
        let mut bytes = captured_request();
        bytes[3] = 0x60;
        assert!(matches!(
            Packet::decode(&bytes, bytes.len()),
            Err(PacketError::LengthMismatch { declared: 0x60, actual: 77 })
        ));
    }

    #[test]
    fn test_declared_length_below_header() {
        let mut bytes = captured_request();
        bytes[3] = 0x10;
        assert!(matches!(
            Packet::decode(&bytes, bytes.len()),
            Err(PacketError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let mut bytes = captured_request();
        bytes.extend_from_slice(&[0u8; 9]);
        let packet = Packet::decode(&bytes, bytes.len()).unwrap();
        assert_eq!(packet.attributes, ATTRS.to_vec());
        assert_eq!(packet.length, 0x4d);
    }

    #[test]
    fn test_decode_uses_received_len_not_buffer_len() {
        let mut buffer = vec![0u8; 1024];
        let bytes = captured_request();
        buffer[..bytes.len()].copy_from_slice(&bytes);
        let packet = Packet::decode(&buffer, bytes.len()).unwrap();
        assert_eq!(packet.attributes.len(), ATTRS.len());
    }

    #[test]
    fn test_invalid_code() {
        let mut bytes = captured_request();
        bytes[0] = 0;
        assert_eq!(
            Packet::decode(&bytes, bytes.len()).unwrap_err(),
            PacketError::InvalidCode(0)
        );
    }

    #[test]
    fn test_encode_requires_updated_length() {
        let mut packet = Packet::new(Code::AccessRequest, 1, RA1, Vec::new());
        packet.attributes.extend_from_slice(&[0x01, 0x03, b'a']);
        assert!(matches!(
            packet.encode(),
            Err(PacketError::LengthMismatch { declared: 20, actual: 23 })
        ));

        packet.update_length();
        assert_eq!(packet.length, 23);
        assert_eq!(packet.encode().unwrap().len(), 23);
    }

    #[test]
    fn test_encode_too_large() {
        let packet = Packet::new(Code::AccessRequest, 1, RA1, vec![0u8; 4096]);
        assert!(matches!(
            packet.encode(),
            Err(PacketError::PacketTooLarge(4116))
        ));
    }

    #[test]
    fn test_packet_equality() {
        let base = Packet::new(Code::AccessRequest, IDENTIFIER, RA1, ATTRS.to_vec());

        assert_eq!(base, base.clone());

        let mut other = base.clone();
        other.code = Code::AccessReject;
        assert_ne!(base, other);

        let mut other = base.clone();
        other.identifier += 1;
        assert_ne!(base, other);

        let mut extra = ATTRS.to_vec();
        extra.extend_from_slice(&[0x12, 0x02]);
        assert_ne!(base, Packet::new(Code::AccessRequest, IDENTIFIER, RA1, extra));

        assert_ne!(base, Packet::new(Code::AccessRequest, IDENTIFIER, RA2, ATTRS.to_vec()));
        assert_ne!(base, Packet::new(Code::AccessRequest, IDENTIFIER, RA2, Vec::new()));
    }

    #[test]
    fn test_equality_ignores_attribute_order() {
        let a = Packet::new(
            Code::AccessRequest,
            1,
            RA1,
            vec![0x01, 0x03, b'a', 0x04, 0x06, 10, 0, 0, 1],
        );
        let b = Packet::new(
            Code::AccessRequest,
            1,
            RA1,
            vec![0x04, 0x06, 10, 0, 0, 1, 0x01, 0x03, b'a'],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_attributes() {
        let mut attrs = Attributes::new();
        attrs.add(AttributeType::UserName as u8, b"example".to_vec());
        let packet = Packet::with_attributes(Code::AccessRequest, 3, RA1, &attrs).unwrap();
        assert_eq!(packet.length, 29);
        assert_eq!(packet.decoded_attributes().unwrap(), attrs);
    }

    #[test]
    fn test_reply_is_bare_and_authenticated() {
        let bytes = captured_request();
        let request = Packet::decode(&bytes, bytes.len()).unwrap();

        let accept = Packet::access_accept(&request, b"my_secret");
        assert_eq!(accept.code, Code::AccessAccept);
        assert_eq!(accept.identifier, IDENTIFIER);
        assert_eq!(accept.length, 20);
        assert!(accept.attributes.is_empty());
        assert_eq!(
            accept.authenticator,
            [
                0xe8, 0xce, 0x4e, 0x1c, 0x10, 0x64, 0x0c, 0xf8, 0x5c, 0x88, 0x8b, 0xa6, 0xa8, 0xdb,
                0xa5, 0xed
            ]
        );

        let reject = Packet::access_reject(&request, b"my_secret");
        assert_eq!(reject.code, Code::AccessReject);
        assert_eq!(
            reject.authenticator,
            [
                0x45, 0xbb, 0x49, 0x2b, 0x93, 0xda, 0x21, 0xf7, 0x6a, 0xa1, 0xa3, 0xdb, 0xc4, 0x45,
                0x10, 0x84
            ]
        );
        assert_eq!(reject.encode().unwrap().len(), 20);
    }

    fn arb_code() -> impl Strategy<Value = Code> {
        let codes: Vec<Code> = (0..=u8::MAX).filter_map(Code::from_u8).collect();
        prop::sample::select(codes)
    }

    fn arb_attributes() -> impl Strategy<Value = Attributes> {
        prop::collection::btree_map(any::<u8>(), prop::collection::vec(any::<u8>(), 0..=40), 0..8)
            .prop_map(|entries| {
                let mut attrs = Attributes::new();
                for (attr_type, value) in entries {
                    attrs.add(attr_type, value);
                }
                attrs
            })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            code in arb_code(),
            identifier in any::<u8>(),
            authenticator in any::<[u8; 16]>(),
            attrs in arb_attributes(),
        ) {
            let packet = Packet::with_attributes(code, identifier, authenticator, &attrs).unwrap();
            let encoded = packet.encode().unwrap();
            let decoded = Packet::decode(&encoded, encoded.len()).unwrap();
            prop_assert_eq!(decoded, packet);
        }
    }
}
