use crate::packet::PacketError;

/// RADIUS Attribute structure as defined in RFC 2865 Section 5
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type (1 byte)
    pub attr_type: u8,
    /// Attribute value (0-253 bytes)
    pub value: Vec<u8>,
}

impl Attribute {
    /// Minimum attribute length (type + length fields = 2 bytes)
    pub const MIN_LENGTH: usize = 2;
    /// Maximum attribute length (255 bytes including type and length)
    pub const MAX_LENGTH: usize = 255;
    /// Maximum value length (253 bytes)
    pub const MAX_VALUE_LENGTH: usize = 253;

    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, PacketError> {
        if value.len() > Self::MAX_VALUE_LENGTH {
            return Err(PacketError::AttributeTooLong {
                attr_type,
                len: value.len(),
            });
        }
        Ok(Attribute { attr_type, value })
    }

    /// Create a string attribute
    pub fn string(attr_type: u8, value: impl Into<String>) -> Result<Self, PacketError> {
        Self::new(attr_type, value.into().into_bytes())
    }

    /// Encode attribute to bytes
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let mut buffer = Vec::with_capacity(self.encoded_length());
        encode_entry(&mut buffer, self.attr_type, &self.value)?;
        Ok(buffer)
    }

    /// Decode the attribute at the start of `data`
    ///
    /// Bytes after the first entry are left untouched; use
    /// [`Attribute::encoded_length`] to step to the next one.
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        let (attr_type, value) = decode_entry(data, 0)?;
        Ok(Attribute {
            attr_type,
            value: value.to_vec(),
        })
    }

    /// Get the encoded length of this attribute
    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH + self.value.len()
    }

    /// Try to interpret value as a string
    pub fn as_string(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.value.clone())
    }
}

/// Encode attributes back to back, in the order given
pub fn encode_attributes(attributes: &[Attribute]) -> Result<Vec<u8>, PacketError> {
    let mut buffer = Vec::with_capacity(attributes.iter().map(Attribute::encoded_length).sum());
    for attr in attributes {
        encode_entry(&mut buffer, attr.attr_type, &attr.value)?;
    }
    Ok(buffer)
}

pub(crate) fn encode_entry(
    buffer: &mut Vec<u8>,
    attr_type: u8,
    value: &[u8],
) -> Result<(), PacketError> {
    if value.len() > Attribute::MAX_VALUE_LENGTH {
        return Err(PacketError::AttributeTooLong {
            attr_type,
            len: value.len(),
        });
    }
    buffer.push(attr_type);
    buffer.push((Attribute::MIN_LENGTH + value.len()) as u8);
    buffer.extend_from_slice(value);
    Ok(())
}

/// Split the entry starting at `offset` into its type and value slice.
pub(crate) fn decode_entry(data: &[u8], offset: usize) -> Result<(u8, &[u8]), PacketError> {
    let remaining = data.get(offset..).unwrap_or_default();
    let malformed = |attr_type| PacketError::MalformedAttribute { attr_type, offset };

    let (attr_type, length) = match remaining {
        [attr_type, length, ..] => (*attr_type, usize::from(*length)),
        [attr_type] => return Err(malformed(*attr_type)),
        [] => return Err(malformed(0)),
    };

    if length < Attribute::MIN_LENGTH || length > remaining.len() {
        return Err(malformed(attr_type));
    }

    Ok((attr_type, &remaining[Attribute::MIN_LENGTH..length]))
}
