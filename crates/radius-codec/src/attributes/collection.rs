use super::attribute::{decode_entry, encode_entry, Attribute};
use crate::packet::PacketError;
use std::collections::BTreeMap;

/// Decoded attribute list keyed by attribute type
///
/// Each type holds a single value; when a packet repeats a type the last
/// occurrence wins. Types missing from [`AttributeType`](super::AttributeType)
/// are kept as-is. Iteration and encoding run in ascending type order, so
/// re-encoding a collection is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<u8, Vec<u8>>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw attribute list
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        let mut entries = BTreeMap::new();
        let mut offset = 0;

        while offset < data.len() {
            let (attr_type, value) = decode_entry(data, offset)?;
            offset += Attribute::MIN_LENGTH + value.len();
            entries.insert(attr_type, value.to_vec());
        }

        Ok(Attributes { entries })
    }

    /// Encode the collection as a raw attribute list
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let mut buffer = Vec::with_capacity(
            self.entries
                .values()
                .map(|v| Attribute::MIN_LENGTH + v.len())
                .sum(),
        );
        for (attr_type, value) in &self.entries {
            encode_entry(&mut buffer, *attr_type, value)?;
        }
        Ok(buffer)
    }

    /// Set the value for `attr_type`, returning `true` if a previous value was replaced
    pub fn add(&mut self, attr_type: u8, value: impl Into<Vec<u8>>) -> bool {
        self.entries.insert(attr_type, value.into()).is_some()
    }

    pub fn get(&self, attr_type: u8) -> Option<&[u8]> {
        self.entries.get(&attr_type).map(Vec::as_slice)
    }

    pub fn remove(&mut self, attr_type: u8) -> Option<Vec<u8>> {
        self.entries.remove(&attr_type)
    }

    pub fn contains(&self, attr_type: u8) -> bool {
        self.entries.contains_key(&attr_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.entries.iter().map(|(t, v)| (*t, v.as_slice()))
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Attributes {
            entries: iter
                .into_iter()
                .map(|attr| (attr.attr_type, attr.value))
                .collect(),
        }
    }
}
