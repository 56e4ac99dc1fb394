//! PFCP Information Elements
//!
//! Type-length-instance-value records carried in the N4 message payload.
//!
//! ```text
//! +--------+--------+--------+--------+----------+---------------+
//! |  Type (2 bytes) | Length (2 bytes)| Instance |  Value ...    |
//! +--------+--------+--------+--------+----------+---------------+
//! ```
//!
//! Only the low nibble of the instance octet is significant.

use bytes::{BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;

use crate::error::PfcpError;
use crate::types::NodeId;

/// IE types used on the N4 server path (TS 29.244 Section 8.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum IeType {
    CreatePdr = 1,
    CreateFar = 3,
    Cause = 19,
    NodeId = 60,
    RecoveryTimeStamp = 96,
}

impl TryFrom<u16> for IeType {
    type Error = PfcpError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::CreatePdr),
            3 => Ok(Self::CreateFar),
            19 => Ok(Self::Cause),
            60 => Ok(Self::NodeId),
            96 => Ok(Self::RecoveryTimeStamp),
            _ => Err(PfcpError::InvalidIeType(value)),
        }
    }
}

impl IeType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePdr => "Create PDR",
            Self::CreateFar => "Create FAR",
            Self::Cause => "Cause",
            Self::NodeId => "Node ID",
            Self::RecoveryTimeStamp => "Recovery Time Stamp",
        }
    }
}

/// A single decoded IE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationElement {
    pub ie_type: u16,
    /// Instance (4 bits)
    pub instance: u8,
    pub value: Bytes,
}

impl InformationElement {
    /// IE header length: type + length + instance
    pub const HEADER_LEN: usize = 5;

    pub fn new(ie_type: u16, instance: u8, value: Bytes) -> Self {
        Self {
            ie_type,
            instance: instance & 0x0F,
            value,
        }
    }

    /// Value length as carried in the length field
    pub fn length(&self) -> u16 {
        self.value.len() as u16
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + self.value.len()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_u16(self.ie_type);
        buf.put_u16(self.length());
        buf.put_u8(self.instance & 0x0F);
        buf.put_slice(&self.value);
    }

    /// First value byte, for one-octet IEs such as Cause
    pub fn as_u8(&self) -> Option<u8> {
        self.value.first().copied()
    }

    /// First four value bytes as a big-endian integer
    pub fn as_u32(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.value.get(..4)?.try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }
}

/// Encode one IE
pub fn encode(ie_type: u16, value: &[u8], instance: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(InformationElement::HEADER_LEN + value.len());
    buf.put_u16(ie_type);
    buf.put_u16(value.len() as u16);
    buf.put_u8(instance & 0x0F);
    buf.put_slice(value);
    buf.freeze()
}

/// Lazily decode every complete IE in `payload`
///
/// Iteration ends at the first fragment that is too short to hold an IE
/// header or the value it announces; that fragment is dropped.
pub fn decode_all(payload: &[u8]) -> IeIter<'_> {
    IeIter { rest: payload }
}

/// Iterator over the IEs of a payload
#[derive(Debug, Clone)]
pub struct IeIter<'a> {
    rest: &'a [u8],
}

impl<'a> IeIter<'a> {
    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for IeIter<'_> {
    type Item = InformationElement;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.rest;
        if data.len() < InformationElement::HEADER_LEN {
            self.rest = &[];
            return None;
        }

        let ie_type = u16::from_be_bytes([data[0], data[1]]);
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        let instance = data[4] & 0x0F;

        let end = InformationElement::HEADER_LEN + length;
        if data.len() < end {
            self.rest = &[];
            return None;
        }

        let value = Bytes::copy_from_slice(&data[InformationElement::HEADER_LEN..end]);
        self.rest = &data[end..];
        Some(InformationElement { ie_type, instance, value })
    }
}

impl std::iter::FusedIterator for IeIter<'_> {}

/// Find the first IE of a given type
pub fn find_ie(payload: &[u8], ie_type: IeType) -> Option<InformationElement> {
    decode_all(payload).find(|ie| ie.ie_type == ie_type as u16)
}

// ============================================================================
// Fixed IE builders
// ============================================================================

/// Node ID IE for an IPv4 address
pub fn node_id_ipv4(addr: Ipv4Addr) -> Bytes {
    node_id(&NodeId::Ipv4(addr))
}

/// Node ID IE for any Node ID form
pub fn node_id(node_id: &NodeId) -> Bytes {
    let mut value = BytesMut::new();
    node_id.encode(&mut value);
    encode(IeType::NodeId as u16, &value, 0)
}

/// Recovery Time Stamp IE from a 32-bit NTP timestamp
pub fn recovery_time_stamp(ntp32: u32) -> Bytes {
    encode(IeType::RecoveryTimeStamp as u16, &ntp32.to_be_bytes(), 0)
}

/// Cause IE
pub fn cause(value: u8) -> Bytes {
    encode(IeType::Cause as u16, &[value], 0)
}
