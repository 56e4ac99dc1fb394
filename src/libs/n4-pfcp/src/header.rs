//! PFCP Header
//!
//! N4 message header encoding and decoding (TS 29.244 Section 7.2.2).

use bytes::{BufMut, BytesMut};
use crate::error::{PfcpError, PfcpResult};
use crate::types::PFCP_VERSION;

/// PFCP Header length without SEID (8 bytes)
pub const PFCP_HEADER_LEN: usize = 8;

/// PFCP Header length with SEID (16 bytes)
pub const PFCP_HEADER_LEN_WITH_SEID: usize = 16;

/// Bytes ahead of the length field that it does not count
pub const PFCP_LENGTH_OFFSET: usize = 4;

/// Largest value carried by the 24-bit sequence number
pub const PFCP_MAX_SEQUENCE: u32 = 0x00FF_FFFF;

const SEID_FLAG: u8 = 0x04;

/// PFCP Message Types handled by the N4 server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PfcpMessageType {
    // Node related messages (no SEID)
    HeartbeatRequest = 1,
    HeartbeatResponse = 2,
    AssociationSetupRequest = 5,
    AssociationSetupResponse = 6,

    // Session related messages (with SEID)
    SessionEstablishmentRequest = 50,
    SessionEstablishmentResponse = 51,
}

impl TryFrom<u8> for PfcpMessageType {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::HeartbeatRequest),
            2 => Ok(Self::HeartbeatResponse),
            5 => Ok(Self::AssociationSetupRequest),
            6 => Ok(Self::AssociationSetupResponse),
            50 => Ok(Self::SessionEstablishmentRequest),
            51 => Ok(Self::SessionEstablishmentResponse),
            _ => Err(PfcpError::InvalidMessageType(value)),
        }
    }
}

impl PfcpMessageType {
    /// Check if this message type requires SEID
    pub fn has_seid(&self) -> bool {
        matches!(
            self,
            Self::SessionEstablishmentRequest | Self::SessionEstablishmentResponse
        )
    }

    /// Get the name of the message type
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeartbeatRequest => "Heartbeat Request",
            Self::HeartbeatResponse => "Heartbeat Response",
            Self::AssociationSetupRequest => "Association Setup Request",
            Self::AssociationSetupResponse => "Association Setup Response",
            Self::SessionEstablishmentRequest => "Session Establishment Request",
            Self::SessionEstablishmentResponse => "Session Establishment Response",
        }
    }
}

/// PFCP Header structure
///
/// Format (without SEID - 8 bytes):
/// ```text
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// |  Ver  | Spare | S | Spare |       Message Type                |
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// |                    Message Length                             |
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// |                    Sequence Number (3 bytes)                  |
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// |  Spare                                                        |
/// +-------+-------+-------+-------+-------+-------+-------+-------+
/// ```
///
/// With SEID the 8-byte identifier sits between the length and the
/// sequence number, for 16 bytes in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfcpHeader {
    /// PFCP version (accepted as received)
    pub version: u8,
    /// SEID flag (S bit)
    pub seid_presence: bool,
    /// Raw message type code
    pub message_type: u8,
    /// Message length (excluding first 4 bytes)
    pub length: u16,
    /// Session Endpoint Identifier (optional)
    pub seid: Option<u64>,
    /// Sequence number (24 bits)
    pub sequence_number: u32,
}

impl PfcpHeader {
    /// Create a new PFCP header without SEID
    pub fn new(message_type: u8, sequence_number: u32) -> Self {
        Self {
            version: PFCP_VERSION,
            seid_presence: false,
            message_type,
            length: 0,
            seid: None,
            sequence_number,
        }
    }

    /// Create a new PFCP header with SEID
    pub fn new_with_seid(message_type: u8, seid: u64, sequence_number: u32) -> Self {
        Self {
            version: PFCP_VERSION,
            seid_presence: true,
            message_type,
            length: 0,
            seid: Some(seid),
            sequence_number,
        }
    }

    /// Get the header length
    pub fn header_len(&self) -> usize {
        header_len(self.seid_presence)
    }

    /// Typed message type, if the code is one this crate knows
    pub fn pfcp_message_type(&self) -> PfcpResult<PfcpMessageType> {
        PfcpMessageType::try_from(self.message_type)
    }

    /// Set the length field for a payload of `payload_len` bytes
    pub fn set_payload_len(&mut self, payload_len: u16) {
        let after_length = (self.header_len() - PFCP_LENGTH_OFFSET) as u16;
        self.length = after_length.wrapping_add(payload_len);
    }

    /// Encode the header to bytes
    pub fn encode(&self, buf: &mut BytesMut) {
        let first_byte = ((self.version & 0x07) << 5)
            | if self.seid_presence { SEID_FLAG } else { 0 };
        buf.put_u8(first_byte);
        buf.put_u8(self.message_type);
        buf.put_u16(self.length);

        if self.seid_presence {
            buf.put_u64(self.seid.unwrap_or(0));
        }

        // Sequence number (3 bytes) + spare
        let seq_bytes = (self.sequence_number & PFCP_MAX_SEQUENCE).to_be_bytes();
        buf.put_slice(&seq_bytes[1..4]);
        buf.put_u8(0);
    }

    /// Decode a header from the start of `data`
    ///
    /// The header length is taken from the S flag alone. The length field is
    /// returned as received and checked by the caller against the header.
    pub fn decode(data: &[u8]) -> PfcpResult<Self> {
        if data.len() < PFCP_HEADER_LEN {
            return Err(PfcpError::BufferTooShort {
                needed: PFCP_HEADER_LEN,
                available: data.len(),
            });
        }

        let flags = data[0];
        let version = (flags >> 5) & 0x07;
        let seid_presence = flags & SEID_FLAG != 0;
        let message_type = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]);

        let (seid, seq_offset) = if seid_presence {
            if data.len() < PFCP_HEADER_LEN_WITH_SEID {
                return Err(PfcpError::BufferTooShort {
                    needed: PFCP_HEADER_LEN_WITH_SEID,
                    available: data.len(),
                });
            }
            let mut seid = [0u8; 8];
            seid.copy_from_slice(&data[4..12]);
            (Some(u64::from_be_bytes(seid)), 12)
        } else {
            (None, 4)
        };

        let sequence_number = u32::from_be_bytes([
            0,
            data[seq_offset],
            data[seq_offset + 1],
            data[seq_offset + 2],
        ]);

        Ok(Self {
            version,
            seid_presence,
            message_type,
            length,
            seid,
            sequence_number,
        })
    }
}

/// Header length for a given S flag
pub fn header_len(seid_presence: bool) -> usize {
    if seid_presence {
        PFCP_HEADER_LEN_WITH_SEID
    } else {
        PFCP_HEADER_LEN
    }
}

/// Encode a complete header for a payload of `payload_len` bytes
pub fn encode_header(
    message_type: u8,
    payload_len: u16,
    sequence_number: u32,
    seid: Option<u64>,
) -> BytesMut {
    let mut header = match seid {
        Some(seid) => PfcpHeader::new_with_seid(message_type, seid, sequence_number),
        None => PfcpHeader::new(message_type, sequence_number),
    };
    header.set_payload_len(payload_len);

    let mut buf = BytesMut::with_capacity(header.header_len() + payload_len as usize);
    header.encode(&mut buf);
    buf
}
