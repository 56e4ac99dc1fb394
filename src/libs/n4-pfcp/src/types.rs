//! PFCP Types
//!
//! Protocol constants and value types carried inside N4 Information Elements.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{PfcpError, PfcpResult};

/// PFCP version carried in the header flags
pub const PFCP_VERSION: u8 = 1;

/// PFCP UDP port (TS 29.244)
pub const PFCP_UDP_PORT: u16 = 8805;

/// Seconds between the NTP era 0 epoch (1900) and the Unix epoch (1970)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// PFCP Cause values (TS 29.244 Section 8.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PfcpCause {
    RequestAccepted = 1,
    RequestRejected = 64,
    SessionContextNotFound = 65,
    MandatoryIeMissing = 66,
    ConditionalIeMissing = 67,
    InvalidLength = 68,
    MandatoryIeIncorrect = 69,
    InvalidForwardingPolicy = 70,
    InvalidFTeidAllocationOption = 71,
    NoEstablishedPfcpAssociation = 72,
    RuleCreationModificationFailure = 73,
    PfcpEntityInCongestion = 74,
    NoResourcesAvailable = 75,
    ServiceNotSupported = 76,
    SystemFailure = 77,
}

impl TryFrom<u8> for PfcpCause {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::RequestAccepted),
            64 => Ok(Self::RequestRejected),
            65 => Ok(Self::SessionContextNotFound),
            66 => Ok(Self::MandatoryIeMissing),
            67 => Ok(Self::ConditionalIeMissing),
            68 => Ok(Self::InvalidLength),
            69 => Ok(Self::MandatoryIeIncorrect),
            70 => Ok(Self::InvalidForwardingPolicy),
            71 => Ok(Self::InvalidFTeidAllocationOption),
            72 => Ok(Self::NoEstablishedPfcpAssociation),
            73 => Ok(Self::RuleCreationModificationFailure),
            74 => Ok(Self::PfcpEntityInCongestion),
            75 => Ok(Self::NoResourcesAvailable),
            76 => Ok(Self::ServiceNotSupported),
            77 => Ok(Self::SystemFailure),
            _ => Err(PfcpError::InvalidCause(value)),
        }
    }
}

impl PfcpCause {
    /// Whether the cause reports success
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::RequestAccepted)
    }
}

/// Node ID Type values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeIdType {
    Ipv4 = 0,
    Ipv6 = 1,
    Fqdn = 2,
}

impl TryFrom<u8> for NodeIdType {
    type Error = PfcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Spare bits share the octet with the type nibble
        match value & 0x0F {
            0 => Ok(Self::Ipv4),
            1 => Ok(Self::Ipv6),
            2 => Ok(Self::Fqdn),
            _ => Err(PfcpError::InvalidNodeIdType(value)),
        }
    }
}

/// Node ID (IE 60)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeId {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Fqdn(String),
}

impl From<IpAddr> for NodeId {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => NodeId::Ipv4(v4),
            IpAddr::V6(v6) => NodeId::Ipv6(v6),
        }
    }
}

impl NodeId {
    pub fn node_id_type(&self) -> NodeIdType {
        match self {
            NodeId::Ipv4(_) => NodeIdType::Ipv4,
            NodeId::Ipv6(_) => NodeIdType::Ipv6,
            NodeId::Fqdn(_) => NodeIdType::Fqdn,
        }
    }

    /// Encode the IE value: type octet followed by the address or FQDN labels
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.node_id_type() as u8);
        match self {
            NodeId::Ipv4(addr) => buf.put_slice(&addr.octets()),
            NodeId::Ipv6(addr) => buf.put_slice(&addr.octets()),
            NodeId::Fqdn(fqdn) => {
                for label in fqdn.split('.').filter(|l| !l.is_empty()) {
                    buf.put_u8(label.len() as u8);
                    buf.put_slice(label.as_bytes());
                }
            }
        }
    }

    /// Decode a Node ID IE value
    pub fn decode(buf: &mut Bytes) -> PfcpResult<Self> {
        if buf.remaining() < 1 {
            return Err(PfcpError::BufferTooShort { needed: 1, available: 0 });
        }

        match NodeIdType::try_from(buf.get_u8())? {
            NodeIdType::Ipv4 => {
                if buf.remaining() < 4 {
                    return Err(PfcpError::BufferTooShort {
                        needed: 4,
                        available: buf.remaining(),
                    });
                }
                let mut octets = [0u8; 4];
                buf.copy_to_slice(&mut octets);
                Ok(NodeId::Ipv4(Ipv4Addr::from(octets)))
            }
            NodeIdType::Ipv6 => {
                if buf.remaining() < 16 {
                    return Err(PfcpError::BufferTooShort {
                        needed: 16,
                        available: buf.remaining(),
                    });
                }
                let mut octets = [0u8; 16];
                buf.copy_to_slice(&mut octets);
                Ok(NodeId::Ipv6(Ipv6Addr::from(octets)))
            }
            NodeIdType::Fqdn => {
                let mut labels = Vec::new();
                while buf.has_remaining() {
                    let len = buf.get_u8() as usize;
                    if len == 0 {
                        break;
                    }
                    if buf.remaining() < len {
                        return Err(PfcpError::BufferTooShort {
                            needed: len,
                            available: buf.remaining(),
                        });
                    }
                    let label = buf.copy_to_bytes(len);
                    let label = String::from_utf8(label.to_vec())
                        .map_err(|e| PfcpError::DecodingError(e.to_string()))?;
                    labels.push(label);
                }
                Ok(NodeId::Fqdn(labels.join(".")))
            }
        }
    }
}

/// Convert a wall-clock time to a 32-bit NTP timestamp (seconds, truncated)
pub fn ntp_timestamp(time: SystemTime) -> u32 {
    let unix = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ((unix + NTP_UNIX_OFFSET) & 0xFFFF_FFFF) as u32
}

/// Current time as a 32-bit NTP timestamp
pub fn ntp_now() -> u32 {
    ntp_timestamp(SystemTime::now())
}
