//! N4 PFCP Protocol Library
//!
//! Header and Information Element codec for the PFCP (Packet Forwarding
//! Control Protocol) N4 interface between SMF and UPF, TS 29.244.
//!
//! # Features
//!
//! - PFCP header encoding/decoding, with and without SEID
//! - IE type-length-instance-value encoding and lenient decoding
//! - Node ID, Cause and Recovery Time Stamp value types
//!
//! # Example
//!
//! ```rust
//! use n4_pfcp::header::PfcpMessageType;
//! use n4_pfcp::{ie, build_message, PfcpMessage};
//!
//! let payload = ie::recovery_time_stamp(n4_pfcp::types::ntp_now());
//! let buf = build_message(PfcpMessageType::HeartbeatRequest as u8, 1, None, &payload);
//!
//! let msg = PfcpMessage::decode(&buf).unwrap();
//! assert_eq!(msg.ies().count(), 1);
//! ```

pub mod error;
pub mod header;
pub mod ie;
pub mod message;
pub mod types;


pub use error::{PfcpError, PfcpResult};
pub use header::{
    encode_header, PfcpHeader, PfcpMessageType, PFCP_HEADER_LEN, PFCP_HEADER_LEN_WITH_SEID,
};
pub use ie::{decode_all, IeType, InformationElement};
pub use message::{build_message, PfcpMessage};
pub use types::PFCP_UDP_PORT;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PfcpError, PfcpResult};
    pub use crate::header::{encode_header, PfcpHeader, PfcpMessageType};
    pub use crate::ie::{decode_all, IeIter, IeType, InformationElement};
    pub use crate::message::{build_message, PfcpMessage};
    pub use crate::types::{ntp_now, ntp_timestamp, NodeId, NodeIdType, PfcpCause};
}
