//! UPF N4 (PFCP) Message Building
//!
//! IE payloads for the responses the UPF sends on N4.

use bytes::{BufMut, Bytes, BytesMut};
use n4_pfcp::ie;
use n4_pfcp::types::{NodeId, PfcpCause};

/// Accumulates encoded IEs into a message payload
#[derive(Debug, Default)]
pub struct PfcpMessageBuilder {
    buffer: BytesMut,
}

impl PfcpMessageBuilder {
    pub fn new() -> Self {
        Self { buffer: BytesMut::with_capacity(64) }
    }

    pub fn len(&self) -> usize { self.buffer.len() }

    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Build and return the payload bytes
    pub fn build(self) -> Bytes { self.buffer.freeze() }

    /// Add an already encoded IE
    pub fn add_ie(&mut self, encoded: &[u8]) -> &mut Self {
        self.buffer.put_slice(encoded);
        self
    }

    pub fn add_node_id(&mut self, node_id: &NodeId) -> &mut Self {
        self.add_ie(&ie::node_id(node_id))
    }

    pub fn add_cause(&mut self, cause: PfcpCause) -> &mut Self {
        self.add_ie(&ie::cause(cause as u8))
    }

    pub fn add_recovery_time_stamp(&mut self, ntp32: u32) -> &mut Self {
        self.add_ie(&ie::recovery_time_stamp(ntp32))
    }
}

/// Build Heartbeat Response
pub fn build_heartbeat_response(recovery_time_stamp: u32) -> Bytes {
    let mut builder = PfcpMessageBuilder::new();
    builder.add_recovery_time_stamp(recovery_time_stamp);
    builder.build()
}

/// Build Association Setup Response
pub fn build_association_setup_response(
    node_id: &NodeId,
    cause: PfcpCause,
    recovery_time_stamp: u32,
) -> Bytes {
    let mut builder = PfcpMessageBuilder::new();
    builder
        .add_node_id(node_id)
        .add_cause(cause)
        .add_recovery_time_stamp(recovery_time_stamp);
    builder.build()
}

/// Build Session Establishment Response
pub fn build_session_establishment_response(cause: PfcpCause, recovery_time_stamp: u32) -> Bytes {
    let mut builder = PfcpMessageBuilder::new();
    builder
        .add_cause(cause)
        .add_recovery_time_stamp(recovery_time_stamp);
    builder.build()
}
