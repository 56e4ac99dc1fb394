//! UPF N4 Message Handler
//!
//! Decodes one N4 datagram, runs the handler for its message type and
//! returns the encoded response, if any. Each datagram is handled on its own;
//! the only state carried between datagrams is the session store.

use bytes::Bytes;
use n4_pfcp::header::PfcpMessageType;
use n4_pfcp::message::{build_message, PfcpMessage};
use n4_pfcp::types::{ntp_now, NodeId, PfcpCause};
use std::net::SocketAddr;

use crate::context::{IeClass, SessionStore};
use crate::n4_build::{
    build_association_setup_response, build_heartbeat_response,
    build_session_establishment_response,
};

/// Source of 32-bit NTP timestamps for Recovery Time Stamp IEs
pub type NtpClock = fn() -> u32;

/// Response produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct N4Response {
    pub message_type: PfcpMessageType,
    pub data: Bytes,
}

/// N4 request dispatcher
#[derive(Debug)]
pub struct N4Handler {
    node_id: NodeId,
    sessions: SessionStore,
    clock: NtpClock,
}

impl N4Handler {
    pub fn new(node_id: NodeId, sessions: SessionStore) -> Self {
        Self {
            node_id,
            sessions,
            clock: ntp_now,
        }
    }

    /// Replace the wall clock used for Recovery Time Stamp IEs
    pub fn with_clock(mut self, clock: NtpClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one received datagram
    ///
    /// Returns `None` when nothing should be sent back: the header is
    /// malformed or the message type has no handler.
    pub fn handle_datagram(&mut self, data: &[u8], src_addr: SocketAddr) -> Option<N4Response> {
        let msg = match PfcpMessage::decode(data) {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("Invalid PFCP header from {src_addr}: {e}");
                return None;
            }
        };

        log::debug!(
            "PFCP <- type={} seq={} len={} from={}",
            msg.message_type(),
            msg.sequence_number(),
            msg.payload.len(),
            src_addr
        );

        let response = match PfcpMessageType::try_from(msg.message_type()) {
            Ok(PfcpMessageType::HeartbeatRequest) => self.handle_heartbeat_request(&msg),
            Ok(PfcpMessageType::AssociationSetupRequest) => {
                self.handle_association_setup_request(&msg)
            }
            Ok(PfcpMessageType::SessionEstablishmentRequest) => {
                self.handle_session_establishment_request(&msg, src_addr)
            }
            _ => {
                log::warn!(
                    "PFCP message type {} not implemented (from {src_addr})",
                    msg.message_type()
                );
                return None;
            }
        };

        log::info!(
            "PFCP -> {} seq={} to {src_addr}",
            response.message_type.name(),
            msg.sequence_number()
        );
        Some(response)
    }

    /// Handle Heartbeat Request
    fn handle_heartbeat_request(&mut self, msg: &PfcpMessage) -> N4Response {
        let payload = build_heartbeat_response((self.clock)());
        respond(PfcpMessageType::HeartbeatResponse, msg, None, &payload)
    }

    /// Handle Association Setup Request
    fn handle_association_setup_request(&mut self, msg: &PfcpMessage) -> N4Response {
        let payload = build_association_setup_response(
            &self.node_id,
            PfcpCause::RequestAccepted,
            (self.clock)(),
        );
        respond(PfcpMessageType::AssociationSetupResponse, msg, None, &payload)
    }

    /// Handle Session Establishment Request
    ///
    /// A new session is created for every request; the SEID in the request
    /// header is not looked up.
    fn handle_session_establishment_request(
        &mut self,
        msg: &PfcpMessage,
        src_addr: SocketAddr,
    ) -> N4Response {
        log::info!("Session Establishment Request from {src_addr}");

        let seid = self.sessions.create_session();
        let (mut pdrs, mut fars, mut others) = (0usize, 0usize, 0usize);
        for ie in msg.ies() {
            match self.sessions.record_ie(seid, ie) {
                IeClass::Pdr => pdrs += 1,
                IeClass::Far => fars += 1,
                IeClass::Other => others += 1,
            }
        }

        let payload =
            build_session_establishment_response(PfcpCause::RequestAccepted, (self.clock)());
        log::info!(
            "Session established: SEID={seid:#x}, PDRs={pdrs}, FARs={fars}, other IEs={others}"
        );
        respond(
            PfcpMessageType::SessionEstablishmentResponse,
            msg,
            Some(seid),
            &payload,
        )
    }
}

fn respond(
    message_type: PfcpMessageType,
    request: &PfcpMessage,
    seid: Option<u64>,
    payload: &[u8],
) -> N4Response {
    N4Response {
        message_type,
        data: build_message(message_type as u8, request.sequence_number(), seid, payload),
    }
}
