//! PFCP Messages
//!
//! A decoded N4 datagram: the header plus the raw IE payload it delimits.

use bytes::{BufMut, Bytes};
use crate::error::{PfcpError, PfcpResult};
use crate::header::{encode_header, PfcpHeader, PFCP_LENGTH_OFFSET};
use crate::ie::{decode_all, IeIter};

/// A PFCP message with its IE payload left undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfcpMessage {
    pub header: PfcpHeader,
    pub payload: Bytes,
}

impl PfcpMessage {
    /// Decode a message from a received datagram
    ///
    /// The payload runs from the end of the header to the end of the span the
    /// length field covers. A datagram shorter than that span yields the bytes
    /// that are present; a length field shorter than the header is an error.
    pub fn decode(data: &[u8]) -> PfcpResult<Self> {
        let header = PfcpHeader::decode(data)?;
        let header_len = header.header_len();

        let end = PFCP_LENGTH_OFFSET + header.length as usize;
        if end < header_len {
            return Err(PfcpError::InvalidLength {
                length: header.length,
                header_len,
            });
        }

        let end = end.min(data.len());
        let payload = Bytes::copy_from_slice(&data[header_len..end]);

        Ok(Self { header, payload })
    }

    pub fn message_type(&self) -> u8 {
        self.header.message_type
    }

    pub fn sequence_number(&self) -> u32 {
        self.header.sequence_number
    }

    pub fn seid(&self) -> Option<u64> {
        self.header.seid
    }

    /// Iterate the IEs carried in the payload
    pub fn ies(&self) -> IeIter<'_> {
        decode_all(&self.payload)
    }
}

/// Build a complete message from a type, sequence number, optional SEID and payload
pub fn build_message(
    message_type: u8,
    sequence_number: u32,
    seid: Option<u64>,
    payload: &[u8],
) -> Bytes {
    let mut buf = encode_header(message_type, payload.len() as u16, sequence_number, seid);
    buf.put_slice(payload);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{PfcpMessageType, PFCP_HEADER_LEN, PFCP_HEADER_LEN_WITH_SEID};
    use crate::ie::{self, IeType};

    #[test]
    fn test_build_parse_heartbeat() {
        let payload = ie::recovery_time_stamp(0xE000_0001);
        let buf = build_message(PfcpMessageType::HeartbeatRequest as u8, 1, None, &payload);
        assert_eq!(buf.len(), PFCP_HEADER_LEN + payload.len());

        let msg = PfcpMessage::decode(&buf).unwrap();
        assert_eq!(msg.message_type(), PfcpMessageType::HeartbeatRequest as u8);
        assert_eq!(msg.sequence_number(), 1);
        assert_eq!(msg.seid(), None);
        assert_eq!(msg.payload, payload);

        let ies: Vec<_> = msg.ies().collect();
        assert_eq!(ies.len(), 1);
        assert_eq!(ies[0].ie_type, IeType::RecoveryTimeStamp as u16);
        assert_eq!(ies[0].as_u32(), Some(0xE000_0001));
    }

    #[test]
    fn test_build_parse_with_seid() {
        let payload = ie::cause(1);
        let buf = build_message(
            PfcpMessageType::SessionEstablishmentResponse as u8,
            7,
            Some(0xABCD),
            &payload,
        );
        assert_eq!(buf.len(), PFCP_HEADER_LEN_WITH_SEID + payload.len());

        let msg = PfcpMessage::decode(&buf).unwrap();
        assert_eq!(msg.seid(), Some(0xABCD));
        assert_eq!(msg.sequence_number(), 7);
        assert_eq!(msg.payload, payload);
    }

    #[test]
    fn test_decode_empty_payload() {
        let buf = build_message(PfcpMessageType::HeartbeatRequest as u8, 3, None, &[]);
        let msg = PfcpMessage::decode(&buf).unwrap();
        assert!(msg.payload.is_empty());
        assert_eq!(msg.ies().count(), 0);
    }

    #[test]
    fn test_decode_length_shorter_than_header() {
        // length=2 claims less than the 4 bytes of sequence + spare
        let data = [0x20, 0x01, 0x00, 0x02, 0x00, 0x00, 0x01, 0x00];
        assert_eq!(
            PfcpMessage::decode(&data),
            Err(PfcpError::InvalidLength { length: 2, header_len: 8 })
        );

        // with SEID the length must cover at least 12 bytes
        let mut data = vec![0x24, 50, 0x00, 0x08];
        data.extend_from_slice(&[0u8; 12]);
        assert_eq!(
            PfcpMessage::decode(&data),
            Err(PfcpError::InvalidLength { length: 8, header_len: 16 })
        );
    }

    #[test]
    fn test_decode_length_beyond_datagram() {
        // length claims 20 payload bytes, only 5 are present
        let mut data = vec![0x20, 0x01, 0x00, 24, 0x00, 0x00, 0x01, 0x00];
        data.extend_from_slice(&[0, 19, 0, 1, 0]);
        let msg = PfcpMessage::decode(&data).unwrap();
        assert_eq!(msg.payload.as_ref(), &[0, 19, 0, 1, 0]);
        // IE claims one value byte that never arrived
        assert_eq!(msg.ies().count(), 0);
    }

    #[test]
    fn test_decode_ignores_bytes_past_length() {
        let payload = ie::cause(1);
        let mut data = build_message(1, 9, None, &payload).to_vec();
        data.extend_from_slice(&[0xFF, 0xFF]);

        let msg = PfcpMessage::decode(&data).unwrap();
        assert_eq!(msg.payload, payload);
    }
}
