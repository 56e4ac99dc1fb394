//! PFCP Integration Tests
//!
//! Drives a real `PfcpServer` over UDP on the loopback interface the way an
//! SMF would: Heartbeat, Association Setup and Session Establishment.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use n4_pfcp::header::PfcpMessageType;
use n4_pfcp::ie::{self, IeType};
use n4_pfcp::message::{build_message, PfcpMessage};
use n4_pfcp::types::{ntp_now, NodeId};
use n4_upfd::{N4Handler, PfcpServer, SessionStore};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const UPF_NODE_IP: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 4);

/// Running UPF under test
struct TestUpf {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    task: JoinHandle<io::Result<PfcpServer>>,
}

impl TestUpf {
    async fn start() -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let handler = N4Handler::new(NodeId::Ipv4(UPF_NODE_IP), SessionStore::new());
        let mut server = PfcpServer::bind(
            SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            handler,
            shutdown.clone(),
        )
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();

        let task = tokio::spawn(async move {
            server.run().await?;
            Ok(server)
        });

        Self {
            addr,
            shutdown,
            task,
        }
    }

    async fn stop(self) -> PfcpServer {
        self.shutdown.store(true, Ordering::SeqCst);
        self.task.await.unwrap().unwrap()
    }
}

/// SMF side of the N4 exchange
struct MockSmf {
    socket: UdpSocket,
    upf: SocketAddr,
}

impl MockSmf {
    async fn connect(upf: SocketAddr) -> Self {
        let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .unwrap();
        Self { socket, upf }
    }

    async fn send(&self, data: &[u8]) {
        self.socket.send_to(data, self.upf).await.unwrap();
    }

    async fn recv(&self) -> Option<PfcpMessage> {
        let mut buf = vec![0u8; 65536];
        let (len, from) = timeout(RECV_TIMEOUT, self.socket.recv_from(&mut buf))
            .await
            .ok()?
            .unwrap();
        assert_eq!(from, self.upf);
        Some(PfcpMessage::decode(&buf[..len]).unwrap())
    }

    async fn request(&self, data: &[u8]) -> PfcpMessage {
        self.send(data).await;
        self.recv().await.expect("no response from UPF")
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_heartbeat() {
    let upf = TestUpf::start().await;
    let smf = MockSmf::connect(upf.addr).await;

    let resp = smf
        .request(&build_message(PfcpMessageType::HeartbeatRequest as u8, 42, None, &[]))
        .await;

    assert_eq!(resp.message_type(), PfcpMessageType::HeartbeatResponse as u8);
    assert_eq!(resp.sequence_number(), 42);
    assert!(!resp.header.seid_presence);

    let ies: Vec<_> = resp.ies().collect();
    assert_eq!(ies.len(), 1);
    assert_eq!(ies[0].ie_type, IeType::RecoveryTimeStamp as u16);
    let ts = ies[0].as_u32().unwrap();
    assert!(ntp_now().wrapping_sub(ts) <= 5);

    upf.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_association_setup() {
    let upf = TestUpf::start().await;
    let smf = MockSmf::connect(upf.addr).await;

    let mut payload = ie::node_id_ipv4(Ipv4Addr::LOCALHOST).to_vec();
    payload.extend_from_slice(&ie::recovery_time_stamp(ntp_now()));
    let resp = smf
        .request(&build_message(
            PfcpMessageType::AssociationSetupRequest as u8,
            7,
            None,
            &payload,
        ))
        .await;

    assert_eq!(resp.message_type(), PfcpMessageType::AssociationSetupResponse as u8);
    assert_eq!(resp.sequence_number(), 7);

    let ies: Vec<_> = resp.ies().collect();
    let types: Vec<u16> = ies.iter().map(|ie| ie.ie_type).collect();
    assert_eq!(
        types,
        vec![
            IeType::NodeId as u16,
            IeType::Cause as u16,
            IeType::RecoveryTimeStamp as u16,
        ]
    );
    let mut node_id = ies[0].value.clone();
    assert_eq!(NodeId::decode(&mut node_id).unwrap(), NodeId::Ipv4(UPF_NODE_IP));
    assert_eq!(ies[1].as_u8(), Some(1));

    let server = upf.stop().await;
    assert!(server.handler().sessions().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_session_establishment() {
    let upf = TestUpf::start().await;
    let smf = MockSmf::connect(upf.addr).await;

    let pdr = ie::encode(IeType::CreatePdr as u16, &[0x00, 0x38, 0x00, 0x02, 0x00, 0x01], 0);
    let far = ie::encode(IeType::CreateFar as u16, &[0x00, 0x6C, 0x00, 0x04, 0x00, 0, 0, 1], 0);
    let mut payload = pdr.to_vec();
    payload.extend_from_slice(&far);

    let resp = smf
        .request(&build_message(
            PfcpMessageType::SessionEstablishmentRequest as u8,
            100,
            Some(0),
            &payload,
        ))
        .await;

    assert_eq!(
        resp.message_type(),
        PfcpMessageType::SessionEstablishmentResponse as u8
    );
    assert_eq!(resp.sequence_number(), 100);
    assert!(resp.header.seid_presence);
    let seid = resp.seid().unwrap();
    assert_ne!(seid, 0);
    assert!(seid < 1 << 48);

    let cause = ie::find_ie(&resp.payload, IeType::Cause).unwrap();
    assert_eq!(cause.as_u8(), Some(1));
    assert!(ie::find_ie(&resp.payload, IeType::RecoveryTimeStamp).is_some());

    let server = upf.stop().await;
    let sess = server.handler().sessions().get(seid).unwrap();
    assert_eq!(sess.pdrs.len(), 1);
    assert_eq!(sess.fars.len(), 1);
    assert_eq!(sess.pdrs[0].value.as_ref(), &pdr[5..]);
    assert_eq!(sess.fars[0].value.as_ref(), &far[5..]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_no_response_to_malformed_or_unknown() {
    let upf = TestUpf::start().await;
    let smf = MockSmf::connect(upf.addr).await;

    // truncated header
    smf.send(&[0x20, 0x01, 0x00]).await;
    // Session Modification Request has no handler
    smf.send(&build_message(52, 5, Some(1), &[])).await;
    // the heartbeat answer must be the first thing that comes back
    let resp = smf
        .request(&build_message(PfcpMessageType::HeartbeatRequest as u8, 6, None, &[]))
        .await;
    assert_eq!(resp.sequence_number(), 6);

    let server = upf.stop().await;
    assert!(server.handler().sessions().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sessions_accumulate() {
    let upf = TestUpf::start().await;
    let smf = MockSmf::connect(upf.addr).await;

    let mut seids = Vec::new();
    for seq in 1..=3u32 {
        let resp = smf
            .request(&build_message(
                PfcpMessageType::SessionEstablishmentRequest as u8,
                seq,
                Some(0),
                &[],
            ))
            .await;
        assert_eq!(resp.sequence_number(), seq);
        seids.push(resp.seid().unwrap());
    }

    let server = upf.stop().await;
    assert_eq!(server.handler().sessions().len(), 3);
    for seid in seids {
        assert!(server.handler().sessions().get(seid).is_some());
    }
}
