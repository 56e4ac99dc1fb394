//! UPF Session Context
//!
//! Session store for N4 sessions: each session is keyed by a UPF-allocated
//! SEID and accumulates the Create PDR / Create FAR IEs it was established with.

use n4_pfcp::ie::{IeType, InformationElement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Largest SEID handed out (48 bits)
pub const MAX_SEID: u64 = 0xFFFF_FFFF_FFFF;

/// How an IE was filed by [`SessionStore::record_ie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IeClass {
    Pdr,
    Far,
    Other,
}

impl IeClass {
    pub fn of(ie: &InformationElement) -> Self {
        match IeType::try_from(ie.ie_type) {
            Ok(IeType::CreatePdr) => IeClass::Pdr,
            Ok(IeType::CreateFar) => IeClass::Far,
            _ => IeClass::Other,
        }
    }
}

/// UPF session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpfSess {
    /// UPF SEID (48 bits, never 0)
    pub seid: u64,
    /// Create PDR IEs in arrival order
    pub pdrs: Vec<InformationElement>,
    /// Create FAR IEs in arrival order
    pub fars: Vec<InformationElement>,
}

impl UpfSess {
    fn new(seid: u64) -> Self {
        Self {
            seid,
            pdrs: Vec::new(),
            fars: Vec::new(),
        }
    }
}

/// Session store owned by the N4 handler
///
/// SEIDs are drawn uniformly from `1..=MAX_SEID` without checking for
/// collisions against live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<u64, UpfSess>,
    rng: StdRng,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Store with a deterministic SEID sequence
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Allocate a SEID and create an empty session under it
    pub fn create_session(&mut self) -> u64 {
        let seid = self.rng.random_range(1..=MAX_SEID);
        self.sessions.insert(seid, UpfSess::new(seid));
        log::debug!("Session created: SEID={seid:#x} (total={})", self.sessions.len());
        seid
    }

    /// File an IE into the session's PDR or FAR list
    ///
    /// IEs of any other type leave the session unchanged. An unknown SEID is
    /// ignored.
    pub fn record_ie(&mut self, seid: u64, ie: InformationElement) -> IeClass {
        let class = IeClass::of(&ie);

        let Some(sess) = self.sessions.get_mut(&seid) else {
            log::warn!("No session for SEID={seid:#x}, IE type={} ignored", ie.ie_type);
            return class;
        };

        match class {
            IeClass::Pdr => {
                log::debug!("  IE Create PDR (len={})", ie.length());
                sess.pdrs.push(ie);
            }
            IeClass::Far => {
                log::debug!("  IE Create FAR (len={})", ie.length());
                sess.fars.push(ie);
            }
            IeClass::Other => {
                log::debug!("  IE type={} len={} not stored", ie.ie_type, ie.length());
            }
        }
        class
    }

    pub fn get(&self, seid: u64) -> Option<&UpfSess> {
        self.sessions.get(&seid)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn seids(&self) -> impl Iterator<Item = u64> + '_ {
        self.sessions.keys().copied()
    }
}
