//! A minimal synchronous UDP/TCP accept loop wiring the zone, resolver, and
//! signer together (spec.md §4.L/§6: "not in the core specification",
//! kept thin here only so the crate is runnable end to end). Grounded on
//! the teacher's `components/resolver/forward.rs` (`std::net::UdpSocket`
//! usage) and [`crate::thread_pool::ThreadPool`] for dispatching each
//! request off the accept thread.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream, UdpSocket};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dns::message::Message;
use crate::resolver::Resolver;
use crate::thread_pool::ThreadPool;

/// Messages larger than this (absent EDNS) are truncated per spec.md §6.
const DEFAULT_UDP_PAYLOAD: usize = 512;
const MAX_MESSAGE_SIZE: usize = 65_535;

/// Serialize `message`, truncating (TC=1, trailing records of the answer
/// then authority then additional sections dropped whole) if it exceeds
/// `payload_limit` — only meaningful for UDP; TCP callers pass
/// `MAX_MESSAGE_SIZE`.
pub fn encode_with_truncation(message: &Message, payload_limit: usize) -> Vec<u8> {
    let bytes = message.write().to_contiguous();
    if bytes.len() <= payload_limit {
        return bytes;
    }

    let mut truncated = message.clone();
    while !truncated.additionals.is_empty() || !truncated.authorities.is_empty() || !truncated.answers.is_empty() {
        if !truncated.additionals.is_empty() {
            truncated.additionals.pop();
        } else if !truncated.authorities.is_empty() {
            truncated.authorities.pop();
        } else {
            truncated.answers.pop();
        }
        let candidate = truncated.write().to_contiguous();
        if candidate.len() <= payload_limit {
            return candidate;
        }
    }

    truncated.header.with_tc(true);
    truncated.write().to_contiguous()
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Resolve one already-parsed query against `zone_state`, returning the
/// response message alongside the client's advertised UDP payload size.
fn handle_query(zone_state: &ZoneState, query_bytes: &[u8]) -> Option<(Message, usize)> {
    let query = Message::from_wire(query_bytes).ok()?;
    let resolver = Resolver::new(&zone_state.zone, zone_state.denial(), zone_state.signer.as_ref());
    let response = resolver.resolve(&query, now());
    let payload_limit = response
        .edns
        .as_ref()
        .map(|e| e.udp_payload_size as usize)
        .unwrap_or(DEFAULT_UDP_PAYLOAD);
    Some((response, payload_limit))
}

/// Immutable, `Send + Sync` state shared across every worker thread: the
/// zone, an optional denial-of-existence database, and an optional signer
/// (spec.md §5 — all three are read-only after setup, so no lock is
/// needed to serve concurrently).
pub struct ZoneState {
    pub zone: crate::zone::Zone,
    pub nsec: Option<crate::zone::NsecDb>,
    pub nsec3: Option<crate::zone::Nsec3Db>,
    pub signer: Option<crate::signer::Signer>,
}

impl ZoneState {
    fn denial(&self) -> Option<crate::resolver::Denial<'_>> {
        if let Some(db) = &self.nsec3 {
            Some(crate::resolver::Denial::Nsec3(db))
        } else {
            self.nsec.as_ref().map(crate::resolver::Denial::Nsec)
        }
    }
}

pub struct Server {
    state: Arc<ZoneState>,
    pool: ThreadPool,
}

impl Server {
    pub fn new(state: ZoneState, worker_count: usize) -> Self {
        Server {
            state: Arc::new(state),
            pool: ThreadPool::new(worker_count),
        }
    }

    pub fn serve_udp(&self, bind_addr: &str) -> std::io::Result<()> {
        let socket = UdpSocket::bind(bind_addr)?;
        tracing::info!(addr = bind_addr, "listening on udp");
        loop {
            let mut buf = vec![0u8; MAX_MESSAGE_SIZE];
            let (len, peer) = socket.recv_from(&mut buf)?;
            buf.truncate(len);
            let state = Arc::clone(&self.state);
            let reply_socket = socket.try_clone()?;
            self.pool.execute(move || {
                if let Some((response, payload_limit)) = handle_query(&state, &buf) {
                    let wire = encode_with_truncation(&response, payload_limit);
                    if let Err(err) = reply_socket.send_to(&wire, peer) {
                        tracing::warn!(%err, %peer, "failed to send udp response");
                    }
                }
            });
        }
    }

    pub fn serve_tcp(&self, bind_addr: &str) -> std::io::Result<()> {
        let listener = TcpListener::bind(bind_addr)?;
        tracing::info!(addr = bind_addr, "listening on tcp");
        for stream in listener.incoming() {
            let stream = stream?;
            let state = Arc::clone(&self.state);
            self.pool.execute(move || {
                if let Err(err) = Self::handle_tcp_connection(&state, stream) {
                    tracing::warn!(%err, "tcp connection error");
                }
            });
        }
        Ok(())
    }

    fn handle_tcp_connection(state: &ZoneState, mut stream: TcpStream) -> std::io::Result<()> {
        loop {
            let mut len_prefix = [0u8; 2];
            if stream.read_exact(&mut len_prefix).is_err() {
                return Ok(());
            }
            let len = u16::from_be_bytes(len_prefix) as usize;
            let mut query_bytes = vec![0u8; len];
            stream.read_exact(&mut query_bytes)?;

            if let Some((response, _)) = handle_query(state, &query_bytes) {
                let wire = encode_with_truncation(&response, MAX_MESSAGE_SIZE);
                stream.write_all(&(wire.len() as u16).to_be_bytes())?;
                stream.write_all(&wire)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::name::Name;
    use crate::dns::question::Question;
    use crate::dns::rdata::address::A;
    use crate::dns::rdata::soa::Soa;
    use crate::dns::rdata::RData;
    use crate::dns::{CLASS_IN, TYPE_A};
    use crate::zone::Zone;
    use std::net::Ipv4Addr;

    fn sample_state() -> ZoneState {
        let apex = Name::from_presentation("example.com.").unwrap();
        let mut zone = Zone::new(apex.clone(), CLASS_IN);
        zone.add(crate::dns::rr::RRset::singleton(
            apex.clone(),
            CLASS_IN,
            3600,
            RData::Soa(Soa {
                mname: Name::from_presentation("ns1.example.com.").unwrap(),
                rname: Name::from_presentation("hostmaster.example.com.").unwrap(),
                serial: 1,
                refresh: 3600,
                retry: 600,
                expire: 604800,
                minimum: 60,
            }),
        ))
        .unwrap();
        zone.add(crate::dns::rr::RRset::singleton(
            apex.clone(),
            CLASS_IN,
            3600,
            RData::Ns(crate::dns::rdata::name_based::Ns(
                Name::from_presentation("ns1.example.com.").unwrap(),
            )),
        ))
        .unwrap();
        zone.add(crate::dns::rr::RRset::singleton(
            Name::from_presentation("www.example.com.").unwrap(),
            CLASS_IN,
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
        ))
        .unwrap();
        zone.verify().unwrap();
        ZoneState {
            zone,
            nsec: None,
            nsec3: None,
            signer: None,
        }
    }

    #[test]
    fn handle_query_answers_an_a_record() {
        let state = sample_state();
        let mut query = Message::default();
        query.questions.push(Question::new(
            Name::from_presentation("www.example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
        ));
        let bytes = query.write().to_contiguous();
        let (response, _) = handle_query(&state, &bytes).unwrap();
        assert_eq!(response.answers.len(), 1);
    }

    #[test]
    fn truncation_sets_tc_when_over_budget() {
        let mut msg = Message::default();
        msg.questions.push(Question::new(
            Name::from_presentation("example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
        ));
        for i in 0..50u8 {
            msg.answers.push(crate::dns::rr::ResourceRecord::new(
                Name::from_presentation("example.com.").unwrap(),
                CLASS_IN,
                300,
                RData::A(A(Ipv4Addr::new(192, 0, 2, i))),
            ));
        }
        let wire = encode_with_truncation(&msg, 64);
        let parsed = Message::from_wire(&wire).unwrap();
        assert!(parsed.header.tc());
    }
}
