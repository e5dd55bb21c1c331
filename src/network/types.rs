use std::fmt;
use std::net::SocketAddr;

/// The raw material a login request arrives with, before any lifecycle
/// logic runs. Field names mirror the wire payload.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub email: String,
    pub nickname: String,
    pub client_mac: String,
}

/// Connection-level context captured by the transport for one request.
///
/// `forwarded_for` is the verbatim `X-Forwarded-For` header value when a
/// proxy supplied one; `remote_addr` is the kernel-reported peer of the
/// connection the request arrived on.
#[derive(Debug, Clone, Default)]
pub struct ConnectionContext {
    pub forwarded_for: Option<String>,
    pub remote_addr: Option<SocketAddr>,
}

/// Where a resolved client address came from.
///
/// A `ForwardedHeader` value is client-controlled and therefore the least
/// trustworthy link in the chain, even though it has priority: it is the
/// only one that can see through a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvenanceSource {
    ForwardedHeader,
    PeerAddress,
    Unknown,
}

impl fmt::Display for ProvenanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvenanceSource::ForwardedHeader => write!(f, "forwarded header"),
            ProvenanceSource::PeerAddress => write!(f, "peer address"),
            ProvenanceSource::Unknown => write!(f, "unknown"),
        }
    }
}

/// Best-effort caller address, tagged with the chain link that produced it.
/// Provenance, not identity.
#[derive(Debug, Clone)]
pub struct ClientProvenance {
    pub addr: String,
    pub source: ProvenanceSource,
}

/// Address and hardware identifier of the serving host, captured at session
/// creation time.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub addr: String,
    pub mac: String,
}

impl HostIdentity {
    /// Placeholder identity used when interface enumeration yields nothing
    /// usable; session creation proceeds rather than failing on it.
    pub fn unknown() -> Self {
        Self {
            addr: "unknown".to_string(),
            mac: "unknown".to_string(),
        }
    }
}
