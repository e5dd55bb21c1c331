use crate::network::types::{ClientProvenance, ConnectionContext, ProvenanceSource};

/// Resolves the caller's network address from a request's connection
/// context.
///
/// Priority chain: the first hop of a proxy-declared `X-Forwarded-For`
/// header, then the connection's peer address. When neither yields a value
/// the address is recorded as `"unknown"` rather than failing the request.
pub fn resolve_client_addr(ctx: &ConnectionContext) -> ClientProvenance {
    if let Some(header) = &ctx.forwarded_for {
        // A proxy chain is comma-separated with the originating client first
        if let Some(first_hop) = header.split(',').next() {
            let first_hop = first_hop.trim();
            if !first_hop.is_empty() {
                return ClientProvenance {
                    addr: first_hop.to_string(),
                    source: ProvenanceSource::ForwardedHeader,
                };
            }
        }
    }

    if let Some(peer) = ctx.remote_addr {
        return ClientProvenance {
            addr: peer.ip().to_string(),
            source: ProvenanceSource::PeerAddress,
        };
    }

    ClientProvenance {
        addr: "unknown".to_string(),
        source: ProvenanceSource::Unknown,
    }
}
