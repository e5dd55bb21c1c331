use log::debug;
use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};

use crate::error_handling::types::NetworkError;
use crate::network::types::HostIdentity;

/// Reports the serving host's address and hardware identifier.
///
/// When `pinned` names an interface, that interface is used or the call
/// fails; otherwise interfaces are sorted by name and the first one carrying
/// a non-loopback IPv4 address wins. The sort keeps the result stable on
/// hosts with several qualifying interfaces.
///
/// Recomputed on every call; nothing is cached.
pub fn discover_host_identity(pinned: Option<&str>) -> Result<HostIdentity, NetworkError> {
    let mut interfaces =
        NetworkInterface::show().map_err(|e| NetworkError::EnumerationFailed(e.to_string()))?;
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(name) = pinned {
        let iface = interfaces
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| NetworkError::InterfaceNotFound(name.to_string()))?;
        return identity_of(iface).ok_or(NetworkError::NoUsableInterface);
    }

    let identity = interfaces
        .iter()
        .find_map(identity_of)
        .ok_or(NetworkError::NoUsableInterface)?;
    debug!("Host identity resolved to {} ({})", identity.addr, identity.mac);
    Ok(identity)
}

fn identity_of(iface: &NetworkInterface) -> Option<HostIdentity> {
    let ip = iface.addr.iter().find_map(|addr| match addr {
        Addr::V4(v4) if !v4.ip.is_loopback() => Some(v4.ip),
        _ => None,
    })?;
    Some(HostIdentity {
        addr: ip.to_string(),
        mac: iface.mac_addr.clone().unwrap_or_else(|| "unknown".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_interface_must_exist() {
        let result = discover_host_identity(Some("no-such-interface-0"));
        assert!(matches!(
            result,
            Err(NetworkError::InterfaceNotFound(_)) | Err(NetworkError::EnumerationFailed(_))
        ));
    }

    #[test]
    fn test_discovery_never_reports_loopback() {
        // Whether the environment has a usable interface varies; when it
        // does, the reported address must not be loopback.
        if let Ok(identity) = discover_host_identity(None) {
            let ip: std::net::Ipv4Addr = identity.addr.parse().unwrap();
            assert!(!ip.is_loopback());
        }
    }
}
