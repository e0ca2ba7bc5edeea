//! Hardware fingerprinting.
//!
//! The fingerprint is the SHA-256 digest of the physical addresses of every
//! operational network interface, concatenated in enumeration order, encoded
//! as URL-safe base64 without padding. It is stable while the set of active
//! interfaces is unchanged.

use crate::encoding::to_safe_base64;
use pnet_datalink::{MacAddr, NetworkInterface};
use sha2::{Digest, Sha256};
use tracing::debug;
use warden_types::HardwareId;

/// Computes the hardware id of this machine.
pub fn device_fingerprint() -> HardwareId {
    let interfaces = pnet_datalink::interfaces();
    debug!(interfaces = interfaces.len(), "computing device fingerprint");
    fingerprint_from_interfaces(&interfaces)
}

/// Computes a fingerprint from an enumerated interface list, keeping only
/// the operational interfaces that carry a physical address.
pub fn fingerprint_from_interfaces(interfaces: &[NetworkInterface]) -> HardwareId {
    let addresses: Vec<[u8; 6]> = interfaces
        .iter()
        .filter(|iface| is_operational(iface))
        .filter_map(|iface| iface.mac)
        .map(|MacAddr(a, b, c, d, e, f)| [a, b, c, d, e, f])
        .collect();
    fingerprint_from_addresses(addresses.iter().map(|mac| mac.as_slice()))
}

/// Whether `iface` is currently operational: enabled, with a link (carrier
/// present), and not loopback.
#[cfg(unix)]
pub fn is_operational(iface: &NetworkInterface) -> bool {
    iface.is_up() && iface.is_running() && !iface.is_loopback()
}

/// Whether `iface` is currently operational. pnet reports no interface
/// flags on this platform, so every enumerated interface counts.
#[cfg(not(unix))]
pub fn is_operational(iface: &NetworkInterface) -> bool {
    !iface.is_loopback()
}

/// Computes a fingerprint from an explicit list of physical addresses.
pub fn fingerprint_from_addresses<'a>(addresses: impl IntoIterator<Item = &'a [u8]>) -> HardwareId {
    let mut hasher = Sha256::new();
    for address in addresses {
        hasher.update(address);
    }
    HardwareId::new(to_safe_base64(&hasher.finalize()))
}
