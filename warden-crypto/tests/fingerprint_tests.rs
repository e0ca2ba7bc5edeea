use pnet_datalink::{MacAddr, NetworkInterface};
use warden_crypto::{
    device_fingerprint, fingerprint_from_addresses, fingerprint_from_interfaces, from_safe_base64,
    is_operational,
};

// Interface flag bits shared by Linux and the BSDs.
const IFF_UP: u32 = 0x1;
const IFF_LOOPBACK: u32 = 0x8;
const IFF_RUNNING: u32 = 0x40;

fn interface(name: &str, mac: Option<[u8; 6]>, flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.to_string(),
        description: String::new(),
        index: 0,
        mac: mac.map(|[a, b, c, d, e, f]| MacAddr(a, b, c, d, e, f)),
        ips: Vec::new(),
        flags,
    }
}

#[test]
fn fingerprint_is_stable() {
    let fp1 = device_fingerprint();
    let fp2 = device_fingerprint();
    assert_eq!(fp1, fp2);
}

#[test]
fn fingerprint_is_url_safe_base64_of_sha256() {
    let fp = device_fingerprint();
    let text = fp.as_str();
    // 32 bytes → 43 base64 characters without padding.
    assert_eq!(text.len(), 43);
    assert!(!text.contains('='));
    assert!(!text.contains('+'));
    assert!(!text.contains('/'));
    assert_eq!(from_safe_base64(text).unwrap().len(), 32);
}

#[test]
fn empty_address_set_hashes_empty_input() {
    let fp = fingerprint_from_addresses(std::iter::empty());
    // SHA-256 of the empty string.
    assert_eq!(fp.as_str(), "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU");
}

#[test]
fn different_address_sets_differ() {
    let a = [0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E];
    let b = [0x00, 0x1A, 0x2B, 0x3C, 0x4D, 0x5F];
    let fp_a = fingerprint_from_addresses([a.as_slice()]);
    let fp_b = fingerprint_from_addresses([b.as_slice()]);
    assert_ne!(fp_a, fp_b);
}

#[test]
fn enumeration_order_matters() {
    let a = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let b = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
    let ab = fingerprint_from_addresses([a.as_slice(), b.as_slice()]);
    let ba = fingerprint_from_addresses([b.as_slice(), a.as_slice()]);
    assert_ne!(ab, ba);
}

#[test]
fn addresses_are_concatenated() {
    let a = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
    let b = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
    let split = fingerprint_from_addresses([a.as_slice(), b.as_slice()]);
    let joined: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
    assert_eq!(split, fingerprint_from_addresses([joined.as_slice()]));
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
#[test]
fn only_running_non_loopback_interfaces_are_operational() {
    let mac = Some([0x02, 0, 0, 0, 0, 1]);
    assert!(is_operational(&interface("eth0", mac, IFF_UP | IFF_RUNNING)));
    // Administratively up but no carrier.
    assert!(!is_operational(&interface("veth0", mac, IFF_UP)));
    assert!(!is_operational(&interface("eth1", mac, 0)));
    assert!(!is_operational(&interface("lo", None, IFF_UP | IFF_RUNNING | IFF_LOOPBACK)));
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
#[test]
fn interface_without_carrier_does_not_change_fingerprint() {
    let eth0 = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let veth = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
    let running = vec![
        interface("lo", None, IFF_UP | IFF_RUNNING | IFF_LOOPBACK),
        interface("eth0", Some(eth0), IFF_UP | IFF_RUNNING),
    ];
    let mut with_dead_link = running.clone();
    with_dead_link.push(interface("veth0", Some(veth), IFF_UP));

    let expected = fingerprint_from_addresses([eth0.as_slice()]);
    assert_eq!(fingerprint_from_interfaces(&running), expected);
    assert_eq!(fingerprint_from_interfaces(&with_dead_link), expected);
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
#[test]
fn interfaces_without_address_are_skipped() {
    let eth0 = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let interfaces = vec![
        interface("tun0", None, IFF_UP | IFF_RUNNING),
        interface("eth0", Some(eth0), IFF_UP | IFF_RUNNING),
    ];
    assert_eq!(
        fingerprint_from_interfaces(&interfaces),
        fingerprint_from_addresses([eth0.as_slice()])
    );
}
