use warden_server::{Denial, ProfileDirectory, ServerError};
use warden_types::{DeviceIdentity, HardwareId, Permissions, Profile, ProfileId};

fn operators() -> Profile {
    Profile::new(ProfileId::new(1), "operators")
        .with_permissions(Permissions::PING | Permissions::REQUEST_STATUS)
        .with_group(0)
        .unwrap()
        .with_group(63)
        .unwrap()
        .with_known_device(HardwareId::new("abc123"))
}

fn directory() -> ProfileDirectory {
    ProfileDirectory::new([operators(), Profile::new(ProfileId::new(2), "empty")])
}

fn assigned(id: &str, profile: u32) -> DeviceIdentity {
    DeviceIdentity::new(HardwareId::new(id), "device").with_profile(ProfileId::new(profile))
}

fn denial(result: Result<impl std::fmt::Debug, ServerError>) -> Denial {
    match result {
        Err(ServerError::AccessDenied(denial)) => denial,
        other => panic!("expected AccessDenied, got {other:?}"),
    }
}

#[test]
fn associated_device_with_permission_is_authorized() {
    let directory = directory();
    let profile = directory
        .authorize(&assigned("abc123", 1), Permissions::PING)
        .unwrap();
    assert_eq!(profile.name(), "operators");
}

#[test]
fn missing_permission_is_denied() {
    let denial = denial(directory().authorize(&assigned("abc123", 1), Permissions::SEND_AUDIO));
    assert_eq!(
        denial,
        Denial::MissingPermission {
            profile: ProfileId::new(1),
            permission: Permissions::SEND_AUDIO,
        }
    );
}

#[test]
fn unassigned_device_is_denied() {
    let device = DeviceIdentity::new(HardwareId::new("abc123"), "device");
    let denial = denial(directory().authorize(&device, Permissions::PING));
    assert_eq!(denial, Denial::Unassigned(HardwareId::new("abc123")));
}

#[test]
fn unknown_profile_is_denied() {
    let denial = denial(directory().authorize(&assigned("abc123", 9), Permissions::PING));
    assert_eq!(denial, Denial::UnknownProfile(ProfileId::new(9)));
}

#[test]
fn device_missing_from_allowlist_is_denied() {
    let denial = denial(directory().authorize(&assigned("xyz789", 1), Permissions::PING));
    assert_eq!(
        denial,
        Denial::NotAssociated {
            device: HardwareId::new("xyz789"),
            profile: ProfileId::new(1),
        }
    );
}

#[test]
fn group_membership_of_associated_device() {
    let directory = directory();
    let device = assigned("abc123", 1);
    assert!(directory.in_group(&device, 0).unwrap());
    assert!(directory.in_group(&device, 63).unwrap());
    assert!(!directory.in_group(&device, 5).unwrap());
}

#[test]
fn group_index_out_of_range() {
    let directory = directory();
    let device = assigned("abc123", 1);
    for index in [-1, 64] {
        assert!(matches!(
            directory.in_group(&device, index),
            Err(ServerError::Types(warden_types::Error::InvalidGroupId(i))) if i == index
        ));
    }
}

#[test]
fn group_query_requires_association() {
    let denial = denial(directory().in_group(&assigned("xyz789", 1), 0));
    assert!(matches!(denial, Denial::NotAssociated { .. }));
}

#[test]
fn denial_messages_name_the_subject() {
    let message = ServerError::AccessDenied(Denial::MissingPermission {
        profile: ProfileId::new(1),
        permission: Permissions::SEND_AUDIO,
    })
    .to_string();
    assert!(message.contains("access denied"));
    assert!(message.contains("send-audio"));
}

#[test]
fn lookup_by_id() {
    let directory = directory();
    assert_eq!(directory.len(), 2);
    assert_eq!(directory.get(ProfileId::new(2)).unwrap().name(), "empty");
    assert!(directory.get(ProfileId::new(3)).is_none());
}
