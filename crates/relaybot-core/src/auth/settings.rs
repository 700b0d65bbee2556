use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable device fingerprint fields (field name -> value).
///
/// Must survive re-logins for the same account, otherwise the platform sees
/// every login as a new device.
pub type DeviceIdentity = BTreeMap<String, String>;

/// Fields generated for a fresh device identity
const DEVICE_IDENTITY_FIELDS: [&str; 4] = ["uuid", "phone_id", "client_session_id", "advertising_id"];

/// Prefix the platform expects on Android device ids
const ANDROID_DEVICE_PREFIX: &str = "android-";

/// Serialized client state: auth tokens plus the device identity.
///
/// Opaque to everything but the platform client. Fields this crate does not
/// know about are kept in `extra` so a load/save cycle never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuids: Option<DeviceIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Settings holding nothing but a device identity
    pub fn with_device_identity(identity: DeviceIdentity) -> Self {
        Self {
            uuids: Some(identity),
            ..Self::default()
        }
    }

    pub fn device_identity(&self) -> Option<&DeviceIdentity> {
        self.uuids.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// Return the device identity, generating one first if none is set.
    pub fn ensure_device_identity(&mut self) -> &DeviceIdentity {
        self.uuids.get_or_insert_with(generate_device_identity)
    }
}

/// Generate a fresh random device identity
pub fn generate_device_identity() -> DeviceIdentity {
    let mut identity: DeviceIdentity = DEVICE_IDENTITY_FIELDS
        .iter()
        .map(|field| (field.to_string(), Uuid::new_v4().to_string()))
        .collect();

    let simple = Uuid::new_v4().simple().to_string();
    identity.insert(
        "android_device_id".to_string(),
        format!("{}{}", ANDROID_DEVICE_PREFIX, &simple[..16]),
    );
    identity
}
