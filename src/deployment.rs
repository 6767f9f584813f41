//! Deployment data model
//!
//! Wire types reported by the FaaS: deployment snapshots, the introspection
//! metadata describing each loaded code unit's callable surface, and the
//! manifests uploaded alongside a package blob. The client deserializes
//! introspection metadata; it never constructs it.

use std::collections::HashMap;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a deployment as reported by inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStatus {
    Create,
    Ready,
    Fail,
}

/// Log stream selector for the logs endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Job,
    Deploy,
}

/// Language identifier, the key of a deployment's package map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Node,
    Ts,
    Rb,
    Py,
    Cs,
    Cob,
    File,
    Rpc,
}

/// Value kind enumeration shared with the FaaS runtime.
///
/// Serialized as the bare integer discriminant; anything outside the known
/// range is rejected on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueId {
    Bool = 0,
    Char = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    String = 7,
    Buffer = 8,
    Array = 9,
    Map = 10,
    Ptr = 11,
    Future = 12,
    Function = 13,
    Null = 14,
    Class = 15,
    Object = 16,
    /// Sentinel: number of value kinds
    Size = 17,
    /// Sentinel: invalid value marker
    Invalid = 18,
}

impl ValueId {
    /// Value kind for a raw discriminant, if it is in range
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => ValueId::Bool,
            1 => ValueId::Char,
            2 => ValueId::Short,
            3 => ValueId::Int,
            4 => ValueId::Long,
            5 => ValueId::Float,
            6 => ValueId::Double,
            7 => ValueId::String,
            8 => ValueId::Buffer,
            9 => ValueId::Array,
            10 => ValueId::Map,
            11 => ValueId::Ptr,
            12 => ValueId::Future,
            13 => ValueId::Function,
            14 => ValueId::Null,
            15 => ValueId::Class,
            16 => ValueId::Object,
            17 => ValueId::Size,
            18 => ValueId::Invalid,
            _ => return None,
        })
    }
}

impl Serialize for ValueId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ValueId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        ValueId::from_raw(raw).ok_or_else(|| D::Error::custom(format!("invalid value id {raw}")))
    }
}

/// Named type of a value in a function signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueType {
    pub name: String,
    pub id: ValueId,
}

/// Return slot of a signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    pub ty: ValueType,
}

/// Named argument slot of a signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub ret: ReturnValue,
    pub args: Vec<Argument>,
}

/// A callable exposed by a loaded code unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    pub signature: Signature,
    #[serde(rename = "async")]
    pub is_async: bool,
}

/// Callable surface of one loaded code unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub funcs: Vec<Func>,
    pub classes: Vec<String>,
    pub objects: Vec<String>,
}

/// A loaded code unit and the surface it exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub name: String,
    pub scope: Scope,
}

/// Snapshot of one deployment as reported by inspect.
///
/// `suffix` is the lookup key; it is caller-chosen and assumed unique among
/// active deployments, so the first match is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub status: DeployStatus,
    pub prefix: String,
    pub suffix: String,
    pub version: String,
    pub packages: HashMap<LanguageId, Vec<Handle>>,
    pub ports: Vec<u16>,
}

/// Coordinates of a freshly accepted deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Create {
    pub suffix: String,
    pub prefix: String,
    pub version: String,
}

/// Per-language manifest sent with package uploads and repository adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub language_id: LanguageId,
    pub path: String,
    pub scripts: Vec<String>,
}

/// Which subscription backs which deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDeploy {
    pub id: String,
    pub plan: String,
    pub date: String,
    pub deploy: String,
}

/// Count of active subscriptions by identifier, derived client-side
pub type SubscriptionMap = HashMap<String, u32>;
