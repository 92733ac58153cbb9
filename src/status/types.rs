use crate::status::decode::{bool_string, int_string, null_as_default, string_int};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A hostname entry reported by a node; only used to discover neighbors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub name: String,
}

/// A network interface on a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    pub mac: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// Summary of the node's mesh radio
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshRf {
    pub ssid: String,
    #[serde(deserialize_with = "string_int", serialize_with = "int_string")]
    pub channel: i64,
    pub status: String,
    #[serde(rename = "freq")]
    pub frequency: String,
    #[serde(rename = "chanbw")]
    pub channel_bandwidth: String,
}

/// Hardware and firmware details of a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDetails {
    pub description: String,
    pub model: String,
    /// Sent as the string `"1"` when the node is an internet gateway
    #[serde(deserialize_with = "bool_string")]
    pub mesh_gateway: bool,
    pub mesh_supernode: bool,
    pub board_id: String,
    #[serde(rename = "firmware_mfg")]
    pub firmware_manufacturer: String,
    pub firmware_version: String,
}

/// Classification of an OLSR link
///
/// Only the tunnel flavors matter to the map; every other wire value
/// (`RF`, `DTD`, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkType {
    Tunnel,
    Wireguard,
    Supernode,
    Other(String),
}

impl LinkType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tunnel => "TUN",
            Self::Wireguard => "WIREGUARD",
            Self::Supernode => "SUPER",
            Self::Other(s) => s,
        }
    }

    /// Returns true for tunnel links that get relabeled on supernodes
    pub fn is_tunnel(&self) -> bool {
        matches!(self, Self::Tunnel | Self::Wireguard)
    }
}

impl Default for LinkType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for LinkType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TUN" => Self::Tunnel,
            "WIREGUARD" => Self::Wireguard,
            "SUPER" => Self::Supernode,
            _ => Self::Other(s),
        }
    }
}

impl From<LinkType> for String {
    fn from(link_type: LinkType) -> Self {
        match link_type {
            LinkType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics for one OLSR link as reported by `link_info=1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkInfo {
    pub hello_time: i64,
    pub lost_link_time: i64,
    pub link_quality: f64,
    pub vtime: i64,
    pub link_cost: f64,
    pub link_type: LinkType,
    pub hostname: String,
    pub previous_link_status: String,
    pub current_link_status: String,
    pub neighbor_link_quality: f64,
    pub symmetry_time: f64,
    #[serde(rename = "seqnoValid")]
    pub sequence_number_valid: bool,
    pub pending: bool,
    pub loss_hello_interval: i64,
    pub loss_multiplier: i64,
    pub hysteresis: i64,
    #[serde(rename = "seqno")]
    pub sequence_number: i64,
    pub loss_time: i64,
    pub validity_time: i64,
    #[serde(rename = "olsrInterface")]
    pub olsr_interface: String,
    pub last_hello_time: i64,
    pub asymmetry_time: f64,
}

/// The full status record served by a node's `sysinfo.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    pub node: String,
    #[serde(rename = "lastseen")]
    pub last_seen: String,
    /// Empty when the node has no configured location
    pub lat: String,
    /// Empty when the node has no configured location
    pub lon: String,
    #[serde(rename = "meshrf")]
    pub mesh_rf: MeshRf,
    #[serde(
        rename = "chanbw",
        deserialize_with = "string_int",
        serialize_with = "int_string"
    )]
    pub channel_bandwidth: i64,
    pub node_details: NodeDetails,
    #[serde(deserialize_with = "null_as_default")]
    pub interfaces: Vec<Interface>,
    #[serde(deserialize_with = "null_as_default")]
    pub link_info: BTreeMap<String, LinkInfo>,
    /// Link quality telemetry; no fixed schema, passed through as-is
    #[serde(deserialize_with = "null_as_default")]
    pub lqm: serde_json::Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub hosts: Vec<Host>,
}

impl NodeStatus {
    /// Returns true if the node reports both coordinates
    pub fn is_mapped(&self) -> bool {
        !self.lat.is_empty() && !self.lon.is_empty()
    }

    /// Iterates over the host names the node reports
    pub fn host_names(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(|h| h.name.as_str())
    }
}
