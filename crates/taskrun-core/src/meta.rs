//! Kubernetes-style object metadata shared by all resources.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// API version stamped on owner references created by the control plane.
pub const PIPELINE_API_VERSION: &str = "tekton.dev/v1alpha1";

/// Standard object metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Name, unique within the namespace.
    #[serde(default)]
    pub name: String,

    /// Namespace the object lives in.
    #[serde(default)]
    pub namespace: String,

    /// Server-assigned unique id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    /// Membership tags. Not part of identity.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Back-references to the objects that created this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Create metadata for a named object.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// First owner reference of the given kind, in list order.
    pub fn owner_of_kind(&self, kind: &str) -> Option<&OwnerReference> {
        self.owner_references.iter().find(|owner| owner.kind == kind)
    }

    /// Look up a label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Weak reference to an owning object.
///
/// This is lookup metadata only. Nothing about the owner's lifetime is
/// implied by holding one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

impl OwnerReference {
    /// Create a bare reference carrying only kind and name.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Controller reference to a PipelineRun, as set when the pipeline
    /// creates its TaskRuns.
    pub fn pipeline_run(name: impl Into<String>) -> Self {
        Self {
            api_version: PIPELINE_API_VERSION.to_string(),
            kind: crate::ownership::PIPELINE_RUN_KIND.to_string(),
            name: name.into(),
            uid: String::new(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }

    /// Builder method to set the owner's uid.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Returns true if this reference is flagged as the managing controller.
    pub fn is_controller(&self) -> bool {
        self.controller.unwrap_or(false)
    }
}

/// Reference to a specific object by kind and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Timestamp with an explicit zero value.
///
/// A zero `Time` is distinct from an absent one at the type level
/// (`Some(Time::zero())` vs `None`), but both mean "never happened".
/// Zero serializes as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(Option<DateTime<Utc>>);

impl Time {
    /// The zero timestamp.
    pub fn zero() -> Self {
        Self(None)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Some(Utc::now()))
    }

    /// Returns true for the zero timestamp.
    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// The underlying instant, unless zero.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(t: DateTime<Utc>) -> Self {
        Self(Some(t))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => write!(f, "<zero>"),
        }
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(t) => serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(Self)
    }
}
