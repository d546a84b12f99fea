//! Status conditions attached to a resource's observed state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::meta::Time;

/// Kind of condition. Only `Succeeded` drives TaskRun terminality.
///
/// Other types written by other controllers are kept verbatim so the
/// snapshot still decodes and round-trips.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    /// Overall outcome of the run.
    Succeeded,
    /// Any other condition type.
    Other(String),
}

impl From<String> for ConditionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Succeeded" => Self::Succeeded,
            _ => Self::Other(s),
        }
    }
}

impl From<ConditionType> for String {
    fn from(t: ConditionType) -> Self {
        match t {
            ConditionType::Succeeded => "Succeeded".to_string(),
            ConditionType::Other(s) => s,
        }
    }
}

/// Tri-state value of a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    /// Still in progress, or not yet evaluated.
    #[default]
    Unknown,
}

/// A typed, timestamped status flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
}

impl Condition {
    /// Create a condition with no transition time yet.
    pub fn new(condition_type: ConditionType, status: ConditionStatus) -> Self {
        Self {
            condition_type,
            status,
            reason: String::new(),
            message: String::new(),
            last_transition_time: None,
        }
    }

    /// Succeeded=True.
    pub fn succeeded(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConditionType::Succeeded, ConditionStatus::True).with_reason(reason, message)
    }

    /// Succeeded=False.
    pub fn failed(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConditionType::Succeeded, ConditionStatus::False).with_reason(reason, message)
    }

    /// Succeeded=Unknown.
    pub fn running(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConditionType::Succeeded, ConditionStatus::Unknown).with_reason(reason, message)
    }

    /// Builder method to set reason and message.
    pub fn with_reason(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        self.reason = reason.into();
        self.message = message.into();
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }

    pub fn is_unknown(&self) -> bool {
        self.status == ConditionStatus::Unknown
    }

    fn same_state(&self, other: &Condition) -> bool {
        self.status == other.status && self.reason == other.reason && self.message == other.message
    }
}

/// Conditions keyed by type, at most one per type.
///
/// Serialized as a list to match the resource wire shape. When a list
/// carries duplicates of one type, the last entry wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct Conditions(BTreeMap<ConditionType, Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the condition of the given type.
    pub fn get(&self, condition_type: &ConditionType) -> Option<&Condition> {
        self.0.get(condition_type)
    }

    /// Shorthand for the Succeeded condition.
    pub fn succeeded(&self) -> Option<&Condition> {
        self.get(&ConditionType::Succeeded)
    }

    /// Set a condition, replacing any existing one of the same type.
    ///
    /// An update that does not change status, reason or message keeps the
    /// existing entry, so its transition time is preserved.
    pub fn set(&mut self, mut condition: Condition) {
        if let Some(existing) = self.0.get(&condition.condition_type) {
            if existing.same_state(&condition) {
                return;
            }
        }
        if condition.last_transition_time.is_none() {
            condition.last_transition_time = Some(Time::now());
        }
        self.0.insert(condition.condition_type.clone(), condition);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.values()
    }
}

impl From<Vec<Condition>> for Conditions {
    fn from(list: Vec<Condition>) -> Self {
        Self(
            list.into_iter()
                .map(|c| (c.condition_type.clone(), c))
                .collect(),
        )
    }
}

impl From<Conditions> for Vec<Condition> {
    fn from(conditions: Conditions) -> Self {
        conditions.0.into_values().collect()
    }
}
