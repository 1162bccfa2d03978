//! Notice data models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Meta key under which a scope's bucket is persisted.
pub const NOTICES_META_KEY: &str = "admin_notices";

/// Content object kinds that can carry their own notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Post,
    Comment,
    Term,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Post => "post",
            ObjectType::Comment => "comment",
            ObjectType::Term => "term",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(ObjectType::Post),
            "comment" => Some(ObjectType::Comment),
            "term" => Some(ObjectType::Term),
            _ => None,
        }
    }
}

/// Storage partition a bucket of notices belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Object {
        object_type: ObjectType,
        object_id: i64,
    },
}

impl Scope {
    /// Build an object scope, falling back to `Global` for non-positive ids.
    /// The fallback matches the original board constructor, which treats an
    /// invalid object reference as the global board rather than an error.
    pub fn for_object(object_type: ObjectType, object_id: i64) -> Self {
        if object_id > 0 {
            Scope::Object {
                object_type,
                object_id,
            }
        } else {
            Scope::Global
        }
    }

    /// Value of the `data-notice-object-type` attribute for this scope.
    pub fn object_type_attr(&self) -> &'static str {
        match self {
            Scope::Global => "option",
            Scope::Object { object_type, .. } => object_type.as_str(),
        }
    }

    /// Value of the `data-notice-object-id` attribute for this scope.
    pub fn object_id_attr(&self) -> i64 {
        match self {
            Scope::Global => -1,
            Scope::Object { object_id, .. } => *object_id,
        }
    }
}

/// Display severity of a notice. Unknown values fall back to `Info`, both
/// when parsing caller input and when decoding stored buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::parse(&s)
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }

    /// Parse a severity name, defaulting to `Info` for anything unknown.
    pub fn parse(s: &str) -> Self {
        match s {
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            "success" => Severity::Success,
            _ => Severity::Info,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "notice-info",
            Severity::Warning => "notice-warning",
            Severity::Error => "notice-error",
            Severity::Success => "notice-success",
        }
    }
}

fn default_dismissable() -> bool {
    true
}

/// A single advisory message record. This is the stable on-disk schema;
/// buckets are stored as JSON maps of key to this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub key: String,
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_dismissable")]
    pub dismissable: bool,
    /// Unix timestamp (seconds) captured when the notice was added.
    pub created_at: i64,
    /// Seconds until expiry; 0 means the notice never expires.
    #[serde(default)]
    pub ttl_seconds: i64,
}

impl Notice {
    /// A notice is expired iff it has a positive ttl and strictly more than
    /// `ttl_seconds` have elapsed since creation.
    pub fn is_expired(&self, now: i64) -> bool {
        self.ttl_seconds > 0 && now - self.created_at > self.ttl_seconds
    }
}

/// The full keyed collection of notices for one scope.
pub type NoticeBucket = HashMap<String, Notice>;
