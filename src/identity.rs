//! Resource identifiers that carry the region they live in.
//!
//! Two textual forms exist and are told apart by segment count alone:
//!
//! - regional: `<region>/<local_id>`
//! - composite: `<region>/<parent_id>/<leaf_name>`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("malformed identifier '{id}': expected {expected} segments, found {found}")]
    SegmentCount {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed identifier '{id}': empty segment")]
    EmptySegment { id: String },

    #[error("malformed identifier '{id}': not a UUID")]
    InvalidUuid { id: String },
}

impl IdentityError {
    /// The string that failed to decode.
    pub fn id(&self) -> &str {
        match self {
            IdentityError::SegmentCount { id, .. }
            | IdentityError::EmptySegment { id }
            | IdentityError::InvalidUuid { id } => id,
        }
    }
}

/// Common surface of the identifier forms, so resolution and polling can be
/// written once for every resource kind.
pub trait ResourceId:
    Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + Sized + 'static
{
    /// Strict decode of the canonical string form.
    fn parse(raw: &str) -> Result<Self, IdentityError>;

    /// Turns caller input into a canonical identifier, filling in the region
    /// when the input does not carry one.
    fn normalize(raw: &str, default_region: &str) -> Result<Self, IdentityError>;

    fn region(&self) -> &str;
}

pub fn encode_regional(region: &str, local_id: &str) -> String {
    format!("{region}{SEPARATOR}{local_id}")
}

pub fn decode_regional(raw: &str) -> Result<(String, String), IdentityError> {
    let [region, local_id] = split_exact::<2>(raw)?;
    Ok((region.to_string(), local_id.to_string()))
}

pub fn encode_composite(region: &str, parent_id: &str, leaf_name: &str) -> String {
    format!("{region}{SEPARATOR}{parent_id}{SEPARATOR}{leaf_name}")
}

pub fn decode_composite(raw: &str) -> Result<(String, String, String), IdentityError> {
    let [region, parent_id, leaf_name] = split_exact::<3>(raw)?;
    Ok((
        region.to_string(),
        parent_id.to_string(),
        leaf_name.to_string(),
    ))
}

fn split_exact<const N: usize>(raw: &str) -> Result<[&str; N], IdentityError> {
    let segments: Vec<&str> = raw.split(SEPARATOR).collect();
    let found = segments.len();
    let segments: [&str; N] =
        segments
            .try_into()
            .map_err(|_| IdentityError::SegmentCount {
                id: raw.to_string(),
                expected: N,
                found,
            })?;

    if segments.iter().any(|s| s.is_empty()) {
        return Err(IdentityError::EmptySegment {
            id: raw.to_string(),
        });
    }

    Ok(segments)
}

/// 8-4-4-4-12 hexadecimal, hyphen separated.
pub fn is_uuid(input: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let parts: Vec<&str> = input.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Accepts either a bare UUID or `<region>/<uuid>`.
pub fn validate_uuid_or_regional(input: &str) -> Result<(), IdentityError> {
    if input.contains(SEPARATOR) {
        return RegionalId::strict(input).map(|_| ());
    }

    if is_uuid(input) {
        Ok(())
    } else {
        Err(IdentityError::InvalidUuid {
            id: input.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionalId {
    region: String,
    local_id: String,
}

impl RegionalId {
    pub fn new(region: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            local_id: local_id.into(),
        }
    }

    /// Decodes and additionally requires the local part to be a UUID.
    pub fn strict(raw: &str) -> Result<Self, IdentityError> {
        let id = Self::parse(raw)?;
        if !is_uuid(&id.local_id) {
            return Err(IdentityError::InvalidUuid {
                id: raw.to_string(),
            });
        }
        Ok(id)
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }
}

impl ResourceId for RegionalId {
    fn parse(raw: &str) -> Result<Self, IdentityError> {
        let (region, local_id) = decode_regional(raw)?;
        Ok(Self { region, local_id })
    }

    fn normalize(raw: &str, default_region: &str) -> Result<Self, IdentityError> {
        if raw.contains(SEPARATOR) {
            return Self::parse(raw);
        }
        if raw.is_empty() || default_region.is_empty() {
            return Err(IdentityError::EmptySegment {
                id: encode_regional(default_region, raw),
            });
        }
        Ok(Self::new(default_region, raw))
    }

    fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for RegionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_regional(&self.region, &self.local_id))
    }
}

impl FromStr for RegionalId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A resource addressed by its parent plus a name unique within that parent,
/// e.g. a database inside an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeId {
    region: String,
    parent_id: String,
    leaf_name: String,
}

impl CompositeId {
    pub fn new(
        region: impl Into<String>,
        parent_id: impl Into<String>,
        leaf_name: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            parent_id: parent_id.into(),
            leaf_name: leaf_name.into(),
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    pub fn leaf_name(&self) -> &str {
        &self.leaf_name
    }

    pub fn parent(&self) -> RegionalId {
        RegionalId::new(self.region.clone(), self.parent_id.clone())
    }
}

impl ResourceId for CompositeId {
    fn parse(raw: &str) -> Result<Self, IdentityError> {
        let (region, parent_id, leaf_name) = decode_composite(raw)?;
        Ok(Self {
            region,
            parent_id,
            leaf_name,
        })
    }

    // NOTE: The region can't be defaulted here: a two-segment string is a
    // regional id, not a composite one missing its region.
    fn normalize(raw: &str, _default_region: &str) -> Result<Self, IdentityError> {
        Self::parse(raw)
    }

    fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_composite(
            &self.region,
            &self.parent_id,
            &self.leaf_name,
        ))
    }
}

impl FromStr for CompositeId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$ty as ResourceId>::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(RegionalId);
string_serde!(CompositeId);
