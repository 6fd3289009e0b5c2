use super::namespace;
use super::user::UserId;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    BikeUser,
    BikeProvider,
}

impl ParticipantKind {
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::BikeUser => namespace::BIKE_USER,
            Self::BikeProvider => namespace::BIKE_PROVIDER,
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        let name = name
            .strip_prefix(namespace::PACKAGE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        match name {
            "BikeUser" => Some(Self::BikeUser),
            "BikeProvider" => Some(Self::BikeProvider),
            _ => None,
        }
    }
}

/// A typed reference to a participant of the network.
///
/// Two references denote the same participant iff their fully-qualified
/// identifiers match. The textual form is the fully-qualified identifier;
/// parsing also accepts the short `<Kind>#<id>` form and an optional
/// `resource:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantRef {
    kind: ParticipantKind,
    id: String,
}

impl ParticipantRef {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::BikeUser,
            id: id.into(),
        }
    }

    pub fn provider(id: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::BikeProvider,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fully_qualified(&self) -> String {
        namespace::qualify(self.kind.namespace(), &self.id)
    }

    /// The bike user this reference points at, if it points at one.
    pub fn user_id(&self) -> Option<UserId> {
        match self.kind {
            ParticipantKind::BikeUser => Some(UserId::new(self.id.clone())),
            ParticipantKind::BikeProvider => None,
        }
    }
}

impl fmt::Display for ParticipantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.namespace(), self.id)
    }
}

impl FromStr for ParticipantRef {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("resource:").unwrap_or(s);
        let (type_name, id) = s.split_once('#').ok_or_else(|| {
            LedgerError::InvalidRecord(format!("participant reference without '#': {s}"))
        })?;
        let kind = ParticipantKind::from_type_name(type_name).ok_or_else(|| {
            LedgerError::InvalidRecord(format!("unknown participant type: {type_name}"))
        })?;
        if id.is_empty() {
            return Err(LedgerError::InvalidRecord(format!(
                "participant reference with empty id: {s}"
            )));
        }
        Ok(Self {
            kind,
            id: id.to_string(),
        })
    }
}

impl TryFrom<String> for ParticipantRef {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParticipantRef> for String {
    fn from(participant: ParticipantRef) -> Self {
        participant.fully_qualified()
    }
}
