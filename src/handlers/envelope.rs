//! Inbound request envelopes and the mutation argument union.
//!
//! The gateway delivers `{ callerIdentity, arguments }` for queries and
//! `{ callerIdentity, arguments, operation }` for mutations. The mutation
//! argument shapes overlap structurally, so they are only ever decoded after
//! the `operation` tag has picked one.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::ResolverError;
use crate::record::{Record, RecordPatch};

/// Opaque caller identity forwarded by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(pub Value);

impl CallerIdentity {
    /// Subject claim for log correlation, when the identity carries one.
    pub fn subject(&self) -> Option<&str> {
        ["sub", "username"]
            .iter()
            .find_map(|claim| self.0.get(*claim)?.as_str())
    }
}

/// Query arguments. A missing `id` matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub id: Option<String>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

/// Query request envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEnvelope {
    #[serde(default)]
    pub caller_identity: Option<CallerIdentity>,
    /// Gateway-native spelling of the caller identity. Both may be present.
    #[serde(default)]
    pub identity: Option<CallerIdentity>,
    #[serde(default)]
    arguments: Option<RecordFilter>,
}

impl QueryEnvelope {
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            arguments: Some(filter),
            ..Self::default()
        }
    }

    /// `callerIdentity` when present, otherwise `identity`.
    pub fn caller(&self) -> Option<&CallerIdentity> {
        self.caller_identity.as_ref().or(self.identity.as_ref())
    }

    pub fn from_value(event: Value) -> Result<Self, ResolverError> {
        serde_json::from_value(event)
            .map_err(|e| ResolverError::MalformedArguments(format!("query envelope: {}", e)))
    }

    pub fn filter(&self) -> RecordFilter {
        self.arguments.clone().unwrap_or_default()
    }
}

/// Mutation request envelope as delivered, before classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEnvelope {
    #[serde(default)]
    pub caller_identity: Option<CallerIdentity>,
    #[serde(default)]
    pub identity: Option<CallerIdentity>,
    #[serde(default)]
    pub arguments: Value,
    /// Raw operation tag. Anything other than a known string is rejected.
    #[serde(default)]
    pub operation: Option<Value>,
}

impl MutationEnvelope {
    /// Decode a mutation event.
    ///
    /// An event that cannot be decoded is still judged by its tag first, so
    /// a non-object event or one without a usable tag is `InvalidOperation`.
    pub fn from_value(event: Value) -> Result<Self, ResolverError> {
        MutationEnvelope::deserialize(&event).map_err(|e| {
            match Operation::classify(event.get("operation")) {
                Err(invalid) => invalid,
                Ok(_) => ResolverError::MalformedArguments(format!("mutation envelope: {}", e)),
            }
        })
    }

    /// `callerIdentity` when present, otherwise `identity`.
    pub fn caller(&self) -> Option<&CallerIdentity> {
        self.caller_identity.as_ref().or(self.identity.as_ref())
    }
}

/// Mutation operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Match a tag case-insensitively.
    pub fn parse(tag: &str) -> Option<Self> {
        [Operation::Create, Operation::Update, Operation::Delete]
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(tag))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    /// Classify a raw tag. Absent, non-string or unknown tags are rejected.
    pub fn classify(tag: Option<&Value>) -> Result<Self, ResolverError> {
        match tag {
            Some(Value::String(s)) => Operation::parse(s).ok_or_else(|| {
                ResolverError::InvalidOperation {
                    tag: Some(s.clone()),
                }
            }),
            Some(Value::Null) | None => Err(ResolverError::InvalidOperation { tag: None }),
            Some(other) => Err(ResolverError::InvalidOperation {
                tag: Some(other.to_string()),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a new record. All required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInput {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<CreateInput> for Record {
    fn from(input: CreateInput) -> Self {
        Record {
            id: input.id,
            name: input.name,
            email: input.email,
        }
    }
}

/// Partial update. Omitted fields keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateInput {
    pub fn patch(&self) -> RecordPatch {
        RecordPatch {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateArgs {
    pub input: CreateInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateArgs {
    pub input: UpdateInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteArgs {
    pub id: String,
}

/// A classified mutation: the argument shape selected by the operation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Create(CreateInput),
    Update(UpdateInput),
    Delete(DeleteArgs),
}

impl MutationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            MutationRequest::Create(_) => Operation::Create,
            MutationRequest::Update(_) => Operation::Update,
            MutationRequest::Delete(_) => Operation::Delete,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MutationRequest::Create(input) => &input.id,
            MutationRequest::Update(input) => &input.id,
            MutationRequest::Delete(args) => &args.id,
        }
    }

    /// Classify by tag, then decode `arguments` as the shape the tag names.
    ///
    /// The tag is checked first: an unknown tag is rejected without looking
    /// at the arguments at all.
    pub fn classify(envelope: MutationEnvelope) -> Result<Self, ResolverError> {
        let operation = Operation::classify(envelope.operation.as_ref())?;
        let arguments = envelope.arguments;

        let request = match operation {
            Operation::Create => MutationRequest::Create(decode::<CreateArgs>(operation, arguments)?.input),
            Operation::Update => MutationRequest::Update(decode::<UpdateArgs>(operation, arguments)?.input),
            Operation::Delete => MutationRequest::Delete(decode::<DeleteArgs>(operation, arguments)?),
        };

        if request.id().is_empty() {
            return Err(ResolverError::MalformedArguments(format!(
                "{} arguments: id must not be empty",
                operation
            )));
        }

        Ok(request)
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    operation: Operation,
    arguments: Value,
) -> Result<T, ResolverError> {
    serde_json::from_value(arguments)
        .map_err(|e| ResolverError::MalformedArguments(format!("{} arguments: {}", operation, e)))
}
