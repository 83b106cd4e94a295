use std::borrow::Cow;

use thiserror::Error;

use crate::record::RecordId;

/// Errors raised by a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id exists for the entity.
    #[error("{entity} record {id} not found")]
    NotFound { entity: String, id: RecordId },

    /// A record was rejected by the store.
    #[error("invalid record: {message}")]
    InvalidRecord { message: Cow<'static, str> },

    /// The store refused the operation.
    #[error("store unavailable: {message}")]
    Unavailable { message: Cow<'static, str> },
}

/// Top-level error type returned by record handlers.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The event does not match what the handler reacts to.
    #[error("not applicable: {reason}")]
    NotApplicable { reason: Cow<'static, str> },

    /// Reading a record or query result from the store failed.
    #[error("failed to read {entity}: {source}")]
    UpstreamReadFailed {
        entity: String,
        #[source]
        source: StoreError,
    },

    /// Creating, updating or deleting a record failed.
    #[error("failed to write {entity}: {source}")]
    UpstreamWriteFailed {
        entity: String,
        #[source]
        source: StoreError,
    },
}

impl RuleError {
    pub fn not_applicable(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::NotApplicable { reason: reason.into() }
    }

    pub fn read(entity: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let entity = entity.into();
        move |source| Self::UpstreamReadFailed { entity, source }
    }

    pub fn write(entity: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let entity = entity.into();
        move |source| Self::UpstreamWriteFailed { entity, source }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable { .. })
    }
}

/// A handler failure that aborts the triggering event.
#[derive(Debug, Error)]
#[error("{handler} failed: {source}")]
pub struct DispatchError {
    pub handler: &'static str,
    #[source]
    pub source: RuleError,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown handler '{name}' in [handlers].enabled")]
    UnknownHandler { name: String },
}

pub type RuleResult<T> = Result<T, RuleError>;
