//! Asset record rules.
//!
//! Identifier normalization and provisioning for asset records, plus the
//! record handlers that apply them when assets, yearly cycles and approval
//! requests are created or updated. Handlers talk to persistence through
//! [`RecordStore`] and report diagnostics through [`DiagnosticSink`].

pub mod config;
pub mod context;
pub mod errors;
pub mod fields;
pub mod handlers;
pub mod id;
pub mod normalizer;
pub mod provisioning;
pub mod record;
pub mod store;
pub mod trace;
pub mod types;

pub use config::Config;
pub use context::{EventContext, Message, Stage};
pub use errors::*;
pub use handlers::{DispatchReport, Dispatcher, HandlerOutcome, RecordHandler};
pub use normalizer::{NormalizationResult, normalize};
pub use provisioning::{Provision, ProvisionResult, provision_identifier};
pub use record::{EntityRef, FieldValue, Record, RecordId};
pub use store::{MemoryStore, Query, RecordStore};
pub use trace::{DiagnosticSink, LogSink, MemorySink};
pub use types::{AssetClass, IdentifierKind, ReadinessStatus, ServiceClass};
