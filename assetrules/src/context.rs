//! Execution context for one record event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields;
use crate::record::{Record, RecordId};
use crate::types::{AssetClass, ServiceClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Message {
    Create,
    Update,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "Create",
            Self::Update => "Update",
        })
    }
}

/// Pipeline stage the handler is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreOperation,
    PostOperation,
}

/// One create/update event as seen by a handler.
///
/// `target` carries only the attributes submitted with the change and may be
/// modified in place by pre-operation handlers. `pre_image` is the stored
/// record before the change, when the registration asked for one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub message: Message,
    pub stage: Stage,
    pub target: Record,
    #[serde(default)]
    pub pre_image: Option<Record>,
    /// Id assigned by a create, available to post-operation handlers.
    #[serde(default)]
    pub output_id: Option<RecordId>,
}

impl EventContext {
    pub fn new(message: Message, stage: Stage, target: Record) -> Self {
        Self {
            message,
            stage,
            target,
            pre_image: None,
            output_id: None,
        }
    }

    pub fn with_pre_image(mut self, pre_image: Record) -> Self {
        self.pre_image = Some(pre_image);
        self
    }

    pub fn with_output_id(mut self, id: RecordId) -> Self {
        self.output_id = Some(id);
        self
    }

    pub fn entity(&self) -> &str {
        &self.target.entity
    }

    /// Option value from the target, falling back to the pre-image when the
    /// target does not carry the attribute at all.
    pub fn resolve_option(&self, field: &str) -> Option<i32> {
        if self.target.contains(field) {
            self.target.option_value(field)
        } else {
            self.pre_image.as_ref().and_then(|image| image.option_value(field))
        }
    }

    pub fn asset_class(&self) -> Option<AssetClass> {
        self.resolve_option(fields::asset::ASSET_TYPE)
            .and_then(AssetClass::from_option_value)
    }

    pub fn service_class(&self) -> Option<ServiceClass> {
        self.resolve_option(fields::asset::SERVICE_TYPE)
            .and_then(ServiceClass::from_option_value)
    }
}
