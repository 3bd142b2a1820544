//! JSON action dispatcher.
//!
//! Accepts a request object such as
//! `{"action": "add_message", "message": {"author": "ana", "content": "hi"}}`
//! and always answers with an [`ActionResponse`] envelope. Errors never
//! escape as panics or `Err`; they come back as `{"success": false, "error": ...}`.
//!
//! Supported actions (a missing `action` means `get_context`):
//!
//! | action | arguments | payload |
//! |--------|-----------|---------|
//! | `add_message` | `message` (required) | [`AddOutcome`] fields |
//! | `get_context` | none | `context` |
//! | `export` | `filepath` (optional) | `exported_path` |
//! | `import` | `filepath` (required) | `message` |
//!
//! Arguments are validated against each action's JSON Schema before they are
//! decoded, so malformed input is reported field by field.

use crate::error::{CompressorError, Result};
use crate::state::{AddOutcome, CompressorService, ContextView, StateStore};
use crate::{Message, json_schema_for};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

// ── Actions ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddMessage,
    GetContext,
    Export,
    Import,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::AddMessage,
        Action::GetContext,
        Action::Export,
        Action::Import,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::AddMessage => "add_message",
            Action::GetContext => "get_context",
            Action::Export => "export",
            Action::Import => "import",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// JSON Schema for the action's arguments.
    pub fn schema(self) -> Value {
        match self {
            Action::AddMessage => json_schema_for::<AddMessageArgs>(),
            Action::GetContext => json_schema_for::<GetContextArgs>(),
            Action::Export => json_schema_for::<ExportArgs>(),
            Action::Import => json_schema_for::<ImportArgs>(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Arguments ──────────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema, Debug)]
pub struct AddMessageArgs {
    /// The message to ingest.
    pub message: Option<Message>,
}

#[derive(Deserialize, JsonSchema, Debug)]
pub struct GetContextArgs {}

#[derive(Deserialize, JsonSchema, Debug)]
pub struct ExportArgs {
    /// Output file. Auto-named in the export directory when omitted.
    pub filepath: Option<String>,
}

#[derive(Deserialize, JsonSchema, Debug)]
pub struct ImportArgs {
    /// Exported context file to import.
    pub filepath: Option<String>,
}

// ── Response envelope ──────────────────────────────────────────────

#[derive(Serialize, Debug, Clone)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error class (`validation`, `empty_window`, `io`, `decode`, `encode`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(flatten)]
    pub payload: Option<ActionPayload>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum ActionPayload {
    Added(AddOutcome),
    Context { context: ContextView },
    Exported { exported_path: String },
    Imported { message: String },
}

impl ActionResponse {
    pub fn ok(payload: ActionPayload) -> Self {
        Self {
            success: true,
            error: None,
            error_kind: None,
            payload: Some(payload),
        }
    }

    pub fn failure(err: CompressorError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            payload: None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({"success": false, "error": format!("failed to encode response: {e}")})
        })
    }
}

// ── Dispatch ───────────────────────────────────────────────────────

/// Parse and run a raw JSON request.
pub fn run_action<S: StateStore>(service: &CompressorService<S>, request: &str) -> ActionResponse {
    match serde_json::from_str::<Value>(request) {
        Ok(value) => run_action_value(service, &value),
        Err(e) => ActionResponse::failure(CompressorError::decode(None, e)),
    }
}

/// Run an already-parsed JSON request.
pub fn run_action_value<S: StateStore>(
    service: &CompressorService<S>,
    request: &Value,
) -> ActionResponse {
    dispatch(service, request).unwrap_or_else(|e| {
        debug!("[action] failed: {e}");
        ActionResponse::failure(e)
    })
}

fn dispatch<S: StateStore>(service: &CompressorService<S>, request: &Value) -> Result<ActionResponse> {
    if !request.is_object() {
        return Err(CompressorError::Validation(
            "request must be a JSON object".into(),
        ));
    }
    let action = match request.get("action") {
        None | Some(Value::Null) => Action::GetContext,
        Some(Value::String(name)) => Action::from_name(name).ok_or_else(|| {
            CompressorError::Validation(format!("unsupported action: {name}"))
        })?,
        Some(other) => {
            return Err(CompressorError::Validation(format!(
                "action must be a string, got {other}"
            )));
        }
    };
    validate_arguments(action, request)?;
    info!("[action] {action}");

    let payload = match action {
        Action::AddMessage => {
            let args: AddMessageArgs = parse_args(request)?;
            let message = args
                .message
                .ok_or_else(|| CompressorError::Validation("missing message data".into()))?;
            ActionPayload::Added(service.add_message(message)?)
        }
        Action::GetContext => ActionPayload::Context {
            context: service.get_current_context()?,
        },
        Action::Export => {
            let args: ExportArgs = parse_args(request)?;
            let path = service.export_context(args.filepath.as_deref().map(Path::new))?;
            ActionPayload::Exported {
                exported_path: path.display().to_string(),
            }
        }
        Action::Import => {
            let args: ImportArgs = parse_args(request)?;
            let filepath = args
                .filepath
                .ok_or_else(|| CompressorError::Validation("missing file path".into()))?;
            service.import_context(Path::new(&filepath))?;
            ActionPayload::Imported {
                message: format!("context imported from {filepath}"),
            }
        }
    };

    Ok(ActionResponse::ok(payload))
}

/// Check `request` against the action's argument schema.
///
/// Every failing instance path is listed in the returned
/// [`CompressorError::Validation`].
pub fn validate_arguments(action: Action, request: &Value) -> Result<()> {
    let schema = action.schema();

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(_) => return Ok(()), // If schema itself is invalid, skip validation.
    };

    let errors: Vec<String> = validator
        .iter_errors(request)
        .map(|e| format!("{}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CompressorError::Validation(format!(
            "invalid arguments for '{action}': {}",
            errors.join("; ")
        )))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(request: &Value) -> Result<T> {
    T::deserialize(request).map_err(|e| CompressorError::Validation(e.to_string()))
}
