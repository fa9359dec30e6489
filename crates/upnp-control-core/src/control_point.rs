//! Invocation engine bound to one service's action table.

use crate::{ActionSignature, ActionTable, ControlPointError, parse_action_list};
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use upnp_control_protocol::{
    ArgMap, RequestAttributes, RequestOptions, SoapRequest, SoapTransport, to_wire_name,
};

/// Callable proxy for a single UPnP service.
///
/// Built once from a service description; the action table is immutable
/// afterwards, so a control point can be shared across tasks behind an `Arc`.
pub struct DeviceControlPoint {
    transport: Arc<dyn SoapTransport>,
    service_type: String,
    options: RequestOptions,
    actions: ActionTable,
}

impl fmt::Debug for DeviceControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceControlPoint")
            .field("service_type", &self.service_type)
            .field("actions", &self.actions.names())
            .finish()
    }
}

impl DeviceControlPoint {
    /// Parse `description` and build a control point for `service_type`.
    ///
    /// `options` are applied to every call and override the derived
    /// `SOAPACTION` and namespace attributes when set.
    pub fn new(
        transport: Arc<dyn SoapTransport>,
        service_type: impl Into<String>,
        description: &str,
        options: RequestOptions,
    ) -> Result<Self, ControlPointError> {
        let signatures = parse_action_list(description)?;
        Self::from_signatures(transport, service_type, signatures, options)
    }

    /// Build a control point from already parsed signatures.
    pub fn from_signatures(
        transport: Arc<dyn SoapTransport>,
        service_type: impl Into<String>,
        signatures: Vec<ActionSignature>,
        options: RequestOptions,
    ) -> Result<Self, ControlPointError> {
        let service_type = service_type.into();
        let actions = ActionTable::build(signatures)?;
        info!(
            "control point ready (service_type={}, actions={})",
            service_type,
            actions.len()
        );
        Ok(Self {
            transport,
            service_type,
            options,
            actions,
        })
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// Names of all invocable actions, in description order.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.names()
    }

    pub fn signature(&self, action: &str) -> Option<&ActionSignature> {
        self.actions.get(action)
    }

    pub fn signatures(&self) -> impl Iterator<Item = &ActionSignature> {
        self.actions.iter()
    }

    /// Invoke `action` with a map of input arguments.
    ///
    /// The result holds every declared output argument under its declared
    /// name. Outputs the device did not return are present as `Value::Null`
    /// rather than reported as an error.
    pub async fn invoke(&self, action: &str, input: Value) -> Result<ArgMap, ControlPointError> {
        self.invoke_with(action, input, &RequestOptions::default())
            .await
    }

    /// Invoke `action`, layering `overrides` over the control point's options.
    pub async fn invoke_with(
        &self,
        action: &str,
        input: Value,
        overrides: &RequestOptions,
    ) -> Result<ArgMap, ControlPointError> {
        let signature = self
            .actions
            .get(action)
            .ok_or_else(|| ControlPointError::UnknownAction(action.to_string()))?;
        let message = validate_input(signature, input)?;

        let mut attributes = RequestAttributes::for_action(&self.service_type, &signature.name);
        attributes.apply_options(&self.options.merged_with(overrides));

        debug!(
            "invoking action (name={}, args={:?})",
            signature.name,
            message.keys().collect::<Vec<_>>()
        );
        let request = SoapRequest {
            action: signature.name.clone(),
            attributes,
            message,
        };
        let response = self.transport.call(request).await.map_err(|err| {
            warn!("action call failed (name={}, error={})", signature.name, err);
            ControlPointError::from(err)
        })?;

        let result = unwrap_response_body(response.body)?;
        Ok(collect_outputs(signature, &result))
    }
}

/// Require a map whose keys are all declared inputs of `signature`.
fn validate_input(signature: &ActionSignature, input: Value) -> Result<ArgMap, ControlPointError> {
    let Value::Object(input) = input else {
        return Err(ControlPointError::InvalidArgumentType);
    };
    let unsupported = input
        .keys()
        .filter(|key| !signature.accepts(key))
        .cloned()
        .collect::<Vec<_>>();
    if !unsupported.is_empty() {
        return Err(ControlPointError::UnsupportedArguments {
            unsupported,
            supported: signature.input_args.clone(),
        });
    }
    Ok(input)
}

/// Strip the single `<ActionResponse>` wrapper from a decoded body.
fn unwrap_response_body(body: Value) -> Result<ArgMap, ControlPointError> {
    let Value::Object(body) = body else {
        return Err(ControlPointError::UnexpectedResponseShape {
            reason: "body is not a map",
            keys: Vec::new(),
        });
    };
    if body.len() != 1 {
        return Err(ControlPointError::UnexpectedResponseShape {
            reason: "expected exactly one top-level key",
            keys: body.keys().cloned().collect(),
        });
    }

    let mut entries = body.into_iter();
    match entries.next() {
        Some((_, Value::Object(result))) => Ok(result),
        // Decoders yield null or "" for an empty `<PlayResponse/>`.
        Some((_, Value::Null)) => Ok(ArgMap::new()),
        Some((_, Value::String(text))) if text.trim().is_empty() => Ok(ArgMap::new()),
        Some((wrapper, _)) => Err(ControlPointError::UnexpectedResponseShape {
            reason: "response wrapper is not a map",
            keys: vec![wrapper],
        }),
        None => Err(ControlPointError::UnexpectedResponseShape {
            reason: "expected exactly one top-level key",
            keys: Vec::new(),
        }),
    }
}

/// Map each declared output to the wire-named field of `result`.
fn collect_outputs(signature: &ActionSignature, result: &ArgMap) -> ArgMap {
    let mut output = ArgMap::new();
    for arg in &signature.output_args {
        let value = result.get(&to_wire_name(arg)).cloned().unwrap_or(Value::Null);
        output.insert(arg.clone(), value);
    }
    output
}
