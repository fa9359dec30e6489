//! Command-line control point for a single UPnP service.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use upnp_control::config::{ControlPointConfig, LayeredConfigOptions};
use upnp_control::core::parse_action_list;
use upnp_control::protocol::ArgMap;
use upnp_control::soap::fetch_description;
use upnp_control::{ActionSignature, DeviceControlPoint, HttpSoapTransport};

/// Command-line options for the control point.
#[derive(Debug, Parser)]
#[command(name = "upnpctl", version, about = "Invoke actions on a UPnP service")]
struct Cli {
    /// Extra config file applied over user and cwd layers.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the actions declared by a service description.
    Actions {
        #[command(flatten)]
        service: ServiceArgs,
        /// Print signatures as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Invoke one action and print its outputs as JSON.
    Invoke {
        #[command(flatten)]
        service: ServiceArgs,
        /// Action name, e.g. `Browse`.
        action: String,
        /// Input argument as KEY=VALUE; repeatable.
        #[arg(long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
        /// Input arguments as a JSON object, merged before `--arg` values.
        #[arg(long)]
        input: Option<String>,
    },
}

/// Service selection; each flag overrides the matching config setting.
#[derive(Debug, Clone, Default, Args)]
struct ServiceArgs {
    /// Service description (SCPD) path or http(s) URL.
    #[arg(long)]
    description: Option<String>,
    /// Service type URN.
    #[arg(long)]
    service_type: Option<String>,
    /// Control URL actions are posted to.
    #[arg(long)]
    control_url: Option<String>,
    /// Per-call timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    upnp_control::init_logging();
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Actions { service, json } => {
            let config = load_config(cli.config.as_ref(), &service)?;
            let description = load_description(&client, config.require_description()?).await?;
            let signatures = parse_action_list(&description)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&signatures)?);
            } else {
                for signature in &signatures {
                    println!("{}", describe(signature));
                }
            }
        }
        Command::Invoke {
            service,
            action,
            args,
            input,
        } => {
            let config = load_config(cli.config.as_ref(), &service)?;
            let description = load_description(&client, config.require_description()?).await?;
            let transport = Arc::new(HttpSoapTransport::with_client(
                client.clone(),
                config.require_control_url()?,
            ));
            let control_point = DeviceControlPoint::new(
                transport,
                config.require_service_type()?,
                &description,
                config.request_options(),
            )?;

            let input = build_input(input.as_deref(), args)?;
            info!("invoking {action}");
            let output = control_point
                .invoke(&action, input)
                .await
                .with_context(|| format!("invoking {action}"))?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Load layered config and apply command-line overrides on top.
fn load_config(
    runtime_path: Option<&PathBuf>,
    service: &ServiceArgs,
) -> anyhow::Result<ControlPointConfig> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let mut options = LayeredConfigOptions::new(cwd);
    if let Some(path) = runtime_path {
        options = options.with_runtime_path(path);
    }
    let layered = ControlPointConfig::load_layered_with_options(options)?;
    debug!("config layers loaded: {:?}", layered.layers);
    Ok(apply_overrides(layered.config, service))
}

fn apply_overrides(mut config: ControlPointConfig, service: &ServiceArgs) -> ControlPointConfig {
    if let Some(description) = &service.description {
        config.service.description = Some(description.clone());
    }
    if let Some(service_type) = &service.service_type {
        config.service.service_type = Some(service_type.clone());
    }
    if let Some(control_url) = &service.control_url {
        config.service.control_url = Some(control_url.clone());
    }
    if service.timeout_ms.is_some() {
        config.request.timeout_ms = service.timeout_ms;
    }
    config
}

/// Read a description from a URL or a local file.
async fn load_description(client: &reqwest::Client, location: &str) -> anyhow::Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return fetch_description(client, location)
            .await
            .with_context(|| format!("fetching description from {location}"));
    }
    std::fs::read_to_string(location).with_context(|| format!("reading description {location}"))
}

/// Merge the JSON `--input` object with `--arg` pairs; pairs win.
fn build_input(json: Option<&str>, args: Vec<(String, String)>) -> anyhow::Result<Value> {
    let mut input = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("parsing --input")? {
            Value::Object(map) => map,
            _ => bail!("--input must be a JSON object"),
        },
        None => ArgMap::new(),
    };
    for (key, value) in args {
        input.insert(key, Value::String(value));
    }
    Ok(Value::Object(input))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn describe(signature: &ActionSignature) -> String {
    format!(
        "{}({}) -> ({})",
        signature.name,
        signature.input_args.join(", "),
        signature.output_args.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn key_value_pairs_split_on_first_equals() {
        assert_eq!(
            parse_key_value("Filter=dc:title,upnp:class=x"),
            Ok(("Filter".to_string(), "dc:title,upnp:class=x".to_string()))
        );
        assert_eq!(
            parse_key_value("SortCriteria="),
            Ok(("SortCriteria".to_string(), String::new()))
        );
        assert!(parse_key_value("=value").is_err());
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn input_merges_json_and_pairs() {
        let input = build_input(
            Some(r#"{ "InstanceID": 0, "Speed": "2" }"#),
            vec![("Speed".to_string(), "1".to_string())],
        )
        .expect("input");
        assert_eq!(input, json!({ "InstanceID": 0, "Speed": "1" }));
    }

    #[test]
    fn input_json_must_be_an_object() {
        assert!(build_input(Some("[1, 2]"), Vec::new()).is_err());
        assert_eq!(build_input(None, Vec::new()).expect("input"), json!({}));
    }

    #[test]
    fn flags_override_config() {
        let config = ControlPointConfig::builder()
            .service_type("urn:config")
            .control_url("http://config")
            .build();
        let service = ServiceArgs {
            control_url: Some("http://flag".to_string()),
            timeout_ms: Some(750),
            ..ServiceArgs::default()
        };

        let config = apply_overrides(config, &service);
        assert_eq!(config.service.service_type.as_deref(), Some("urn:config"));
        assert_eq!(config.service.control_url.as_deref(), Some("http://flag"));
        assert_eq!(config.request.timeout_ms, Some(750));
    }

    #[test]
    fn signature_description_lists_arguments() {
        let signature = ActionSignature {
            name: "GetMediaInfo".to_string(),
            input_args: vec!["InstanceID".to_string()],
            output_args: vec!["NrTracks".to_string(), "MediaDuration".to_string()],
        };
        assert_eq!(
            describe(&signature),
            "GetMediaInfo(InstanceID) -> (NrTracks, MediaDuration)"
        );
    }
}
