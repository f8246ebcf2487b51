use anyhow::Context;
use colored::Colorize;
use std::path::Path;

use prims_dispatch::{ErrorEnvelope, OperationRegistry};
use prims_server::{PrimsServer, ServerConfig};
use serde_json::{json, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let registry = OperationRegistry::standard(config.dispatch.clone());
    let format = cli.format;
    match cli.command {
        Command::Call(args) => {
            let value: Value = serde_json::from_str(&args.args)
                .context("--args must be a JSON argument object")?;
            invoke(&registry, &args.operation, value, format)
        }
        Command::Ops => cmd_ops(&registry, format),
        Command::Hash(args) => invoke(
            &registry,
            "hash",
            json!({
                "data": args.data,
                "algorithm": args.algorithm,
                "encoding": args.encoding,
            }),
            format,
        ),
        Command::Keygen(args) => invoke(&registry, args.scheme.keygen_operation(), json!({}), format),
        Command::Uuid => invoke(&registry, "random_uuid", json!({}), format),
        Command::Serve(args) => cmd_serve(config, args),
    }
}

/// Run one operation through the registry and print the outcome.
fn invoke(
    registry: &OperationRegistry,
    operation: &str,
    args: Value,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match registry.dispatch(operation, args) {
        Ok(out) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&out)?),
                OutputFormat::Text => {
                    println!("{} {}", "✓".green().bold(), operation.bold());
                    for line in render_text(&out) {
                        println!("{line}");
                    }
                }
            }
            Ok(())
        }
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&ErrorEnvelope::from(&e))?);
            }
            Err(anyhow::anyhow!("{operation}: {e} [{}]", e.code()))
        }
    }
}

fn cmd_ops(registry: &OperationRegistry, format: OutputFormat) -> anyhow::Result<()> {
    let ops = registry.operations();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ops)?),
        OutputFormat::Text => {
            let width = ops.iter().map(|o| o.name.len()).max().unwrap_or(0);
            for op in &ops {
                println!("  {:width$}  {}", op.name.cyan(), op.description);
            }
        }
    }
    Ok(())
}

/// Settings from `--config`, or the defaults when no file is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    println!("prims server on {}", config.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(PrimsServer::new(config).serve())?;
    Ok(())
}

/// One `key: value` line per field of a result object.
fn render_text(value: &Value) -> Vec<String> {
    match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, field)| format!("  {}: {}", key.dimmed(), render_scalar(field)))
            .collect(),
        other => vec![format!("  {}", render_scalar(other))],
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "true".green().to_string(),
        Value::Bool(false) => "false".red().to_string(),
        other => other.to_string(),
    }
}
