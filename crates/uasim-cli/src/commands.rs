use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde_json::json;
use tracing::info;
use uasim_dispatch::{ReadValueId, WriteValue};
use uasim_server::{ServerConfig, UaServer};
use uasim_types::{ids, AttributeId, DataValue, Identity, NodeId, StatusCode, TimestampsToReturn, Variant};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let server = start(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Namespaces => cmd_namespaces(&server, format),
        Command::Browse(args) => cmd_browse(&server, format, args),
        Command::Read(args) => cmd_read(&server, format, args),
        Command::Write(args) => cmd_write(&server, format, args),
        Command::Call(args) => cmd_call(&server, format, args),
        Command::CheckReferences => cmd_check_references(&server, format),
        Command::Serve => cmd_serve(&server),
    }
}

fn start(cli: &Cli) -> anyhow::Result<UaServer> {
    let config = match &cli.config {
        Some(path) => ServerConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    UaServer::start(config).context("starting server")
}

fn parse_node_id(text: &str) -> anyhow::Result<NodeId> {
    text.parse().with_context(|| format!("invalid node id {text:?}"))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_text(status: StatusCode) -> colored::ColoredString {
    if status.is_good() {
        status.to_string().green()
    } else {
        status.to_string().red()
    }
}

fn reference_type_name(id: &NodeId) -> String {
    let known = [
        (ids::ORGANIZES, "Organizes"),
        (ids::HAS_COMPONENT, "HasComponent"),
        (ids::HAS_PROPERTY, "HasProperty"),
        (ids::HAS_SUBTYPE, "HasSubtype"),
        (ids::HAS_TYPE_DEFINITION, "HasTypeDefinition"),
        (ids::HAS_ENCODING, "HasEncoding"),
    ];
    known
        .iter()
        .find(|(known_id, _)| known_id == id)
        .map_or_else(|| id.to_string(), |(_, name)| (*name).to_string())
}

fn cmd_namespaces(server: &UaServer, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let namespaces: Vec<_> = server
                .namespaces()
                .iter()
                .map(|(index, uri)| {
                    let summary = server.summaries().iter().find(|s| s.namespace == index);
                    json!({ "index": index, "uri": uri, "summary": summary })
                })
                .collect();
            print_json(&namespaces)
        }
        OutputFormat::Text => {
            for (index, uri) in server.namespaces().iter() {
                print!("{:>3}  {}", index.to_string().bold(), uri.cyan());
                match server.summaries().iter().find(|s| s.namespace == index) {
                    Some(s) => println!("  root {} ({} nodes)", s.root.to_string().yellow(), s.nodes_added),
                    None => println!(),
                }
            }
            Ok(())
        }
    }
}

fn cmd_browse(server: &UaServer, format: OutputFormat, args: BrowseArgs) -> anyhow::Result<()> {
    let node_id = parse_node_id(&args.node_id)?;
    let references = server.dispatcher().browse(&node_id)?;
    match format {
        OutputFormat::Json => {
            let refs: Vec<_> = references
                .iter()
                .map(|r| {
                    json!({
                        "reference_type": reference_type_name(&r.reference_type),
                        "target": r.target.to_string(),
                        "target_class": format!("{:?}", r.target_class),
                        "is_forward": r.is_forward,
                    })
                })
                .collect();
            print_json(&refs)
        }
        OutputFormat::Text => {
            println!("{} ({} references)", node_id.to_string().bold(), references.len());
            for r in &references {
                let arrow = if r.is_forward { "->".green() } else { "<-".blue() };
                println!(
                    "  {} {:<18} {} {}",
                    arrow,
                    reference_type_name(&r.reference_type),
                    r.target.to_string().yellow(),
                    format!("({:?})", r.target_class).dimmed()
                );
            }
            Ok(())
        }
    }
}

fn cmd_read(server: &UaServer, format: OutputFormat, args: ReadArgs) -> anyhow::Result<()> {
    let node_id = parse_node_id(&args.node_id)?;
    let attribute = AttributeId::from_name(&args.attribute)
        .ok_or_else(|| anyhow!("unknown attribute {:?}", args.attribute))?;
    let identity = args.identity.as_deref().map_or(Identity::Anonymous, Identity::from);

    let mut values = server.dispatcher().read(
        &identity,
        0.0,
        TimestampsToReturn::Both,
        &[ReadValueId::new(node_id.clone(), attribute)],
    );
    let value = values.remove(0);

    match format {
        OutputFormat::Json => print_json(&value)?,
        OutputFormat::Text => print_data_value(&node_id, attribute, &value),
    }
    if !value.is_good() {
        bail!("read of {node_id} failed: {}", value.status);
    }
    Ok(())
}

fn print_data_value(node_id: &NodeId, attribute: AttributeId, value: &DataValue) {
    let shown = value
        .value
        .as_ref()
        .map_or_else(|| "(no value)".dimmed().to_string(), |v| v.to_string());
    println!("{} {} = {}", node_id.to_string().bold(), attribute.to_string().cyan(), shown);
    println!("  status: {}", status_text(value.status));
    if let Some(ts) = value.source_timestamp {
        println!("  source: {}", ts.to_rfc3339().dimmed());
    }
    if let Some(ts) = value.server_timestamp {
        println!("  server: {}", ts.to_rfc3339().dimmed());
    }
}

fn cmd_write(server: &UaServer, format: OutputFormat, args: WriteArgs) -> anyhow::Result<()> {
    let node_id = parse_node_id(&args.node_id)?;
    let identity = args.identity.as_deref().map_or(Identity::Anonymous, Identity::from);

    let reply = server
        .dispatcher()
        .read(
            &identity,
            0.0,
            TimestampsToReturn::Neither,
            &[ReadValueId::new(node_id.clone(), AttributeId::DataType)],
        )
        .remove(0);
    let status = reply.status;
    let Some(Variant::NodeId(data_type)) = reply.value else {
        bail!("{node_id} has no DataType ({status})");
    };
    let value = Variant::parse_as(&data_type, &args.value)
        .with_context(|| format!("parsing {:?} for {node_id}", args.value))?;

    let outcome = server
        .dispatcher()
        .write(&identity, &[WriteValue::value(node_id.clone(), value)])
        .remove(0);

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Text if outcome.is_good() => {
            println!("{} Wrote {} to {}", "✓".green().bold(), args.value.bold(), node_id.to_string().yellow());
        }
        OutputFormat::Text => {
            println!("{} Write to {} rejected: {}", "✗".red().bold(), node_id.to_string().yellow(), status_text(outcome.status));
            if let Some(reason) = &outcome.reason {
                println!("  {reason}");
            }
        }
    }
    if !outcome.is_good() {
        bail!("write to {node_id} failed: {}", outcome.status);
    }
    Ok(())
}

fn cmd_call(server: &UaServer, format: OutputFormat, args: CallArgs) -> anyhow::Result<()> {
    let object_id = parse_node_id(&args.object_id)?;
    let method_id = parse_node_id(&args.method_id)?;
    let identity = args.identity.as_deref().map_or(Identity::Anonymous, Identity::from);

    let method = server
        .space()
        .get(&method_id)
        .and_then(|node| node.as_method())
        .ok_or_else(|| anyhow!("{method_id} is not a method"))?;

    // Arguments beyond the declared ones are passed as strings and rejected
    // by the dispatcher's count check.
    let mut inputs = Vec::with_capacity(args.args.len());
    for (i, text) in args.args.iter().enumerate() {
        let value = match method.input_arguments.get(i) {
            Some(arg) => Variant::parse_as(&arg.data_type, text)
                .with_context(|| format!("argument {} ({})", i, arg.name))?,
            None => Variant::from(text.as_str()),
        };
        inputs.push(value);
    }

    let result = server.dispatcher().call(&identity, &object_id, &method_id, &inputs);
    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            println!("{} {}", method_id.to_string().bold(), status_text(result.status));
            for (arg, value) in method.output_arguments.iter().zip(&result.output_arguments) {
                println!("  {} = {}", arg.name.cyan(), value);
            }
        }
    }
    if result.status.is_bad() {
        bail!("call of {method_id} failed: {}", result.status);
    }
    Ok(())
}

fn cmd_check_references(server: &UaServer, format: OutputFormat) -> anyhow::Result<()> {
    let asymmetries = server.space().asymmetric_references(None);
    match format {
        OutputFormat::Json => {
            let listed: Vec<_> = asymmetries.iter().map(ToString::to_string).collect();
            print_json(&listed)?;
        }
        OutputFormat::Text if asymmetries.is_empty() => {
            println!("{} All references are symmetric ({} nodes)", "✓".green().bold(), server.space().len());
        }
        OutputFormat::Text => {
            for a in &asymmetries {
                println!("  {} {}", "✗".red(), a);
            }
        }
    }
    if !asymmetries.is_empty() {
        bail!("{} asymmetric references", asymmetries.len());
    }
    Ok(())
}

fn cmd_serve(server: &UaServer) -> anyhow::Result<()> {
    let config = server.config();
    println!(
        "{} {} ready on port {} ({} namespaces, {} nodes)",
        "✓".green().bold(),
        config.application_name.bold(),
        config.bind_port,
        server.summaries().len(),
        server.space().len()
    );
    println!("Press Ctrl-C to stop.");

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(tokio::signal::ctrl_c())?;
    info!("shutting down");
    Ok(())
}
