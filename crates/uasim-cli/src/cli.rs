use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "uasim",
    about = "UASim: simulated OPC UA address space with access control and custom types",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML server configuration; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered namespaces
    Namespaces,
    /// List the references of a node
    Browse(BrowseArgs),
    /// Read one attribute of a node
    Read(ReadArgs),
    /// Write a node's value
    Write(WriteArgs),
    /// Call a method on an object
    Call(CallArgs),
    /// Report references whose inverse is missing
    CheckReferences,
    /// Build the address space and run until Ctrl-C
    Serve,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Node id, e.g. "ns=1;s=Simulation"
    pub node_id: String,
}

#[derive(Args)]
pub struct ReadArgs {
    pub node_id: String,
    /// User name to read as; anonymous when omitted
    #[arg(short, long)]
    pub identity: Option<String>,
    /// Attribute name, e.g. "Value" or "DisplayName"
    #[arg(short, long, default_value = "Value")]
    pub attribute: String,
}

#[derive(Args)]
pub struct WriteArgs {
    pub node_id: String,
    /// Value text, parsed as the node's DataType
    #[arg(allow_negative_numbers = true)]
    pub value: String,
    #[arg(short, long)]
    pub identity: Option<String>,
}

#[derive(Args)]
pub struct CallArgs {
    pub object_id: String,
    pub method_id: String,
    /// Input arguments, parsed as the method's declared types
    #[arg(allow_negative_numbers = true)]
    pub args: Vec<String>,
    #[arg(short, long)]
    pub identity: Option<String>,
}
