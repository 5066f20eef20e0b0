//! CLI entry point for toolwright.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ToolwrightConfig;
use crate::pipeline::policy::ValidationPolicy;

/// Ask questions answered by LLM tool calling.
#[derive(Parser, Debug)]
#[command(name = "toolwright", version, about = "toolwright: LLM tool-calling pipeline")]
pub struct Cli {
    /// Enable debug logging and per-call details
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Cache model responses in memory
    #[arg(short, long, global = true)]
    pub cache: bool,

    /// Model to use (format: provider:model, e.g., ollama:llama3.2)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// What to do with argument presence verdicts (advisory, enforcing)
    #[arg(long, global = true)]
    pub validation_policy: Option<ValidationPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single query
    Ask(AskArgs),
    /// Answer queries read line by line from stdin
    Chat,
    /// List the registered tools
    Tools,
    /// Download an API reference page
    FetchReference(FetchReferenceArgs),
    /// Generate tool source from an API reference with the model
    GenerateTool(GenerateToolArgs),
}

/// Arguments for `toolwright ask`.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to answer
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for `toolwright fetch-reference`.
#[derive(Parser, Debug)]
pub struct FetchReferenceArgs {
    /// URL of the reference page
    pub url: String,

    /// Where to save it (defaults to the URL's file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `toolwright generate-tool`.
#[derive(Parser, Debug)]
pub struct GenerateToolArgs {
    /// Prompt template containing [api_ref.html] and [tool_example.py]
    #[arg(long, default_value = "prompt.txt")]
    pub template: PathBuf,

    /// API reference file
    #[arg(long, default_value = "temp/api_ref.html")]
    pub api_ref: PathBuf,

    /// Example tool source file
    #[arg(long, default_value = "temp/tool_example.py")]
    pub example: PathBuf,

    /// Where to write the generated source
    #[arg(short, long, default_value = "temp/output.py")]
    pub output: PathBuf,
}

impl Cli {
    /// Layer the global flags over `config`. Flags only ever turn `debug`
    /// and `cache` on.
    pub fn apply(&self, config: ToolwrightConfig) -> ToolwrightConfig {
        let debug = self.debug || config.debug();
        let cache = self.cache || config.cache();
        let mut config = config.with_debug(debug).with_cache(cache);
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(policy) = self.validation_policy {
            config = config.with_validation_policy(policy);
        }
        config
    }
}
