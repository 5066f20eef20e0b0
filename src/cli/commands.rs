//! Subcommand handlers.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::ToolwrightConfig;
use crate::error::ToolwrightError;
use crate::generator::{fetch_reference, generate_tool, GenerateToolRequest};
use crate::models::LanguageModel;
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::provider::create_provider;
use crate::tools::ToolRegistry;

use super::{Commands, FetchReferenceArgs, GenerateToolArgs};

/// Run one subcommand to completion.
pub async fn run(command: Commands, config: &ToolwrightConfig) -> Result<(), ToolwrightError> {
    match command {
        Commands::Ask(args) => handle_ask(&args.query(), config).await,
        Commands::Chat => handle_chat(config).await,
        Commands::Tools => handle_tools(config),
        Commands::FetchReference(args) => handle_fetch_reference(args).await,
        Commands::GenerateTool(args) => handle_generate_tool(args, config).await,
    }
}

async fn handle_ask(query: &str, config: &ToolwrightConfig) -> Result<(), ToolwrightError> {
    let pipeline = Pipeline::from_config(config)?;
    let outcome = pipeline.run(query).await?;
    report(&outcome, config.debug());
    Ok(())
}

async fn handle_chat(config: &ToolwrightConfig) -> Result<(), ToolwrightError> {
    let pipeline = Arc::new(Pipeline::from_config(config)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query, "exit" | "quit") {
            break;
        }

        match pipeline.run(query).await {
            Ok(outcome) => report(&outcome, config.debug()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

fn handle_tools(config: &ToolwrightConfig) -> Result<(), ToolwrightError> {
    let registry = ToolRegistry::with_defaults(config)?;
    for tool in registry.list() {
        println!("{:<18} {}", tool.name(), tool.description());
        for arg in tool.schema().arguments() {
            let required = if arg.required { "required" } else { "optional" };
            println!("    {:<18} {:<8} {:<9} {}", arg.name, arg.kind.to_string(), required, arg.description);
        }
    }
    if !config.has_credentials("polygon") {
        eprintln!("(market-data tools need POLYGON_API_KEY)");
    }
    Ok(())
}

async fn handle_fetch_reference(args: FetchReferenceArgs) -> Result<(), ToolwrightError> {
    let path = fetch_reference(&args.url, args.output.as_deref()).await?;
    println!("Successfully downloaded to: {}", path.display());
    Ok(())
}

async fn handle_generate_tool(
    args: GenerateToolArgs,
    config: &ToolwrightConfig,
) -> Result<(), ToolwrightError> {
    let model: LanguageModel = config.model().parse()?;
    let provider = create_provider(&model, config)?;
    let request = GenerateToolRequest {
        template: args.template,
        api_ref: args.api_ref,
        example: args.example,
        output: args.output,
    };
    let path = generate_tool(provider.as_ref(), &request).await?;
    println!("Wrote generated tool to: {}", path.display());
    Ok(())
}

fn report(outcome: &PipelineOutcome, verbose: bool) {
    if verbose {
        for (call, result) in outcome.calls.iter().zip(&outcome.results) {
            let presence: Vec<String> = call
                .argument_presence
                .iter()
                .map(|check| format!("{}={}", check.name, check.presence))
                .collect();
            eprintln!(
                "[{}] {} {} presence[{}] -> {}",
                call.id,
                call.tool_name,
                call.arguments,
                presence.join(", "),
                result.result
            );
        }
    }
    println!("{}", outcome.answer);
}
