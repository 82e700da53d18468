//! Command-line front end for the provider adapter.

use clap::{Parser, Subcommand};
use futures::StreamExt;
use liquidbooks_ai::config::{self, FileConfig};
use liquidbooks_ai::error::LiquidBooksError;
use liquidbooks_ai::json::parse_json_output;
use liquidbooks_ai::llm::{calculate_cost, AIProvider, CompletionRequest, ProviderKind};
use liquidbooks_ai::logging;
use liquidbooks_ai::messages::Message;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "liquidbooks-ai",
    about = "Send completions to OpenAI, OpenRouter or Anthropic",
    version
)]
struct Cli {
    /// Read configuration from this file instead of the search paths
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Send one prompt and print the reply")]
    Complete(CompleteArgs),
    #[command(about = "List supported providers and their settings")]
    Providers,
    #[command(about = "List the models the configured provider offers")]
    Models,
    #[command(about = "Show where configuration files are looked up")]
    ConfigPaths,
}

#[derive(Parser, Debug)]
struct CompleteArgs {
    /// The user prompt
    #[arg(short, long)]
    prompt: String,

    /// Optional system prompt
    #[arg(short, long)]
    system: Option<String>,

    /// Ask for a single JSON object
    #[arg(long)]
    json: bool,

    /// Sampling temperature in [0, 1]
    #[arg(long, default_value_t = liquidbooks_ai::llm::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Cap on output tokens
    #[arg(long, default_value_t = liquidbooks_ai::llm::DEFAULT_MAX_OUTPUT_TOKENS)]
    max_tokens: u32,

    /// Print text fragments as they arrive
    #[arg(long)]
    stream: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LiquidBooksError> {
    let file = match &cli.config {
        Some(path) => config::from_path(path)?,
        None => config::load()?,
    };
    logging::init(&file.logging.with_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Complete(args) => complete(&file, args).await,
        Commands::Models => models(&file).await,
        Commands::Providers => {
            print_providers();
            Ok(())
        }
        Commands::ConfigPaths => {
            for path in config::search_paths() {
                let marker = if path.exists() { "*" } else { " " };
                println!("{marker} {}", path.display());
            }
            Ok(())
        }
    }
}

async fn complete(file: &FileConfig, args: CompleteArgs) -> Result<(), LiquidBooksError> {
    let provider = AIProvider::new(file.provider_config_from_env()?)?;

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = args.system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(args.prompt));

    let request = CompletionRequest::new(messages)
        .with_temperature(args.temperature)
        .with_max_output_tokens(args.max_tokens)
        .with_format(args.json);

    if args.stream {
        let mut stream = provider.complete_stream(&request).await?;
        let mut stdout = std::io::stdout();
        while let Some(fragment) = stream.next().await {
            print!("{}", fragment?);
            stdout.flush().ok();
        }
        println!();
        return Ok(());
    }

    let result = provider.complete(&request).await?;
    if request.json_mode() {
        print_json(&result.text)?;
    } else {
        println!("{}", result.text);
    }

    if let Some(tokens) = result.tokens_used {
        eprintln!(
            "tokens: {tokens}, estimated cost: ${:.4}",
            calculate_cost(tokens, provider.model())
        );
    }
    Ok(())
}

/// Prints the document recovered from JSON-mode output.
fn print_json(text: &str) -> Result<(), LiquidBooksError> {
    let output = match parse_json_output(text) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("--- start of output ---\n{}\n--- end of output ---\n{}", e.head, e.tail);
            return Err(e.into());
        }
    };

    let pretty = serde_json::to_string_pretty(&output.value)
        .unwrap_or_else(|_| output.value.to_string());
    println!("{pretty}");

    if output.partial {
        eprintln!("warning: output was incomplete; later fields are missing");
    } else if output.repaired {
        eprintln!("note: output needed repair before it parsed");
    }
    Ok(())
}

async fn models(file: &FileConfig) -> Result<(), LiquidBooksError> {
    let provider = AIProvider::new(file.provider_config_from_env()?)?;

    for model in provider.list_models().await? {
        let marker = if model.id == provider.model() { "*" } else { " " };
        if model.name == model.id {
            println!("{marker} {}", model.id);
        } else {
            println!("{marker} {} ({})", model.id, model.name);
        }
        if let Some(context_length) = model.context_length {
            println!("    context: {context_length} tokens");
        }
        if let Some(pricing) = &model.pricing {
            println!(
                "    pricing: prompt {} / completion {} per token",
                pricing.prompt.as_deref().unwrap_or("?"),
                pricing.completion.as_deref().unwrap_or("?")
            );
        }
    }
    Ok(())
}

fn print_providers() {
    for kind in ProviderKind::ALL {
        println!("{} ({})", kind.id(), kind.display_name());
        println!("  {}", kind.description());
        println!("  family:        {}", kind.family());
        println!("  credential:    {}", kind.credential_env());
        println!("  base url:      {}", kind.default_base_url());
        println!("  default model: {}", kind.default_model());
    }
}
