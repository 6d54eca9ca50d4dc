//! orchat - Command-line chat for OpenRouter models
//!
//! Usage:
//!     orchat [OPTIONS] [PROMPT]
//!
//! Environment Variables:
//!     OPENROUTER_API_KEY: API key for the OpenRouter gateway (optional)
//!     OPENROUTER_MODEL: Model ID (default: google/gemini-2.5-flash)
//!     OPENROUTER_BASE_URL: API base URL (default: https://openrouter.ai/api/v1)

use anyhow::Result;
use clap::Parser;
use openrouter_chat::{
    ChatClient, ChatCompletionRequestMessage, ChatReply, ChatRequest, LlmSettings, MessageBuilder,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, OPENROUTER_BASE_URL,
};
use std::io::{self, BufRead, Write};

/// Command-line chat for OpenRouter models
#[derive(Parser, Debug)]
#[command(name = "orchat")]
#[command(about = "Command-line chat for OpenRouter models")]
#[command(after_help = r#"Examples:
    # One-shot prompt with the default model
    orchat "Summarize the plot of Hamlet"

    # Interactive session
    orchat

    # Use a different model
    orchat --model deepseek/deepseek-r1 "Prove it"

    # Verify gateway connectivity and exit
    orchat --check

    # Disable streamed output
    orchat --no-stream "Write a haiku"
"#)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = OPENROUTER_BASE_URL)]
    base_url: String,

    /// Model ID
    #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API key for the OpenRouter gateway
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// System prompt prepended to the conversation
    #[arg(long)]
    system: Option<String>,

    /// Completion token limit per reply
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, env = "OPENROUTER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Wait for the full reply instead of streaming it
    #[arg(long)]
    no_stream: bool,

    /// Verify gateway connectivity and exit
    #[arg(long)]
    check: bool,

    /// Suppress the startup header
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Prompt to send (interactive mode if not provided)
    prompt: Option<String>,
}

/// Check that the gateway is reachable with the current settings
async fn check_gateway(client: &ChatClient) -> bool {
    let settings = client.settings();

    println!("\u{1F50D} Checking gateway...");
    println!("{}", "-".repeat(50));

    print!(
        "1. Checking API connectivity ({})... ",
        settings.base_url
    );
    io::stdout().flush().ok();

    match client.test_connection().await {
        Ok(_) => {
            println!("\u{2705} OK");
            println!("{}", "-".repeat(50));
            println!("\u{2705} Gateway checks passed!\n");
            true
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            let error_msg = e.to_string();

            if error_msg.contains("401") || error_msg.to_lowercase().contains("unauthorized") {
                println!("   Error: The gateway rejected the credential.");
                println!("   Solution:");
                println!("     1. Set OPENROUTER_API_KEY to a valid key");
                println!("     2. Create one at https://openrouter.ai/keys");
            } else if !settings.has_api_key() {
                println!("   Error: {}", error_msg);
                println!("   Note: OPENROUTER_API_KEY is not set.");
            } else {
                println!("   Error: {}", error_msg);
                println!("   Solution:");
                println!("     1. Check your network connection");
                println!("     2. Verify the base URL: {}", settings.base_url);
            }

            println!("{}", "-".repeat(50));
            println!("\u{274C} Gateway check failed. Please fix the issues above.");
            false
        }
    }
}

/// Print application header
fn print_header(client: &ChatClient) {
    let settings = client.settings();

    println!("{}", "=".repeat(50));
    println!("orchat - OpenRouter chat");
    println!("{}", "=".repeat(50));
    println!("Model: {}", settings.default_model);
    println!("Base URL: {}", settings.base_url);
    println!(
        "API Key: {}",
        if settings.has_api_key() {
            "configured"
        } else {
            "not set"
        }
    );
    println!("{}", "=".repeat(50));
}

/// Send one conversation turn, streaming output unless disabled
async fn send_turn(
    client: &ChatClient,
    args: &Cli,
    history: &[ChatCompletionRequestMessage],
) -> Result<ChatReply> {
    let mut request = ChatRequest::new(history.to_vec());
    if let Some(max_tokens) = args.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = args.temperature {
        request = request.with_temperature(temperature);
    }

    let reply = if args.no_stream {
        let reply = client.complete(request).await?;
        println!("{}", reply.content);
        reply
    } else {
        let reply = client
            .stream(request, |delta| {
                print!("{}", delta);
                io::stdout().flush().ok();
            })
            .await?;
        println!();
        reply
    };

    Ok(reply)
}

/// Run interactive mode
async fn run_interactive_mode(client: &ChatClient, args: &Cli) -> Result<()> {
    println!("\nEntering interactive mode. Type 'quit' to exit.\n");

    let mut history: Vec<ChatCompletionRequestMessage> = Vec::new();
    if let Some(system) = &args.system {
        history.push(MessageBuilder::system(system));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("\n\nInterrupted. Goodbye!");
                break;
            }
        }

        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit")
            || prompt.eq_ignore_ascii_case("exit")
            || prompt.eq_ignore_ascii_case("q")
        {
            println!("Goodbye!");
            break;
        }

        if prompt.is_empty() {
            continue;
        }

        history.push(MessageBuilder::user(prompt));

        println!();
        match send_turn(client, args, &history).await {
            Ok(reply) => {
                history.push(MessageBuilder::assistant(&reply.content));
                println!();
            }
            Err(e) => {
                // Drop the failed turn so a retry starts clean
                history.pop();
                eprintln!("\nError: {}\n", e);
            }
        }
    }

    Ok(())
}

/// Run a single prompt and exit
async fn run_once(client: &ChatClient, args: &Cli, prompt: &str) -> Result<()> {
    let mut history: Vec<ChatCompletionRequestMessage> = Vec::new();
    if let Some(system) = &args.system {
        history.push(MessageBuilder::system(system));
    }
    history.push(MessageBuilder::user(prompt));

    let reply = send_turn(client, args, &history).await?;

    if let Some(usage) = reply.usage {
        println!(
            "\n[{} | {} prompt + {} completion tokens]",
            reply.model, usage.prompt_tokens, usage.completion_tokens
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    // Settings are resolved once here and passed by reference from then on
    let mut settings = LlmSettings::from_env()
        .with_base_url(&args.base_url)
        .with_default_model(&args.model)
        .with_timeout_secs(args.timeout_secs);
    if let Some(api_key) = &args.api_key {
        settings = settings.with_api_key(api_key);
    }

    let client = ChatClient::new(&settings);

    // Handle --check (probe and exit)
    if args.check {
        if check_gateway(&client).await {
            return Ok(());
        }
        std::process::exit(1);
    }

    if !args.quiet {
        print_header(&client);
        println!();
    }

    // Run with provided prompt or enter interactive mode
    if let Some(prompt) = &args.prompt {
        run_once(&client, &args, prompt).await?;
    } else {
        run_interactive_mode(&client, &args).await?;
    }

    Ok(())
}
