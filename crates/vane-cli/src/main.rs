use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dotenv::dotenv;
use std::env;

use vane::agent::Agent;
use vane::providers::configs::{OpenAiProviderConfig, GROQ_DEFAULT_MODEL, GROQ_HOST};
use vane::providers::openai::OpenAiProvider;
use vane::toolset::WeatherToolset;
use vane::weather::{WeatherClient, WeatherConfig, OPENWEATHER_HOST};

mod prompt;
mod session;

use prompt::rustyline::RustylinePrompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model to use (can also be set via GROQ_MODEL environment variable)
    #[arg(short, long)]
    model: Option<String>,

    /// Completions API key (can also be set via GROQ_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Completions host (can also be set via GROQ_HOST environment variable)
    #[arg(long)]
    host: Option<String>,

    /// Weather API key (can also be set via OPENWEATHER_API_KEY environment variable)
    #[arg(long)]
    weather_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let cli = Cli::parse();

    let provider = OpenAiProvider::new(provider_config(&cli)?)?;
    let weather = WeatherClient::new(weather_config(&cli)?)?;

    let agent = Agent::new(Box::new(provider), Box::new(WeatherToolset::new(weather)));
    let prompt = RustylinePrompt::new()?;

    println!(
        "--- Research Assistant Bot {} ---",
        style("(Type 'exit' to quit)").dim()
    );

    let mut session = Session::new(agent, Box::new(prompt));
    session.start().await
}

fn provider_config(cli: &Cli) -> Result<OpenAiProviderConfig> {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("GROQ_API_KEY").ok())
        .context("API key must be provided via --api-key or GROQ_API_KEY environment variable")?;

    let host = cli
        .host
        .clone()
        .or_else(|| env::var("GROQ_HOST").ok())
        .unwrap_or_else(|| GROQ_HOST.to_string());

    let model = cli
        .model
        .clone()
        .or_else(|| env::var("GROQ_MODEL").ok())
        .unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_string());

    Ok(OpenAiProviderConfig::new(host, api_key, model))
}

fn weather_config(cli: &Cli) -> Result<WeatherConfig> {
    let api_key = cli
        .weather_api_key
        .clone()
        .or_else(|| env::var("OPENWEATHER_API_KEY").ok())
        .context(
            "Weather API key must be provided via --weather-api-key or OPENWEATHER_API_KEY environment variable",
        )?;

    let host = env::var("OPENWEATHER_HOST").unwrap_or_else(|_| OPENWEATHER_HOST.to_string());

    Ok(WeatherConfig::new(host, api_key))
}
