use anyhow::Context;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use message_form::prelude::*;
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Prepare contact-your-legislator form data from JSON on the command line
#[derive(Parser, Debug)]
#[command(name = "message-form")]
#[command(about = "Prepare topic, county and message data for legislator contact forms")]
#[command(version)]
struct Args {
    /// YAML configuration file (default: MESSAGE_FORM_CONFIG env var, else built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build county and topic form fields for a set of legislators
    Fields {
        /// JSON request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Assemble one outgoing message per legislator, written as JSON lines
    Compose {
        /// JSON submission file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// List the active campaign table
    Campaigns,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldsRequest {
    legislator_form_elements: Vec<LegislatorFormElements>,
    legislators: Vec<Legislator>,
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComposeRequest {
    legislators: Vec<Legislator>,
    form_data: FormData,
    phone: String,
    #[serde(default)]
    topic_options: IndexMap<String, TopicSelection>,
    #[serde(default)]
    address: Address,
    campaign_url: String,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_form(config: Option<PathBuf>) -> anyhow::Result<MessageForm> {
    // Check flag first, then environment variable, then defaults
    let path = config.or_else(|| std::env::var("MESSAGE_FORM_CONFIG").ok().map(PathBuf::from));

    let config = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            FormConfig::load(&path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?
        }
        None => FormConfig::default(),
    };

    Ok(MessageForm::new(config)?)
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(Path::new(input))
            .with_context(|| format!("Failed to read input file: {}", input))
    }
}

fn run_fields_command(form: &MessageForm, input: &str) -> anyhow::Result<()> {
    let request: FieldsRequest =
        serde_json::from_str(&read_input(input)?).context("Failed to parse fields request")?;

    let fields = form.create_form_fields(
        &request.legislator_form_elements,
        &request.legislators,
        &request.address,
    );
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

fn run_compose_command(form: &MessageForm, input: &str) -> anyhow::Result<()> {
    let request: ComposeRequest =
        serde_json::from_str(&read_input(input)?).context("Failed to parse compose request")?;

    // Write JSON to stdout (one per line)
    for legislator in &request.legislators {
        let message = form.make_message(
            legislator,
            &request.form_data,
            &request.phone,
            &request.topic_options,
            &request.address,
            &request.campaign_url,
        );
        println!("{}", serde_json::to_string(&message)?);
    }
    Ok(())
}

fn run_campaigns_command(form: &MessageForm) {
    println!("Campaigns (first match wins):");
    for campaign in form.campaigns().entries() {
        println!("  {}", campaign.matcher.describe());
        println!("    subject: {}", campaign.template.subject.as_str());
    }
    println!("  fallback");
    println!("    subject: {}", form.campaigns().fallback().subject.as_str());
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let form = load_form(args.config)?;

    match args.command {
        Command::Fields { input } => run_fields_command(&form, &input),
        Command::Compose { input } => run_compose_command(&form, &input),
        Command::Campaigns => {
            run_campaigns_command(&form);
            Ok(())
        }
    }
}
