//! CLI argument parsing.
//!
//! The CLI only collects input and picks an entry point; every decision about
//! prompts, fallbacks, and accounts lives in the library modules.
use crate::config::Overrides;
use crate::document::Category;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "lexdraft",
    version,
    about = "Draft, analyze, and validate legal documents with a language model",
    after_help = "Examples:\n  lexdraft categories\n  lexdraft generate --category contracts --sub-type \"Service Agreement\" \\\n    --jurisdiction \"Federal Law\" --full-name \"Acme Inc\" --details \"consulting services, 12 months\"\n  lexdraft login --email demo@example.com --password 'Demo@123'\n  lexdraft validate --file agreement.txt --json\n  lexdraft chat --message \"How do I appeal a small claims judgment?\"",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Shell command that reads a prompt on stdin and prints the reply (replaces Gemini)
    #[arg(long, value_name = "CMD", global = true)]
    pub lm: Option<String>,

    /// Gemini model name
    #[arg(long, value_name = "NAME", global = true)]
    pub model: Option<String>,

    /// Directory holding accounts, the session, and config.json
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Append a JSONL record of every model call to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub lm_log: Option<PathBuf>,

    /// Log workflow progress to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            lm_command: self.lm.clone(),
            model: self.model.clone(),
            data_dir: self.data_dir.clone(),
            lm_log: self.lm_log.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(GenerateArgs),
    Validate(ValidateArgs),
    Chat(ChatArgs),
    Categories(CategoriesArgs),
    Signup(SignupArgs),
    Login(LoginArgs),
    Logout,
    Whoami,
}

/// Form fields are optional here so missing ones are reported together.
#[derive(Parser, Debug, Default)]
#[command(about = "Generate a document, then analyze it, find references, extract clauses, and suggest next steps")]
pub struct GenerateArgs {
    /// Document category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Document type, e.g. "Service Agreement"
    #[arg(long, value_name = "TYPE")]
    pub sub_type: Option<String>,

    /// Governing jurisdiction, e.g. "Federal Law"
    #[arg(long, value_name = "NAME")]
    pub jurisdiction: Option<String>,

    /// Primary party
    #[arg(long, value_name = "NAME")]
    pub full_name: Option<String>,

    /// Other party, if any
    #[arg(long, value_name = "NAME")]
    pub counterparty: Option<String>,

    /// Terms, purpose, and other specifics
    #[arg(long, value_name = "TEXT")]
    pub details: Option<String>,

    /// Text file with earlier related documents to use as context
    #[arg(long, value_name = "FILE")]
    pub previous_documents: Option<PathBuf>,

    /// JSON request form; flags override its fields. Repeat to draft several documents
    #[arg(long = "request", value_name = "FILE")]
    pub requests: Vec<PathBuf>,

    /// Emit the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the generated text to DIR/<Sub_Type>.txt
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Score a document and list issues (requires login)")]
pub struct ValidateArgs {
    /// Document to validate (text; PDF input is not parsed)
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Ask the legal assistant a question")]
pub struct ChatArgs {
    #[arg(long, value_name = "TEXT")]
    pub message: String,
}

#[derive(Parser, Debug)]
#[command(about = "List document categories, sub-types, and jurisdictions")]
pub struct CategoriesArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Create a local account and sign in")]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub name: String,
}

#[derive(Parser, Debug)]
#[command(about = "Sign in to a local account")]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}
