use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use imgcrypt_core::VERSION;

/// imgcrypt - Password-based encryption for image files
#[derive(Parser)]
#[command(name = "imgcrypt")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt an image into a JSON payload
    Encrypt(EncryptArgs),

    /// Decrypt a JSON payload back into the image
    Decrypt(DecryptArgs),

    /// Show payload metadata without decrypting
    Inspect(InspectArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Image file to encrypt
    #[arg(value_name = "IMAGE")]
    pub input: PathBuf,

    /// Where to write the payload (default: <IMAGE>.json)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// MIME type to record (default: guessed from the extension)
    #[arg(long, value_name = "MIME")]
    pub mime_type: Option<String>,

    /// Overwrite the output if it exists
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Payload file produced by `imgcrypt encrypt`
    #[arg(value_name = "PAYLOAD")]
    pub input: PathBuf,

    /// Where to write the image (default: derived from the payload name)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Overwrite the output if it exists
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Payload file to inspect
    #[arg(value_name = "PAYLOAD")]
    pub input: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a config file with default values
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
