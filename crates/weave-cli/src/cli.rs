//! Command-line argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Compile a weave template against JSON data and print the resulting HTML
#[derive(Parser, Debug, Clone)]
#[command(name = "weave")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Template file to compile
    pub template: Utf8PathBuf,

    /// JSON file with the data the template is compiled against
    #[arg(short, long)]
    pub data: Option<Utf8PathBuf>,

    /// Path to weave.json (searched next to the template and upwards by default)
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Directive attribute marker, e.g. `:` for `:show`
    #[arg(long)]
    pub bind: Option<String>,

    /// Priority directives, highest first
    #[arg(long, value_delimiter = ',')]
    pub priority: Vec<String>,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Directory the template lives in, where config lookup starts.
    pub fn template_dir(&self) -> Utf8PathBuf {
        match self.template.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        }
    }
}
