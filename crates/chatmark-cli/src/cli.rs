use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(author, version)]
#[command(about = "Render chat-style markdown to display-ready HTML")]
#[command(after_help = "\
EXAMPLES:

    # Render a file
    chatmark reply.md

    # Render from stdin
    cat reply.md | chatmark

    # Attach citations and strip anything outside the allow-list
    chatmark --citations sources.json --sanitized reply.md

CITATIONS:

The citations file holds a JSON array, in label order:

    [{\"matchedText\": \"[S1]\", \"items\": [{\"url\": \"https://x\", \"title\": \"X\"}]}]")]
pub struct Cli {
    /// Input file; reads stdin when omitted
    pub input: Option<PathBuf>,

    /// JSON file with citation descriptors
    #[arg(long, value_name = "FILE")]
    pub citations: Option<PathBuf>,

    /// Run the output through the HTML allow-list
    #[arg(long)]
    pub sanitized: bool,

    /// Leave math spans as literal text
    #[arg(long, env = "CHATMARK_NO_MATH")]
    pub no_math: bool,

    /// Bare links longer than this are shown as `host/...`
    #[arg(
        long,
        value_name = "N",
        env = "CHATMARK_LINK_LIMIT",
        default_value_t = chatmark_core::DEFAULT_LINK_DISPLAY_LIMIT
    )]
    pub link_limit: usize,
}
