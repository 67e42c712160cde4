use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chatmark_core::{
    Citation, MathRenderer, RenderOptions, TypstMath, render_sanitized_with_options,
    render_with_options,
};
use clap::Parser;
use log::debug;

mod cli;
use cli::Cli;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let citations = match &cli.citations {
        Some(path) => load_citations(path)?,
        None => Vec::new(),
    };
    debug!("loaded {} citations", citations.len());

    let options = RenderOptions {
        link_display_limit: cli.link_limit,
        math: !cli.no_math,
    };
    let typst = options.math.then(TypstMath::new);
    let math = typst.as_ref().map(|renderer| renderer as &dyn MathRenderer);

    let html = if cli.sanitized {
        render_sanitized_with_options(&source, &citations, &options, math)
    } else {
        render_with_options(&source, &citations, &options, math)
    };

    println!("{}", html);
    Ok(())
}

fn load_citations(path: &Path) -> Result<Vec<Citation>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read citations from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("invalid citation JSON in {}", path.display()))
}
