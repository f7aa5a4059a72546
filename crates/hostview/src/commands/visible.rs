//! Visible command - report which paths the sandbox can reach.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the visible command.
#[derive(Args, Debug)]
pub struct VisibleArgs {
    /// Host paths to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Visibility<'a> {
    path: &'a PathBuf,
    visible: bool,
}

/// Run the visible command.
///
/// Exits with status 1 when any path is hidden.
pub fn run(args: VisibleArgs, ctx: &Context) -> Result<ExitCode> {
    let exports = ctx.build_exports()?;

    let results: Vec<Visibility<'_>> = args
        .paths
        .iter()
        .map(|path| Visibility {
            path,
            visible: exports.path_is_visible(path),
        })
        .collect();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            let status = if result.visible { "visible" } else { "hidden" };
            println!("{status}\t{}", result.path.display());
        }
    }

    if results.iter().all(|r| r.visible) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
