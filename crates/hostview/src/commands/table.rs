//! Table command - print the export table.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use hostview_exports::{ExportEntry, FilesystemMode};
use serde::Serialize;

use super::Context;

/// Arguments for the table command.
#[derive(Args, Debug)]
pub struct TableArgs {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct TableOutput<'a> {
    host_fs: FilesystemMode,
    entries: Vec<&'a ExportEntry>,
}

/// Run the table command.
pub fn run(_args: TableArgs, ctx: &Context) -> Result<ExitCode> {
    let exports = ctx.build_exports()?;
    let table = exports.table();

    if ctx.json_output {
        let output = TableOutput {
            host_fs: table.host_fs(),
            entries: table.sorted(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    if ctx.verbose {
        println!("# host-fs: {}", table.host_fs());
    }
    for entry in table.sorted() {
        println!("{}\t{}", entry.mode, entry.path.display());
    }

    Ok(ExitCode::SUCCESS)
}
