//! Plan command - print the mount plan.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the plan command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Print all arguments on a single line
    #[arg(long)]
    pub flat: bool,
}

/// Run the plan command.
pub fn run(args: PlanArgs, ctx: &Context) -> Result<ExitCode> {
    let exports = ctx.build_exports()?;
    let plan = exports.mount_plan();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(ExitCode::SUCCESS);
    }

    if args.flat {
        println!("{}", join(&plan.to_bwrap_argv()));
    } else {
        for group in plan.to_bwrap_args() {
            println!("{}", join(&group));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn join(args: &[std::ffi::OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
