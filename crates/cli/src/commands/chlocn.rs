//! chlocn command - Change the current location
//!
//! Moves the session between the root, buckets and folders. A failed move
//! leaves the location where it was.

use clap::Args;
use s5_core::Session;
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Change the current location
#[derive(Args, Debug)]
pub struct ChlocnArgs {
    /// Folder to move to: absolute (/bucket/folder), relative, `..`, `~` or `/`.
    /// Omit to return to the root
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChlocnOutput {
    status: &'static str,
    location: String,
}

/// Execute the chlocn command
pub async fn execute(args: ChlocnArgs, session: &mut Session, formatter: &Formatter) -> ExitCode {
    if let Err(e) = session.change_location(args.path.as_deref()).await {
        return report(formatter, "Cannot change location", &e);
    }

    if formatter.is_json() {
        formatter.json(&ChlocnOutput {
            status: "success",
            location: session.cwd(),
        });
    }
    ExitCode::Success
}
