//! create_folder command - Make folder
//!
//! Writes a zero-byte `folder/` marker. The path is resolved without
//! validation since the folder does not exist yet.

use clap::Args;
use s5_core::{Error, Location, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create a folder
#[derive(Args, Debug)]
pub struct CreateFolderArgs {
    /// Absolute or relative path of the new folder
    pub path: String,
}

#[derive(Debug, Serialize)]
struct CreateFolderOutput {
    status: &'static str,
    folder: String,
}

/// Execute the create_folder command
pub async fn execute(args: CreateFolderArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let location = match session.resolve(&args.path, false).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Cannot create folder", &e),
    };

    if location.is_bucket_root() {
        let e = Error::InvalidArgument(format!("{location} is a bucket, not a folder"));
        return report(formatter, "Cannot create folder", &e);
    }

    let marker = Location::new(&location.bucket, location.marker_key());
    if let Err(e) = session.store().put_object(&marker, Vec::new(), None).await {
        return report(formatter, "Cannot create folder", &e);
    }

    if formatter.is_json() {
        formatter.json(&CreateFolderOutput {
            status: "success",
            folder: marker.to_string(),
        });
    } else {
        formatter.success(&format!("Created folder {marker}"));
    }
    ExitCode::Success
}
