//! s3delete command - Remove an object
//!
//! Deletes the object stored at a path and the folder marker stored at
//! `path/`, whichever exist. Keys below the folder are left alone.

use clap::Args;
use s5_core::{Error, Location, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete an object or folder marker
#[derive(Args, Debug)]
pub struct S3deleteArgs {
    /// Absolute or relative path of the object
    pub path: String,
}

#[derive(Debug, Serialize)]
struct S3deleteOutput {
    status: &'static str,
    deleted: Vec<String>,
}

/// Execute the s3delete command
pub async fn execute(args: S3deleteArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let location = match session.resolve(&args.path, true).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Cannot perform delete", &e),
    };

    if location.is_bucket_root() {
        let e = Error::InvalidArgument(format!(
            "{location} is a bucket; use delete_bucket instead"
        ));
        return report(formatter, "Cannot perform delete", &e);
    }

    let keys = match session
        .validator()
        .exact_keys(&location.bucket, &location.key)
        .await
    {
        Ok(keys) if keys.is_empty() => {
            let e = Error::NotFound(format!("no object or folder marker at {location}"));
            return report(formatter, "Cannot perform delete", &e);
        }
        Ok(keys) => keys,
        Err(e) => return report(formatter, "Cannot perform delete", &e),
    };

    let mut deleted = Vec::with_capacity(keys.len());
    for key in keys {
        let target = Location::new(&location.bucket, key);
        if let Err(e) = session.store().delete_object(&target).await {
            return report(formatter, "Cannot perform delete", &e);
        }
        if !formatter.is_json() {
            formatter.success(&format!("Removed {target}"));
        }
        deleted.push(target.to_string());
    }

    if formatter.is_json() {
        formatter.json(&S3deleteOutput {
            status: "success",
            deleted,
        });
    }
    ExitCode::Success
}
