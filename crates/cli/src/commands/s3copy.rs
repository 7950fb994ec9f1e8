//! s3copy command - Server-side copy
//!
//! Copies one object into a destination folder, keeping its name. Both
//! ends must already exist.

use clap::Args;
use s5_core::{Error, Location, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Copy an object into a folder
#[derive(Args, Debug)]
pub struct S3copyArgs {
    /// Object to copy
    pub source: String,

    /// Folder or bucket to copy into
    pub destination: String,
}

#[derive(Debug, Serialize)]
struct S3copyOutput {
    status: &'static str,
    source: String,
    target: String,
}

/// Where a copy of `source` lands inside the folder `destination`
pub(crate) fn copy_target(source: &Location, destination: &Location) -> Location {
    destination.child(source.basename())
}

/// Execute the s3copy command
pub async fn execute(args: S3copyArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let source = match session.resolve(&args.source, true).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Cannot perform copy", &e),
    };
    if source.is_bucket_root() {
        let e = Error::InvalidArgument(format!("{source} is a bucket, not an object"));
        return report(formatter, "Cannot perform copy", &e);
    }

    let destination = match session.resolve(&args.destination, true).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Cannot perform copy", &e),
    };

    let target = copy_target(&source, &destination);
    tracing::debug!(source = %source, target = %target, "copying object");
    if let Err(e) = session.store().copy_object(&source, &target).await {
        return report(formatter, "Cannot perform copy", &e);
    }

    if formatter.is_json() {
        formatter.json(&S3copyOutput {
            status: "success",
            source: source.to_string(),
            target: target.to_string(),
        });
    } else {
        formatter.success(&format!("{source} -> {target}"));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_target_keeps_basename() {
        let src = Location::new("b1", "x/report.txt");
        assert_eq!(
            copy_target(&src, &Location::new("b2", "archive")),
            Location::new("b2", "archive/report.txt")
        );
        assert_eq!(
            copy_target(&src, &Location::new("b2", "")),
            Location::new("b2", "report.txt")
        );
    }
}
