//! create_bucket command - Make bucket
//!
//! Creates a new bucket in the configured region.

use clap::Args;
use s5_core::{Error, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create a bucket
#[derive(Args, Debug)]
pub struct CreateBucketArgs {
    /// Bucket name; a leading or trailing `/` is ignored
    pub name: String,
}

#[derive(Debug, Serialize)]
struct CreateBucketOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    region: &'a str,
}

/// Strip every separator from a typed bucket name
pub(crate) fn bucket_name(raw: &str) -> Result<String, Error> {
    let name = raw.replace('/', "");
    if name.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "'{raw}' does not name a bucket"
        )));
    }
    Ok(name)
}

/// Execute the create_bucket command
pub async fn execute(
    args: CreateBucketArgs,
    session: &Session,
    region: &str,
    formatter: &Formatter,
) -> ExitCode {
    let bucket = match bucket_name(&args.name) {
        Ok(name) => name,
        Err(e) => return report(formatter, "Cannot create bucket", &e),
    };

    tracing::debug!(bucket = %bucket, region, "creating bucket");
    if let Err(e) = session
        .store()
        .create_bucket(&bucket, Some(region.to_string()))
        .await
    {
        return report(formatter, "Cannot create bucket", &e);
    }

    if formatter.is_json() {
        formatter.json(&CreateBucketOutput {
            status: "success",
            bucket: &bucket,
            region,
        });
    } else {
        formatter.success(&format!("Bucket '{bucket}' created successfully."));
    }
    ExitCode::Success
}
