//! delete_bucket command - Remove bucket
//!
//! Deletes an empty bucket. The bucket the session is currently in cannot
//! be deleted.

use clap::Args;
use s5_core::{Error, Session};
use serde::Serialize;

use super::create_bucket::bucket_name;
use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete an empty bucket
#[derive(Args, Debug)]
pub struct DeleteBucketArgs {
    /// Bucket name; a leading or trailing `/` is ignored
    pub name: String,
}

#[derive(Debug, Serialize)]
struct DeleteBucketOutput<'a> {
    status: &'static str,
    bucket: &'a str,
}

/// Execute the delete_bucket command
pub async fn execute(args: DeleteBucketArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let bucket = match bucket_name(&args.name) {
        Ok(name) => name,
        Err(e) => return report(formatter, "Cannot delete bucket", &e),
    };

    if session.navigation().current_bucket() == Some(bucket.as_str()) {
        formatter.error("Cannot delete the bucket you are currently in.");
        return ExitCode::UsageError;
    }

    match session.validator().bucket_exists(&bucket).await {
        Ok(true) => {}
        Ok(false) => {
            let e = Error::NotFound(format!("Bucket does not exist: {bucket}"));
            return report(formatter, "Cannot delete bucket", &e);
        }
        Err(e) => return report(formatter, "Cannot delete bucket", &e),
    }

    if let Err(e) = session.store().delete_bucket(&bucket).await {
        return report(formatter, "Cannot delete bucket", &e);
    }

    if formatter.is_json() {
        formatter.json(&DeleteBucketOutput {
            status: "success",
            bucket: &bucket,
        });
    } else {
        formatter.success(&format!("Bucket '{bucket}' removed successfully."));
    }
    ExitCode::Success
}
