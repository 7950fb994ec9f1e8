//! s3loccp command - Download an object
//!
//! Writes one object to a local file. A local directory target receives
//! the object under its own name.

use std::path::{Path, PathBuf};

use clap::Args;
use s5_core::{Error, Location, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Download an object
#[derive(Args, Debug)]
pub struct S3loccpArgs {
    /// Absolute or relative path of the object
    pub remote: String,

    /// Local file or directory to write to
    pub local: PathBuf,
}

#[derive(Debug, Serialize)]
struct S3loccpOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: usize,
}

/// Local file a download of `source` is written to
pub(crate) async fn download_target(source: &Location, local: &Path) -> PathBuf {
    let is_dir = tokio::fs::metadata(local)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if is_dir {
        local.join(source.basename())
    } else {
        local.to_path_buf()
    }
}

/// Execute the s3loccp command
pub async fn execute(args: S3loccpArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let source = match session.resolve(&args.remote, true).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Download file unsuccessful", &e),
    };
    if source.is_bucket_root() {
        let e = Error::InvalidArgument(format!("{source} is a bucket, not an object"));
        return report(formatter, "Download file unsuccessful", &e);
    }

    let data = match session.store().get_object(&source).await {
        Ok(data) => data,
        Err(e) => return report(formatter, "Download file unsuccessful", &e),
    };

    let target = download_target(&source, &args.local).await;
    tracing::debug!(source = %source, local = %target.display(), "writing download");
    if let Err(e) = tokio::fs::write(&target, &data).await {
        return report(formatter, "Download file unsuccessful", &Error::Io(e));
    }

    if formatter.is_json() {
        formatter.json(&S3loccpOutput {
            status: "success",
            source: source.to_string(),
            target: target.display().to_string(),
            size_bytes: data.len(),
        });
    } else {
        formatter.success(&format!(
            "{source} -> {} ({})",
            target.display(),
            humansize::format_size(data.len(), humansize::BINARY)
        ));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_target_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = Location::new("b", "docs/report.pdf");

        assert_eq!(
            download_target(&source, dir.path()).await,
            dir.path().join("report.pdf")
        );

        let file = dir.path().join("renamed.pdf");
        assert_eq!(download_target(&source, &file).await, file);
    }
}
