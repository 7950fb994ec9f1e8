//! locs3cp command - Upload a local file
//!
//! The remote path does not need to exist. Targeting a bucket root or a
//! path ending in `/` stores the file under its own name there.

use std::path::{Path, PathBuf};

use clap::Args;
use s5_core::{Error, Location, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Upload a local file
#[derive(Args, Debug)]
pub struct Locs3cpArgs {
    /// Local file to upload
    pub local: PathBuf,

    /// Absolute or relative destination path
    pub remote: String,
}

#[derive(Debug, Serialize)]
struct Locs3cpOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

/// Final object location for an upload of `local` to `remote`
pub(crate) fn upload_target(local: &Path, remote: &str, resolved: Location) -> Result<Location, Error> {
    if !(resolved.is_bucket_root() || remote.ends_with('/')) {
        return Ok(resolved);
    }

    let name = local
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidArgument(format!("{} has no file name", local.display())))?;
    Ok(resolved.child(name))
}

/// Execute the locs3cp command
pub async fn execute(args: Locs3cpArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    if args.remote.trim() == "/" {
        formatter.error("Cannot upload file to root directory.");
        return ExitCode::UsageError;
    }

    let resolved = match session.resolve(&args.remote, false).await {
        Ok(location) => location,
        Err(e) => return report(formatter, "Upload file unsuccessful", &e),
    };
    let target = match upload_target(&args.local, &args.remote, resolved) {
        Ok(location) => location,
        Err(e) => return report(formatter, "Upload file unsuccessful", &e),
    };

    let data = match tokio::fs::read(&args.local).await {
        Ok(data) => data,
        Err(e) => return report(formatter, "Upload file unsuccessful", &Error::Io(e)),
    };

    let content_type = mime_guess::from_path(&args.local)
        .first()
        .map(|m| m.to_string());

    tracing::debug!(
        local = %args.local.display(),
        target = %target,
        content_type = ?content_type,
        "uploading file"
    );
    let info = match session.store().put_object(&target, data, content_type).await {
        Ok(info) => info,
        Err(e) => return report(formatter, "Upload file unsuccessful", &e),
    };

    if formatter.is_json() {
        formatter.json(&Locs3cpOutput {
            status: "success",
            source: args.local.display().to_string(),
            target: target.to_string(),
            size_bytes: info.size_bytes.unwrap_or_default(),
            size_human: info.size_human,
        });
    } else {
        formatter.success(&format!(
            "{} -> {target} ({})",
            args.local.display(),
            info.size_human.as_deref().unwrap_or("0 B")
        ));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_target_keeps_explicit_key() {
        let target = upload_target(
            Path::new("/tmp/a.txt"),
            "/b/docs/b.txt",
            Location::new("b", "docs/b.txt"),
        )
        .unwrap();
        assert_eq!(target, Location::new("b", "docs/b.txt"));
    }

    #[test]
    fn test_upload_target_uses_file_name_for_folders() {
        let local = Path::new("/tmp/a.txt");
        assert_eq!(
            upload_target(local, "/b", Location::new("b", "")).unwrap(),
            Location::new("b", "a.txt")
        );
        assert_eq!(
            upload_target(local, "docs/", Location::new("b", "docs")).unwrap(),
            Location::new("b", "docs/a.txt")
        );
    }
}
