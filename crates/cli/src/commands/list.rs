//! list command - List buckets or folder contents
//!
//! At the root with no path this lists buckets. Otherwise the target folder
//! is resolved, validated and listed one level deep.

use clap::Args;
use s5_core::{ListingEntry, Session};
use serde::Serialize;

use super::report;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

const BLANK_DATE: &str = "                   ";

/// List buckets or folder contents
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show storage class, size and modification time
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// Folder to list, defaults to the current location
    pub path: Option<String>,
}

/// Output structure for list command (JSON format)
#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    location: String,
    entries: &'a [ListingEntry],
}

/// Execute the list command
pub async fn execute(args: ListArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let entries = match session.list(args.path.as_deref(), args.long).await {
        Ok(entries) => entries,
        Err(e) => return report(formatter, "Cannot list contents of this location", &e),
    };

    if formatter.is_json() {
        formatter.json(&ListOutput {
            location: args.path.unwrap_or_else(|| session.cwd()),
            entries: &entries,
        });
    } else {
        for entry in &entries {
            let line = render(entry);
            if entry.is_folder() {
                formatter.println(&formatter.folder(&line));
            } else {
                formatter.println(&line);
            }
        }
    }
    ExitCode::Success
}

fn format_date(ts: Option<jiff::Timestamp>) -> String {
    ts.map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| BLANK_DATE.to_string())
}

/// One human-readable line per entry; folders end in `/`
fn render(entry: &ListingEntry) -> String {
    match entry {
        ListingEntry::Bucket {
            name,
            created: Some(created),
        } => format!("{}\t{name}", format_date(Some(*created))),
        ListingEntry::Bucket {
            name,
            created: None,
        } => name.clone(),
        ListingEntry::SubFolder { name } => format!("{name}/"),
        ListingEntry::File {
            name,
            detail: Some(detail),
        } => format!(
            "{}\t{:>10}\t{}\t{name}",
            detail.storage_class.as_deref().unwrap_or("-"),
            detail.size_human,
            format_date(detail.last_modified),
        ),
        ListingEntry::File { name, detail: None } => name.clone(),
    }
}
