//! cwlocn command - Print the current location

use s5_core::Session;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize)]
struct CwlocnOutput<'a> {
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<&'a str>,
}

/// Execute the cwlocn command
pub fn execute(session: &Session, formatter: &Formatter) -> ExitCode {
    let location = session.cwd();

    if formatter.is_json() {
        formatter.json(&CwlocnOutput {
            location: &location,
            bucket: session.navigation().current_bucket(),
        });
    } else {
        formatter.println(&location);
    }
    ExitCode::Success
}
