//! Shell command definitions and execution
//!
//! Each command lives in its own module with an `Args` struct and an
//! `execute` function returning an exit code. `Shell` owns the session and
//! dispatches parsed lines to them.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use s5_core::{Error, Session};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

pub mod chlocn;
pub mod create_bucket;
pub mod create_folder;
pub mod cwlocn;
pub mod delete_bucket;
pub mod list;
pub mod locs3cp;
pub mod s3copy;
pub mod s3delete;
pub mod s3loccp;

/// Prompt printed before each line in interactive mode
pub const PROMPT: &str = "S5> ";

/// s5 - S3 shell with directory-style navigation
///
/// Without a command, starts an interactive session reading one command per
/// line from stdin. With a command, runs it once and exits with its code.
#[derive(Parser, Debug)]
#[command(name = "s5")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Directory holding config.toml
    #[arg(long, global = true, env = "S5_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<ShellCommand>,
}

/// One line typed at the prompt
#[derive(Parser, Debug)]
#[command(name = "s5", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Change the current location
    #[command(name = "chlocn", visible_alias = "cd")]
    Chlocn(chlocn::ChlocnArgs),

    /// Print the current location
    #[command(name = "cwlocn", visible_alias = "pwd")]
    Cwlocn,

    /// List buckets, or the contents of a folder
    #[command(name = "list", visible_alias = "ls")]
    List(list::ListArgs),

    /// Create a bucket
    #[command(name = "create_bucket", visible_alias = "mb")]
    CreateBucket(create_bucket::CreateBucketArgs),

    /// Delete an empty bucket
    #[command(name = "delete_bucket", visible_alias = "rb")]
    DeleteBucket(delete_bucket::DeleteBucketArgs),

    /// Create a folder marker
    #[command(name = "create_folder", visible_alias = "mkdir")]
    CreateFolder(create_folder::CreateFolderArgs),

    /// Delete an object or an empty folder marker
    #[command(name = "s3delete", visible_alias = "rm")]
    S3delete(s3delete::S3deleteArgs),

    /// Copy an object into a folder
    #[command(name = "s3copy", visible_alias = "cp")]
    S3copy(s3copy::S3copyArgs),

    /// Upload a local file
    #[command(name = "locs3cp", visible_alias = "put")]
    Locs3cp(locs3cp::Locs3cpArgs),

    /// Download an object to a local file
    #[command(name = "s3loccp", visible_alias = "get")]
    S3loccp(s3loccp::S3loccpArgs),

    /// End the session
    #[command(name = "exit", visible_alias = "quit")]
    Exit,
}

/// What the line reader should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue(ExitCode),
    Exit,
}

/// A session plus the settings commands need beyond it
pub struct Shell {
    session: Session,
    formatter: Formatter,
    region: String,
}

impl Shell {
    /// `region` is used as the location constraint for new buckets
    pub fn new(session: Session, formatter: Formatter, region: impl Into<String>) -> Self {
        Self {
            session,
            formatter,
            region: region.into(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Run a parsed command
    pub async fn execute(&mut self, command: ShellCommand) -> Flow {
        let formatter = &self.formatter;
        let code = match command {
            ShellCommand::Chlocn(args) => chlocn::execute(args, &mut self.session, formatter).await,
            ShellCommand::Cwlocn => cwlocn::execute(&self.session, formatter),
            ShellCommand::List(args) => list::execute(args, &self.session, formatter).await,
            ShellCommand::CreateBucket(args) => {
                create_bucket::execute(args, &self.session, &self.region, formatter).await
            }
            ShellCommand::DeleteBucket(args) => {
                delete_bucket::execute(args, &self.session, formatter).await
            }
            ShellCommand::CreateFolder(args) => {
                create_folder::execute(args, &self.session, formatter).await
            }
            ShellCommand::S3delete(args) => s3delete::execute(args, &self.session, formatter).await,
            ShellCommand::S3copy(args) => s3copy::execute(args, &self.session, formatter).await,
            ShellCommand::Locs3cp(args) => locs3cp::execute(args, &self.session, formatter).await,
            ShellCommand::S3loccp(args) => s3loccp::execute(args, &self.session, formatter).await,
            ShellCommand::Exit => return Flow::Exit,
        };
        Flow::Continue(code)
    }

    /// Split a raw line on whitespace, parse it and run it
    ///
    /// Blank lines succeed without doing anything. Unknown commands and
    /// argument errors are reported and never reach the store.
    pub async fn run_line(&mut self, line: &str) -> Flow {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&name) = words.first() else {
            return Flow::Continue(ExitCode::Success);
        };

        match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => self.execute(parsed.command).await,
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    self.formatter.println(e.to_string().trim_end());
                    Flow::Continue(ExitCode::Success)
                }
                ErrorKind::InvalidSubcommand => {
                    self.formatter.error(&format!("command not found: {name}"));
                    Flow::Continue(ExitCode::UsageError)
                }
                _ => {
                    self.formatter.error(e.to_string().trim_end());
                    Flow::Continue(ExitCode::UsageError)
                }
            },
        }
    }
}

/// Print a failed operation and pick its exit code
pub(crate) fn report(formatter: &Formatter, context: &str, error: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ShellCommand, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_original_names_and_aliases() {
        assert!(matches!(parse("chlocn /b"), Ok(ShellCommand::Chlocn(_))));
        assert!(matches!(parse("cd"), Ok(ShellCommand::Chlocn(_))));
        assert!(matches!(parse("cwlocn"), Ok(ShellCommand::Cwlocn)));
        assert!(matches!(parse("pwd"), Ok(ShellCommand::Cwlocn)));
        assert!(matches!(parse("list -l"), Ok(ShellCommand::List(_))));
        assert!(matches!(parse("create_bucket x"), Ok(ShellCommand::CreateBucket(_))));
        assert!(matches!(parse("s3copy a b"), Ok(ShellCommand::S3copy(_))));
        assert!(matches!(parse("quit"), Ok(ShellCommand::Exit)));
    }

    #[test]
    fn test_argument_count_errors() {
        let err = parse("s3copy onlyone").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse("cwlocn extra").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse("create_bucket a b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("vim notes.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
