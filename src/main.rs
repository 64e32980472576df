mod checks;
mod commands;
mod core;
mod release;
mod ui;
mod utils;

use clap::Parser;
use crate::core::context::Verbosity;
use crate::core::error::{ReleaseError, print_error};
use std::path::PathBuf;

/// Cut a release: check the changelog, tag, publish, bump to the next version
#[derive(Parser)]
#[command(name = "cutarelease")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Project name used in changelog headings (default: config, then directory name)
  #[arg(short, long = "project-name", value_name = "NAME")]
  project_name: Option<String>,

  /// Version file to read and bump; repeat for several (the first is authoritative)
  #[arg(short = 'f', long = "version-file", value_name = "PATH")]
  version_files: Vec<PathBuf>,

  /// Do everything except write, commit, tag, push or publish
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// More output (-v debug, -vv trace)
  #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
  verbose: u8,

  /// Only warnings and errors
  #[arg(short, long)]
  quiet: bool,

  /// Run the built-in self-test and exit
  #[arg(long)]
  test: bool,

  /// Project root (default: current directory)
  #[arg(short = 'C', long, value_name = "DIR")]
  directory: Option<PathBuf>,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Log to stderr; stdout is for prompts and the summary
fn init_logging(verbosity: Verbosity) {
  tracing_subscriber::fmt()
    .with_max_level(verbosity.level())
    .with_target(verbosity >= Verbosity::Verbose)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

  let result = if cli.test {
    commands::run_self_test()
  } else {
    commands::run_release(commands::ReleaseOptions {
      directory: cli.directory,
      project_name: cli.project_name,
      version_files: cli.version_files,
      dry_run: cli.dry_run,
      verbose: cli.verbose,
      quiet: cli.quiet,
    })
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
