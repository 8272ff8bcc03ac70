use std::ffi::OsString;

use clap::{
    ArgMatches, CommandFactory as _, FromArgMatches as _, Parser, ValueEnum, error::ErrorKind,
};
use itertools::Itertools as _;

use crate::{
    report::ReportMode,
    search_path::{DirSource, build_directory_list},
};

#[derive(Parser, Debug)]
#[command(
    name = "findshadowed",
    version,
    about = "Find files that are shadowed by an earlier directory in a search path"
)]
struct Cli {
    /// Show files not shadowed.
    #[arg(short = 'f', long = "first")]
    show_first: bool,

    /// Don't show shadowed files.
    #[arg(short = 's', long = "no-shadowed")]
    hide_shadowed: bool,

    /// Look in each directory of PATH, which is split at ':'.
    #[arg(short = 'P', long, value_name = "PATH")]
    path: Vec<OsString>,

    /// Look in DIR.
    #[arg(short = 'I', long, value_name = "DIR")]
    include: Vec<OsString>,

    /// Look in DIR.
    #[arg(short = 'L', long, value_name = "DIR")]
    library: Vec<OsString>,

    /// Log what is being registered (see also FINDSHADOWED_LOG).
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, default_value_t = ColorOutput::Auto)]
    color: ColorOutput,

    /// Look in DIR. These come after any -P, -I and -L directories.
    #[arg(value_name = "DIR")]
    dirs: Vec<OsString>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorOutput {
    Auto,
    Always,
    Never,
}

impl std::fmt::Display for ColorOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorOutput::Auto => write!(f, "auto"),
            ColorOutput::Always => write!(f, "always"),
            ColorOutput::Never => write!(f, "never"),
        }
    }
}

/// Everything needed for a scan.
#[derive(Debug)]
pub struct Options {
    pub directories: Vec<OsString>,
    pub mode: ReportMode,
    pub verbose: bool,
    pub color: ColorOutput,
}

/// What to do after looking at the command line.
#[derive(Debug)]
pub enum Invocation {
    Scan(Options),
    /// Help or version was requested. The text goes to stdout.
    ExitSuccess(String),
    /// Bad usage. The text goes to stderr.
    ExitFailure(String),
}

/// Values of one directory option, tagged with their position on the command
/// line so the different options can be merged back into their given order.
fn indexed_values(
    matches: &ArgMatches,
    id: &str,
    to_source: fn(OsString) -> DirSource,
) -> Vec<(usize, DirSource)> {
    match (matches.indices_of(id), matches.get_many::<OsString>(id)) {
        (Some(indices), Some(values)) => indices
            .zip(values)
            .map(|(index, value)| (index, to_source(value.clone())))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse the command line. Doesn't print or exit.
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let result = Cli::command()
        .try_get_matches_from(args)
        .and_then(|matches| Cli::from_arg_matches(&matches).map(|cli| (matches, cli)));

    let (matches, cli) = match result {
        Ok(parsed) => parsed,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Invocation::ExitSuccess(err.to_string())
                }
                _ => Invocation::ExitFailure(err.to_string()),
            };
        }
    };

    let options: Vec<DirSource> = [
        indexed_values(&matches, "path", DirSource::PathList),
        indexed_values(&matches, "include", DirSource::Dir),
        indexed_values(&matches, "library", DirSource::Dir),
    ]
    .into_iter()
    .flatten()
    .sorted_by_key(|(index, _)| *index)
    .map(|(_, source)| source)
    .collect();

    Invocation::Scan(Options {
        directories: build_directory_list(&options, &cli.dirs),
        mode: ReportMode {
            show_first: cli.show_first,
            show_shadowed: !cli.hide_shadowed,
        },
        verbose: cli.verbose,
        color: cli.color,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(args: &[&str]) -> Options {
        match parse_args(std::iter::once("findshadowed").chain(args.iter().copied())) {
            Invocation::Scan(options) => options,
            other => panic!("expected a scan, got {other:?}"),
        }
    }

    fn os(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let options = scan(&["a", "b"]);
        assert_eq!(options.directories, os(&["a", "b"]));
        assert_eq!(options.mode, ReportMode::default());
        assert_eq!(options.color, ColorOutput::Auto);
        assert!(!options.verbose);
    }

    #[test]
    fn test_options_before_positional_in_given_order() {
        let options = scan(&["pos", "-Ix", "-P", "a::b:", "-L", "y", "-Iz"]);
        assert_eq!(options.directories, os(&["x", "a", "b", "y", "z", "pos"]));
    }

    #[test]
    fn test_mode_flags() {
        let options = scan(&["-fs", "dir"]);
        assert_eq!(
            options.mode,
            ReportMode {
                show_first: true,
                show_shadowed: false,
            }
        );
    }

    #[test]
    fn test_no_directories() {
        assert!(scan(&[]).directories.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directories() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt as _};

        let dir = OsStr::from_bytes(b"d\xff");
        let path = OsStr::from_bytes(b"a:p\xfe");
        let args = [OsStr::new("findshadowed"), dir, OsStr::new("-P"), path];
        match parse_args(args) {
            Invocation::Scan(options) => assert_eq!(
                options.directories,
                vec![
                    OsString::from("a"),
                    OsStr::from_bytes(b"p\xfe").to_owned(),
                    dir.to_owned(),
                ]
            ),
            other => panic!("expected a scan, got {other:?}"),
        }
    }

    #[test]
    fn test_help_is_success() {
        match parse_args(["findshadowed", "-h", "dir"]) {
            Invocation::ExitSuccess(text) => assert!(text.contains("Usage")),
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_option_is_failure() {
        match parse_args(["findshadowed", "-x", "dir"]) {
            Invocation::ExitFailure(text) => assert!(text.contains("-x")),
            other => panic!("expected a usage error, got {other:?}"),
        }
    }
}
