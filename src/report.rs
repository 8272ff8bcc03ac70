use std::{
    ffi::OsStr,
    io::{self, Write},
};

use owo_colors::{OwoColorize as _, Stream};

use crate::tracker::DirectoryReport;

/// Which parts of each directory's report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMode {
    /// List the names each directory was the first to provide.
    pub show_first: bool,
    /// List the names each directory provides that are shadowed.
    pub show_shadowed: bool,
}

impl Default for ReportMode {
    fn default() -> Self {
        Self {
            show_first: false,
            show_shadowed: true,
        }
    }
}

/// Write a name or directory exactly as the OS gave it.
#[cfg(unix)]
fn write_os_str(out: &mut impl Write, s: &OsStr) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt as _;

    out.write_all(s.as_bytes())
}

#[cfg(not(unix))]
fn write_os_str(out: &mut impl Write, s: &OsStr) -> io::Result<()> {
    write!(out, "{}", s.to_string_lossy())
}

fn header(out: &mut impl Write, text: &str, dir: &OsStr) -> io::Result<()> {
    write!(out, "{} ", text.if_supports_color(Stream::Stdout, |t| t.bold()))?;
    write_os_str(out, dir)?;
    writeln!(out)
}

/// Print the report for one directory. The "first" and "shadowed" blocks are
/// independent; a directory that provides nothing new always says so.
pub fn write_report(
    out: &mut impl Write,
    report: &DirectoryReport,
    mode: ReportMode,
) -> io::Result<()> {
    if mode.show_first && !report.not_shadowed.is_empty() {
        header(out, "First in", &report.dir)?;
        for name in &report.not_shadowed {
            write!(out, "  ")?;
            write_os_str(out, name)?;
            writeln!(out)?;
        }
    } else if report.not_shadowed.is_empty() {
        header(out, "No files not shadowed in", &report.dir)?;
    }

    if mode.show_shadowed && !report.shadowed.is_empty() {
        header(out, "Shadowed in", &report.dir)?;
        for record in &report.shadowed {
            write!(out, "  ")?;
            write_os_str(out, &record.name)?;
            write!(out, " (")?;
            write_os_str(out, &record.origin)?;
            writeln!(out, ")")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tracker::ShadowRecord;

    fn render_bytes(report: &DirectoryReport, mode: ReportMode) -> Vec<u8> {
        owo_colors::set_override(false);
        let mut out = Vec::new();
        write_report(&mut out, report, mode).unwrap();
        out
    }

    fn render(report: &DirectoryReport, mode: ReportMode) -> String {
        String::from_utf8(render_bytes(report, mode)).unwrap()
    }

    fn sample() -> DirectoryReport {
        DirectoryReport {
            dir: "B".into(),
            not_shadowed: vec!["z".into()],
            shadowed: vec![ShadowRecord {
                name: "y".into(),
                origin: "A".into(),
            }],
        }
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(
            render(&sample(), ReportMode::default()),
            "Shadowed in B\n  y (A)\n"
        );
    }

    #[test]
    fn test_show_first() {
        let mode = ReportMode {
            show_first: true,
            show_shadowed: true,
        };
        assert_eq!(
            render(&sample(), mode),
            "First in B\n  z\nShadowed in B\n  y (A)\n"
        );
    }

    #[test]
    fn test_hide_shadowed() {
        let mode = ReportMode {
            show_first: false,
            show_shadowed: false,
        };
        assert_eq!(render(&sample(), mode), "");
    }

    #[test]
    fn test_nothing_new() {
        let report = DirectoryReport {
            dir: "C".into(),
            ..Default::default()
        };
        let mode = ReportMode {
            show_first: true,
            show_shadowed: true,
        };
        assert_eq!(render(&report, mode), "No files not shadowed in C\n");
        assert_eq!(
            render(&report, ReportMode::default()),
            "No files not shadowed in C\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_written_unchanged() {
        use std::os::unix::ffi::OsStrExt as _;

        let report = DirectoryReport {
            dir: OsStr::from_bytes(b"d\xff").to_owned(),
            not_shadowed: Vec::new(),
            shadowed: vec![ShadowRecord {
                name: OsStr::from_bytes(b"n\xfe").to_owned(),
                origin: OsStr::from_bytes(b"c\xfd").to_owned(),
            }],
        };
        assert_eq!(
            render_bytes(&report, ReportMode::default()),
            b"No files not shadowed in d\xff\nShadowed in d\xff\n  n\xfe (c\xfd)\n"
        );
    }
}
