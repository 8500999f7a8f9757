//! `wkhtmltopdf` document converter.

use slidegen_core::{DocumentConverter, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default converter executable, looked up on `PATH`.
pub const DEFAULT_BINARY: &str = "wkhtmltopdf";

/// Page orientation of the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// One slide-shaped page per screen.
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    fn as_arg(self) -> &'static str {
        match self {
            Self::Landscape => "Landscape",
            Self::Portrait => "Portrait",
        }
    }
}

/// Converts an HTML file to PDF by running `wkhtmltopdf`.
///
/// Pagination and styling are left entirely to the converter.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    binary: PathBuf,
    page_size: String,
    orientation: Orientation,
}

impl Default for WkhtmltopdfConverter {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            page_size: "A4".to_string(),
            orientation: Orientation::default(),
        }
    }
}

impl WkhtmltopdfConverter {
    /// Create a converter that runs `wkhtmltopdf` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific converter executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the page size (`A4`, `Letter`, ...).
    pub fn with_page_size(mut self, page_size: impl Into<String>) -> Self {
        self.page_size = page_size.into();
        self
    }

    /// Set the page orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    fn command(&self, markup: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--quiet")
            .arg("--enable-local-file-access")
            .args(["--page-size", self.page_size.as_str()])
            .args(["--orientation", self.orientation.as_arg()])
            .arg(markup)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl DocumentConverter for WkhtmltopdfConverter {
    /// Probe the executable with `--version`.
    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn remedy(&self) -> String {
        format!(
            "Install wkhtmltopdf (https://wkhtmltopdf.org) or pass its location with --wkhtmltopdf; tried `{}`.",
            self.binary.display()
        )
    }

    /// Converts into a temporary file beside `dest`, then renames it into
    /// place once the converter exits successfully.
    fn to_document(&self, markup: &Path, dest: &Path) -> Result<()> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let temp = tempfile::Builder::new()
            .prefix(".slidegen-")
            .suffix(".pdf")
            .tempfile_in(dir)?;

        log::debug!(
            "Running {} on {}",
            self.binary.display(),
            markup.display()
        );
        let output = self
            .command(markup, temp.path())
            .output()
            .map_err(|e| {
                Error::Conversion(format!(
                    "Failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Conversion(format!(
                "wkhtmltopdf failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        if fs::metadata(temp.path())?.len() == 0 {
            return Err(Error::Conversion(
                "wkhtmltopdf produced an empty file".to_string(),
            ));
        }

        temp.persist(dest).map_err(|e| Error::IoError(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let converter = WkhtmltopdfConverter::new()
            .with_page_size("Letter")
            .with_orientation(Orientation::Portrait);
        let cmd = converter.command(Path::new("in.html"), Path::new("out.pdf"));

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--quiet",
                "--enable-local-file-access",
                "--page-size",
                "Letter",
                "--orientation",
                "Portrait",
                "in.html",
                "out.pdf"
            ]
        );
        assert_eq!(cmd.get_program(), "wkhtmltopdf");
    }

    #[test]
    fn test_remedy_names_binary() {
        let converter = WkhtmltopdfConverter::new().with_binary("/opt/bin/wkhtmltopdf");
        assert!(converter.remedy().contains("/opt/bin/wkhtmltopdf"));
    }

    /// All process-spawning checks live in one test: scripts are written
    /// before anything is spawned, which avoids ETXTBSY on Linux.
    #[cfg(unix)]
    #[test]
    fn test_conversion_with_stand_in_binaries() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        };
        let copying = write_script(
            "copy-pdf",
            concat!(
                "if [ \"$1\" = \"--version\" ]; then exit 0; fi\n",
                "for arg; do src=\"$dst\"; dst=\"$arg\"; done\n",
                "cp \"$src\" \"$dst\""
            ),
        );
        let failing = write_script(
            "fail-pdf",
            concat!(
                "if [ \"$1\" = \"--version\" ]; then exit 0; fi\n",
                "echo 'page load failed' >&2\n",
                "exit 2"
            ),
        );

        let markup = dir.path().join("output.html");
        fs::write(&markup, "<h1>Q1 Report</h1>").unwrap();
        let out_dir = dir.path().join("out");

        // Missing binary
        let missing = WkhtmltopdfConverter::new().with_binary(dir.path().join("nope"));
        assert!(!missing.is_available());

        // Successful conversion
        let converter = WkhtmltopdfConverter::new().with_binary(&copying);
        assert!(converter.is_available());
        let dest = out_dir.join("output.pdf");
        converter.to_document(&markup, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "<h1>Q1 Report</h1>");

        // Failed conversion leaves nothing behind
        let converter = WkhtmltopdfConverter::new().with_binary(&failing);
        let dest = out_dir.join("failed.pdf");
        match converter.to_document(&markup, &dest) {
            Err(Error::Conversion(message)) => assert!(message.contains("page load failed")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!dest.exists());
        let names: Vec<String> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["output.pdf".to_string()]);
    }
}
