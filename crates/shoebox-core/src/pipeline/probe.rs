//! External media probe (ffprobe) invocation.
//!
//! The probe is run without an output file, so it prints its container report
//! to stderr and may exit non-zero. Both streams are captured and treated as
//! plain text; only failing to launch the executable is an error here.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ProbeError;

/// Something that can describe a video container as text.
pub trait MediaProbe: Send + Sync {
    /// Confirm the probe can be launched at all.
    fn ensure_available(&self) -> Result<(), ProbeError> {
        Ok(())
    }

    /// Run the probe against `path` and return its combined report.
    fn probe(&self, path: &Path) -> Result<String, ProbeError>;
}

/// [`MediaProbe`] backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeCommand {
    program: PathBuf,
}

impl FfprobeCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn launch_error(&self, path: &Path, err: io::Error) -> ProbeError {
        if err.kind() == io::ErrorKind::NotFound {
            ProbeError::NotFound {
                program: self.program.clone(),
            }
        } else {
            ProbeError::Failed {
                path: path.to_path_buf(),
                message: format!("cannot run {}: {}", self.program.display(), err),
            }
        }
    }
}

impl MediaProbe for FfprobeCommand {
    fn ensure_available(&self) -> Result<(), ProbeError> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.launch_error(&self.program, e))?;
        if !status.success() {
            tracing::debug!("{:?} -version exited with {}", self.program, status);
        }
        Ok(())
    }

    fn probe(&self, path: &Path) -> Result<String, ProbeError> {
        let output = Command::new(&self.program)
            .arg("-hide_banner")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.launch_error(path, e))?;

        if !output.status.success() {
            tracing::trace!("Probe exited with {} for {:?}", output.status, path);
        }

        let mut report = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.stdout.is_empty() {
            report.push('\n');
            report.push_str(&String::from_utf8_lossy(&output.stdout));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_not_found() {
        let probe = FfprobeCommand::new("/nonexistent/bin/ffprobe-shoebox");

        assert!(matches!(
            probe.ensure_available(),
            Err(ProbeError::NotFound { .. })
        ));
        match probe.probe(Path::new("clip.mp4")) {
            Err(ProbeError::NotFound { program }) => {
                assert_eq!(program, PathBuf::from("/nonexistent/bin/ffprobe-shoebox"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_report_captures_stderr_of_failing_probe() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-ffprobe");
        std::fs::write(
            &script,
            "#!/bin/sh\necho \"    creation_time   : 2019-07-14T08:30:00.000000Z\" >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = FfprobeCommand::new(&script);
        let report = probe.probe(Path::new("clip.mp4")).unwrap();
        assert!(report.contains("creation_time"));
        assert!(report.contains("2019-07-14T08:30:00"));
    }
}
