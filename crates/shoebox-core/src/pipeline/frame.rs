//! First-frame extraction from video files via ffmpeg.

use image::{DynamicImage, ImageFormat};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::PipelineError;

/// Something that can produce a still image from a video.
pub trait FrameGrabber: Send + Sync {
    /// Decode the first decodable frame of the video at `path`.
    fn first_frame(&self, path: &Path) -> Result<DynamicImage, PipelineError>;
}

/// [`FrameGrabber`] that pipes one PNG frame out of the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegFrameGrabber {
    program: PathBuf,
}

impl FfmpegFrameGrabber {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FrameGrabber for FfmpegFrameGrabber {
    fn first_frame(&self, path: &Path) -> Result<DynamicImage, PipelineError> {
        let frame_error = |message: String| PipelineError::FrameExtract {
            path: path.to_path_buf(),
            message,
        };

        let output = Command::new(&self.program)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    frame_error(format!("{} not found", self.program.display()))
                }
                _ => frame_error(format!("cannot run {}: {}", self.program.display(), e)),
            })?;

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().last().unwrap_or("no frame produced").trim();
            return Err(frame_error(format!("{} ({})", reason, output.status)));
        }

        image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
            .map_err(|e| frame_error(format!("undecodable frame: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ffmpeg_is_a_per_file_error() {
        let grabber = FfmpegFrameGrabber::new("/nonexistent/bin/ffmpeg-shoebox");
        let err = grabber.first_frame(Path::new("clip.mp4")).unwrap_err();

        assert!(matches!(err, PipelineError::FrameExtract { .. }));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("not found"));
    }
}
