//! The `shoebox import` command.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use shoebox_core::output::OutputFormat as CoreOutputFormat;
use shoebox_core::pipeline::thumbnail::MAX_THUMBNAIL_HEIGHT;
use shoebox_core::{
    Config, ImportEvent, ImportHandle, ImportStats, Importer, OutputWriter, TimelineEntry,
    TimelineSummary,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The whole timeline as one JSON array
    Json,
    /// One timeline entry per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `import` command.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Folder to import (files in subfolders are counted but not imported)
    #[arg(required = true)]
    pub folder: PathBuf,

    /// Thumbnail height in pixels [default: thumbnail.height from config]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_THUMBNAIL_HEIGHT as i64))]
    pub height: Option<u32>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Media probe executable
    #[arg(long, env = "SHOEBOX_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Frame extraction executable
    #[arg(long, env = "SHOEBOX_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,
}

/// Execute the import command.
pub async fn execute(args: ImportArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(ffprobe) = args.ffprobe.clone() {
        config.tools.ffprobe = ffprobe;
    }
    if let Some(ffmpeg) = args.ffmpeg.clone() {
        config.tools.ffmpeg = ffmpeg;
    }

    let folder = expand(&args.folder);
    let height = args.height.unwrap_or(config.thumbnail.height);

    let importer = Importer::new(&config);
    let mut handle = importer.start(&folder, height);

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    let outcome = drive(&mut handle, &progress).await;
    progress.finish_and_clear();
    let entries = outcome?;
    let stats = handle.stats().await?;

    let written = write_output(&entries, args.output.as_deref(), args.format.into())?;
    tracing::debug!("Wrote {} timeline entries", written);
    print_summary(&TimelineSummary::from_entries(&entries), &stats);

    Ok(())
}

/// Follow the event stream to its terminal event.
async fn drive(handle: &mut ImportHandle, progress: &ProgressBar) -> anyhow::Result<Vec<TimelineEntry>> {
    while let Some(event) = handle.next_event().await {
        match event {
            ImportEvent::ProgressLabel(label) => progress.set_style(progress_style(&label)?),
            ImportEvent::ProgressMax(max) => progress.set_length(max as u64),
            ImportEvent::ProgressIncrement => progress.inc(1),
            ImportEvent::Delivered(entries) => return Ok(entries),
            ImportEvent::Failed(err) => return Err(err.into()),
        }
    }
    anyhow::bail!("import worker stopped without a result")
}

/// Progress bar style around the label the job sent.
fn progress_style(label: &str) -> anyhow::Result<ProgressStyle> {
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {label}"
        ))?
        .progress_chars("##-");
    Ok(style)
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

/// Write the timeline and return the number of entries written.
fn write_output(
    entries: &[TimelineEntry],
    output: Option<&Path>,
    format: CoreOutputFormat,
) -> anyhow::Result<usize> {
    let written = match output {
        Some(path) => {
            let file = File::create(path)?;
            let written = write_timeline(BufWriter::new(file), entries, format)?;
            tracing::info!("Timeline written to {:?}", path);
            written
        }
        None => write_timeline(std::io::stdout().lock(), entries, format)?,
    };
    Ok(written)
}

fn write_timeline<W: Write>(
    writer: W,
    entries: &[TimelineEntry],
    format: CoreOutputFormat,
) -> std::io::Result<usize> {
    let mut writer = OutputWriter::new(writer, format, false);
    writer.write_timeline(entries)?;
    writer.flush()?;
    Ok(writer.entries_written())
}

/// Print a formatted summary after the import.
fn print_summary(summary: &TimelineSummary, stats: &ImportStats) {
    let nested = stats.eligible.saturating_sub(stats.attempted);

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", summary.images);
    eprintln!("    Videos:       {:>8}", summary.videos);
    if summary.unknown_date > 0 {
        eprintln!("    Undated:      {:>8}", summary.unknown_date);
    }
    if stats.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped);
    }
    if nested > 0 {
        eprintln!("    In subfolders:{:>8}", nested);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Eligible:     {:>8}", stats.eligible);
    eprintln!("    Thumbnails:   {:>8}", stats.produced);
    eprintln!("    Dates:        {:>8}", summary.sections);
    eprintln!("    Duration:     {:>7.1}s", stats.elapsed_seconds);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoebox_core::{CaptureDate, DateSection};

    #[test]
    fn test_progress_style_accepts_job_label() {
        assert!(progress_style(shoebox_core::pipeline::PROGRESS_LABEL).is_ok());
    }

    #[test]
    fn test_format_mapping() {
        assert_eq!(CoreOutputFormat::from(OutputFormat::Json), CoreOutputFormat::Json);
        assert_eq!(
            CoreOutputFormat::from(OutputFormat::Jsonl),
            CoreOutputFormat::JsonLines
        );
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.jsonl");
        let entries = vec![TimelineEntry::Section(DateSection::new(CaptureDate::UNKNOWN))];

        let written = write_output(&entries, Some(&path), CoreOutputFormat::JsonLines).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\"type\":\"section\""));
    }

    #[test]
    fn test_height_is_bounded() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cmd {
            #[command(flatten)]
            import: ImportArgs,
        }

        assert!(Cmd::try_parse_from(["shoebox", "./DCIM", "--height", "120"]).is_ok());
        assert!(Cmd::try_parse_from(["shoebox", "./DCIM", "--height", "0"]).is_err());
        let too_tall = (MAX_THUMBNAIL_HEIGHT + 1).to_string();
        assert!(Cmd::try_parse_from(["shoebox", "./DCIM", "--height", too_tall.as_str()]).is_err());
    }

    #[test]
    fn test_expand_leaves_plain_paths() {
        assert_eq!(expand(Path::new("./DCIM")), PathBuf::from("./DCIM"));
    }

    #[tokio::test]
    async fn test_unreadable_folder_is_an_error() {
        let args = ImportArgs {
            folder: PathBuf::from("/nonexistent/shoebox/import"),
            height: Some(50),
            output: None,
            format: OutputFormat::Json,
            no_progress: true,
            ffprobe: None,
            ffmpeg: None,
        };
        let err = execute(args, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("Cannot read folder"));
    }
}
