//! Session replay from JSON Lines frame signals.
//!
//! A reader task parses one `FrameSignals` object per line and pushes it
//! into a bounded channel; the recorder on the other end is the only writer
//! to the session, so frames are counted strictly in arrival order.

use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use log::{info, warn};
use proctorwatch_core::{
    classify_frame, Config, Event, FrameSignals, Report, ReportFormat, ReportStore,
    SessionMonitor,
};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::mpsc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Frames buffered between the reader and the recorder.
const FRAME_QUEUE: usize = 64;

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl From<ReportFormat> for Format {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Text => Format::Text,
            ReportFormat::Json => Format::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Replay a JSON Lines stream of frame signals and print the report
    Run {
        /// Input file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
        /// Report format (defaults to report.format from config)
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Subject label (defaults to session.subject from config)
        #[arg(long)]
        subject: Option<String>,
        /// Do not store the report in history
        #[arg(long)]
        no_save: bool,
        /// Print session events to stderr as JSON lines
        #[arg(long)]
        events: bool,
    },
    /// Classify a single frame signals object
    Classify {
        /// Input file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct Classification {
    state: proctorwatch_core::FrameState,
    status: &'static str,
}

pub fn run(action: SessionAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match action {
        SessionAction::Run {
            input,
            format,
            subject,
            no_save,
            events,
        } => {
            let subject = subject.unwrap_or_else(|| config.session.subject.clone());
            let options = ReplayOptions {
                print_events: events,
                announce_focus_loss: config.session.announce_focus_loss,
            };
            let report = runtime.block_on(async {
                let reader = open_input(&input).await?;
                replay(reader, SessionMonitor::with_subject(subject), options).await
            })
            .map_err(unbox_send)?;

            match format.unwrap_or_else(|| config.report.format.into()) {
                Format::Text => print!("{report}"),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }

            if config.report.save_history && !no_save {
                ReportStore::open()?.save_report(&report)?;
                info!("saved report {}", report.session_id);
            }
        }
        SessionAction::Classify { input } => {
            let signals: FrameSignals = runtime.block_on(async {
                let mut reader = open_input(&input).await?;
                let mut raw = String::new();
                reader.read_to_string(&mut raw).await?;
                Ok::<_, BoxError>(serde_json::from_str(&raw)?)
            })
            .map_err(unbox_send)?;
            let state = classify_frame(&signals);
            let out = Classification {
                state,
                status: state.status_text(),
            };
            println!("{}", serde_json::to_string(&out)?);
        }
    }
    Ok(())
}

fn unbox_send(e: BoxError) -> Box<dyn std::error::Error> {
    e
}

#[derive(Clone, Copy)]
struct ReplayOptions {
    print_events: bool,
    announce_focus_loss: bool,
}

async fn open_input(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, BoxError> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(tokio::io::stdin())))
    } else {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parse frames until EOF. Returns the number of lines skipped.
async fn read_frames<R>(reader: R, tx: mpsc::Sender<FrameSignals>) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0u64;
    let mut skipped = 0u64;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<FrameSignals>(line) {
            Ok(signals) => {
                if tx.send(signals).await.is_err() {
                    // recorder stopped early
                    break;
                }
            }
            Err(e) => {
                warn!("skipping line {line_no}: {e}");
                skipped += 1;
            }
        }
    }
    Ok(skipped)
}

async fn replay(
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    monitor: SessionMonitor,
    options: ReplayOptions,
) -> Result<Report, BoxError> {
    let (tx, mut rx) = mpsc::channel(FRAME_QUEUE);
    let reader_task = tokio::spawn(read_frames(reader, tx));

    monitor.start()?;
    while let Some(signals) = rx.recv().await {
        monitor.record(&signals)?;
        emit(monitor.drain_events(), options)?;
    }

    let skipped = reader_task.await??;
    if skipped > 0 {
        warn!("{skipped} malformed line(s) ignored");
    }

    let report = monitor.finish()?;
    emit(monitor.drain_events(), options)?;
    Ok(report)
}

fn emit(events: Vec<Event>, options: ReplayOptions) -> Result<(), BoxError> {
    for event in events {
        if options.announce_focus_loss {
            if let Event::FocusLost { frame_index, .. } = &event {
                eprintln!("Alert! Window change detected at frame {frame_index}.");
            }
        }
        if options.print_events {
            eprintln!("{}", serde_json::to_string(&event)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctorwatch_core::Verdict;

    fn quiet() -> ReplayOptions {
        ReplayOptions {
            print_events: false,
            announce_focus_loss: false,
        }
    }

    fn input(text: &'static str) -> Box<dyn AsyncBufRead + Unpin + Send> {
        Box::new(BufReader::new(text.as_bytes()))
    }

    #[tokio::test]
    async fn replay_counts_every_valid_line() {
        let text = "{\"window_focused\": false}\n\n{\"window_focused\": true}\nnot json\n{}\n";
        let report = replay(input(text), SessionMonitor::new(), quiet())
            .await
            .unwrap();
        assert_eq!(report.assessment.total_frames, 3);
        assert_eq!(report.assessment.breakdown.focus_lost_frames, 1);
        assert_eq!(report.assessment.breakdown.no_face_frames, 2);
        assert_eq!(report.verdict(), Verdict::Review);
    }

    #[tokio::test]
    async fn partial_landmarks_still_count_the_frame() {
        let text = concat!(
            r#"{"window_focused": false, "landmarks": {"nose": {"x": 1, "y": 1}, "left_face": {"x": 0, "y": 1}, "right_face": {"x": 2, "y": 1}, "chin": {"x": 1, "y": 2}}}"#,
            "\n",
            r#"{"landmarks": {"nose": {"x": 1, "y": 1}}}"#,
            "\n",
        );
        let monitor = SessionMonitor::new();
        let report = replay(input(text), monitor, quiet()).await.unwrap();
        let breakdown = &report.assessment.breakdown;
        assert_eq!(report.assessment.total_frames, 2);
        assert_eq!(breakdown.focus_lost_frames, 1);
        assert_eq!(breakdown.focus_lost_events, 1);
        assert_eq!(breakdown.no_face_frames, 1);
    }

    #[tokio::test]
    async fn raw_detector_ids_are_understood() {
        let text = "{\"objects\": [{\"class\": 67, \"confidence\": 0.9, \"bbox\": {\"x1\": 0, \"y1\": 0, \"x2\": 4, \"y2\": 4}}]}\n";
        let report = replay(input(text), SessionMonitor::new(), quiet())
            .await
            .unwrap();
        assert_eq!(report.assessment.total_frames, 1);
        assert_eq!(report.assessment.breakdown.object_alert_frames, 1);
    }

    #[tokio::test]
    async fn empty_input_is_an_empty_session() {
        let report = replay(input(""), SessionMonitor::new(), quiet())
            .await
            .unwrap();
        assert_eq!(report.assessment.total_frames, 0);
        assert_eq!(report.verdict(), Verdict::Pass);
    }
}
