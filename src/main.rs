//! Application entry point — live prosody monitor.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Open the default input device and start the cpal stream.
//! 4. Spawn the worker thread that owns the pipeline and the recorder.
//! 5. Run the tokio command/event loop: stdin commands in, worker events
//!    out, until `quit` or EOF.
//!
//! # Commands
//!
//! | Input | Effect |
//! |-------|--------|
//! | `record` / `r` | open a capture session |
//! | `stop` / `s`   | close it, validate, save the WAV |
//! | `quit` / `q`   | exit |
//!
//! Pass `--json` to print every feature frame as one JSON line instead of
//! the periodic human-readable status line.

use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use prosody_engine::{
    audio::{AudioCapture, AudioChunk},
    config::{AppConfig, AppPaths},
    dsp::{EnergyContour, FeatureFrame, Tonality},
    pipeline::ProsodyPipeline,
    record::{encode_wav, ClipQuality, PcmCapture},
};

// ---------------------------------------------------------------------------
// Worker protocol
// ---------------------------------------------------------------------------

/// Commands from the terminal loop to the audio worker.
enum WorkerCommand {
    StartRecording,
    StopRecording,
}

/// Events from the audio worker back to the terminal loop.
enum WorkerEvent {
    Feature(FeatureFrame),
    RecordingStarted,
    RecordingStopped {
        wav: Vec<u8>,
        duration_secs: f32,
    },
    RecordingRejected {
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Audio worker
// ---------------------------------------------------------------------------

/// Owns the pipeline and the recorder; the only context that touches
/// either.  Consumes the chunk channel fed by the cpal callback and runs
/// until the stream is torn down.
fn run_worker(
    mut pipeline: ProsodyPipeline,
    mut recorder: PcmCapture,
    quality: ClipQuality,
    chunk_rx: std_mpsc::Receiver<AudioChunk>,
    command_rx: std_mpsc::Receiver<WorkerCommand>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
) {
    pipeline.start();

    while let Ok(chunk) = chunk_rx.recv() {
        // Apply any pending commands before processing the chunk, so a
        // recording starts exactly on a chunk boundary.
        while let Ok(command) = command_rx.try_recv() {
            match command {
                WorkerCommand::StartRecording => {
                    recorder.start(pipeline.sample_rate());
                    let _ = event_tx.send(WorkerEvent::RecordingStarted);
                }
                WorkerCommand::StopRecording => {
                    let Some(session) = recorder.take_session() else {
                        continue;
                    };
                    let sample_rate = session.sample_rate();
                    let samples = session.into_samples();
                    let duration_secs = samples.len() as f32 / sample_rate.max(1) as f32;

                    let event = match quality.validate(&samples, sample_rate) {
                        Ok(()) => WorkerEvent::RecordingStopped {
                            wav: encode_wav(&samples, sample_rate),
                            duration_secs,
                        },
                        Err(e) => WorkerEvent::RecordingRejected {
                            reason: e.to_string(),
                        },
                    };
                    let _ = event_tx.send(event);
                }
            }
        }

        let mono = chunk.into_mono();
        recorder.push_chunk(&mono);

        for frame in pipeline.process_chunk(&mono) {
            if event_tx.send(WorkerEvent::Feature(frame)).is_err() {
                pipeline.stop();
                return;
            }
        }
    }

    // Stream torn down: discard any half-open recording and go Idle.
    pipeline.stop();
    if recorder.take_session().is_some() {
        log::warn!("worker: audio source closed mid-recording, session discarded");
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// One-line live status for a feature frame.
fn status_line(frame: &FeatureFrame) -> String {
    let pitch = match frame.f0 {
        Some(hz) => format!("{hz:6.1} Hz"),
        None => "   --   ".into(),
    };
    format!(
        "t={:7.0} ms  rms={:.3}  zcr={:.3}  f0={pitch}  {}  [{}]",
        frame.timestamp_ms,
        frame.rms,
        frame.zcr,
        if frame.voiced { "voiced  " } else { "unvoiced" },
        Tonality::classify(frame.f0).label(),
    )
}

/// Render an energy contour as a bar string for the terminal.
fn contour_bar(contour: &EnergyContour) -> String {
    const RAMP: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let peak = contour.peak().max(1e-6);
    contour
        .bins
        .iter()
        .map(|&b| {
            let idx = ((b / peak) * (RAMP.len() - 1) as f32).round() as usize;
            RAMP[idx.min(RAMP.len() - 1)]
        })
        .collect()
}

/// Destination file for a finished recording.
fn recording_path(config: &AppConfig, paths: &AppPaths) -> PathBuf {
    let dir = config
        .recording
        .output_dir
        .clone()
        .unwrap_or_else(|| paths.recordings_dir.clone());
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("recording-{stamp}.wav"))
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("prosody monitor starting up");

    let json_mode = std::env::args().any(|arg| arg == "--json");

    // 2. Config
    let config = AppConfig::load().context("loading settings.toml")?;
    let paths = AppPaths::new();

    // 3. Audio source — fail fast when no device is available.
    let capture = AudioCapture::new().context("opening audio input")?;
    let sample_rate = capture.sample_rate();

    let pipeline = ProsodyPipeline::new(sample_rate, &config.analysis, config.vad);
    let recorder = PcmCapture::new();
    let quality = config.recording.clip_quality();

    let (chunk_tx, chunk_rx) = std_mpsc::channel();
    let (command_tx, command_rx) = std_mpsc::channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    // The handle keeps the stream alive; dropping it at the end of main
    // closes the chunk channel and lets the worker drain out.
    let stream_handle = capture.start(chunk_tx).context("starting audio stream")?;

    // 4. Worker thread
    let worker = thread::spawn(move || {
        run_worker(pipeline, recorder, quality, chunk_rx, command_rx, event_tx)
    });

    println!("live prosody monitor @ {sample_rate} Hz — commands: record / stop / quit");

    // 5. Command/event loop
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut frame_count: u64 = 0;
    let mut session_frames: Option<Vec<FeatureFrame>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => break, // stdin closed
                    Some(line) => match line.trim() {
                        "record" | "r" => {
                            let _ = command_tx.send(WorkerCommand::StartRecording);
                        }
                        "stop" | "s" => {
                            let _ = command_tx.send(WorkerCommand::StopRecording);
                        }
                        "quit" | "q" => break,
                        "" => {}
                        other => println!("unknown command {other:?} — record / stop / quit"),
                    },
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    WorkerEvent::Feature(frame) => {
                        if let Some(frames) = session_frames.as_mut() {
                            frames.push(frame.clone());
                        }
                        if json_mode {
                            println!("{}", serde_json::to_string(&frame)?);
                        } else {
                            frame_count += 1;
                            // 20 ms hops → one status line per second
                            if frame_count % 50 == 0 {
                                println!("{}", status_line(&frame));
                            }
                        }
                    }
                    WorkerEvent::RecordingStarted => {
                        session_frames = Some(Vec::new());
                        println!("recording…");
                    }
                    WorkerEvent::RecordingStopped { wav, duration_secs } => {
                        let path = recording_path(&config, &paths);
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("creating {}", parent.display()))?;
                        }
                        std::fs::write(&path, &wav)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("saved {:.2} s to {}", duration_secs, path.display());

                        if let Some(frames) = session_frames.take() {
                            let contour = EnergyContour::from_frames(&frames, 40);
                            println!("energy  {}", contour_bar(&contour));
                        }
                    }
                    WorkerEvent::RecordingRejected { reason } => {
                        session_frames = None;
                        println!("recording rejected: {reason}");
                    }
                }
            }
        }
    }

    // Tear down: dropping the stream handle stops the callback, which
    // closes the chunk channel and ends the worker loop.
    drop(stream_handle);
    drop(command_tx);
    if worker.join().is_err() {
        log::error!("worker thread panicked");
    }

    log::info!("prosody monitor shut down");
    Ok(())
}
