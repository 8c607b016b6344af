//! tts-narrator - Turn long text into one continuous WAV narration

mod audio;
mod config;
mod error;
mod input;
mod narrator;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::NarratorConfig;
use indicatif::{ProgressBar, ProgressStyle};
use narrator::{ChunkState, Narration, NarrationProgress, Narrator};
use std::path::{Path, PathBuf};
use text::TextChunk;

/// Characters of chunk text shown per dry-run line.
const DRY_RUN_PREVIEW_CHARS: usize = 80;

#[derive(Parser, Debug)]
#[command(name = "tts-narrator")]
#[command(about = "Narrate long text into a single WAV file using a speech server", long_about = None)]
#[command(version)]
struct Args {
    /// Text file to narrate ("-" reads stdin)
    input: Option<PathBuf>,

    /// Output WAV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Speech server base URL
    #[arg(long)]
    server: Option<String>,

    /// Voice preset name
    #[arg(long)]
    voice: Option<String>,

    /// Seed for deterministic output
    #[arg(long)]
    seed: Option<i64>,

    /// Sampling temperature (default 0.9)
    #[arg(long)]
    temperature: Option<f32>,

    /// Playback speed multiplier (default 1.0)
    #[arg(long)]
    speed: Option<f32>,

    /// Silence between chunks in seconds (default 0.4, 0 disables)
    #[arg(long)]
    gap: Option<f64>,

    /// Merge chunks shorter than this many characters
    #[arg(long)]
    min_chars: Option<usize>,

    /// Split sentences longer than this many characters
    #[arg(long)]
    max_chars: Option<usize>,

    /// Show the chunk plan without contacting the server
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default speech server
    SetServer {
        /// Base URL, e.g. http://localhost:8090
        url: String,
    },
    /// Set default voice preset
    SetVoice {
        /// Voice name
        name: String,
    },
    /// Set default gap between chunks
    SetGap {
        /// Seconds (0 disables)
        seconds: f64,
    },
    /// Set default temperature
    SetTemperature {
        /// Value (0.05-2.0)
        value: f32,
    },
    /// Set default speed
    SetSpeed {
        /// Value (0.25-4.0)
        value: f32,
    },
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    fn apply_to(&self, config: &mut NarratorConfig) {
        if let Some(server) = &self.server {
            config.server = server.clone();
        }
        if let Some(voice) = &self.voice {
            config.voice = Some(voice.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(gap) = self.gap {
            config.gap = gap.max(0.0);
        }
        if let Some(min_chars) = self.min_chars {
            config.min_chars = min_chars;
        }
        if let Some(max_chars) = self.max_chars {
            config.max_chars = max_chars;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let input_path = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Input path is required. Run 'tts-narrator --help' for usage."))?;

    let mut config = NarratorConfig::load().context("Failed to load configuration")?;
    args.apply_to(&mut config);

    if args.debug {
        eprintln!("Input: {}", input_path.display());
        eprintln!("Server: {}", config.server);
        eprintln!("Voice: {:?}", config.voice);
        eprintln!("Seed: {:?}", config.seed);
        eprintln!("Temperature: {}", config.temperature);
        eprintln!("Speed: {}", config.speed);
        eprintln!("Gap: {}s", config.gap);
        eprintln!("Chunk limits: {}-{} chars", config.min_chars, config.max_chars);
    }

    let source = input::read_source(&input_path).await?;
    let chunks = text::process_text(&source, config.limits());
    if chunks.is_empty() {
        return Err(error::NarrationError::Input("no synthesizable text found".to_string()).into());
    }

    if args.dry_run {
        print_chunk_plan(&source, &chunks);
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Output path is required (-o <OUTPUT>)"))?;

    let provider = speech_client::get_provider(&config.server, config.timeout_secs)
        .context("Failed to create speech client")?;
    let narrator = Narrator::new(provider.as_ref(), config.settings());

    narrator.ensure_service_ready(&config.server).await?;
    eprintln!(
        "Narrating {} chunks via {} ({})",
        chunks.len(),
        config.server,
        provider.name()
    );

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let result = narrator
        .narrate_to_file(&chunks, &output_path, |progress| {
            report_progress(&pb, progress)
        })
        .await;

    match result {
        Ok(narration) => {
            pb.finish_with_message("done");
            print_summary(&output_path, &narration);
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            Err(e.into())
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "tts_narrator=debug,speech_client=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn report_progress(pb: &ProgressBar, progress: &NarrationProgress<'_>) {
    let outcome = progress.outcome;
    if outcome.state == ChunkState::Synthesizing {
        pb.set_message(outcome.preview.clone());
    }
    if outcome.state.is_resolved() {
        pb.set_position(progress.completed as u64);
        pb.set_message(format!("{} ok, {} failed", progress.accepted, progress.rejected));
    }
    if let Some(line) = progress_line(progress) {
        pb.println(line);
    }
}

/// Console line for a finished chunk. Rejections are already reported by
/// the narrator's warning log, so only accepted chunks get a line here.
fn progress_line(progress: &NarrationProgress<'_>) -> Option<String> {
    let outcome = progress.outcome;
    (outcome.state == ChunkState::Accepted).then(|| {
        format!(
            "  [{}/{}] {:.1}s audio in {:.1}s",
            outcome.index + 1,
            progress.total,
            outcome.audio_secs,
            outcome.elapsed.as_secs_f64()
        )
    })
}

/// Print the chunk plan for `--dry-run`.
fn print_chunk_plan(source: &str, chunks: &[TextChunk]) {
    let chunk_chars: usize = chunks.iter().map(TextChunk::len).sum();
    println!(
        "Input: {} chars -> {} chunks ({} chars)",
        text::char_len(source),
        chunks.len(),
        chunk_chars
    );
    for chunk in chunks {
        println!("{}", plan_line(chunk));
    }
}

/// One dry-run line: 1-based position, length, and the start of the text.
fn plan_line(chunk: &TextChunk) -> String {
    format!(
        "  [{:>3}] ({:>3} chars) {}",
        chunk.index + 1,
        chunk.len(),
        chunk.preview(DRY_RUN_PREVIEW_CHARS)
    )
}

fn print_summary(output_path: &Path, narration: &Narration) {
    let size_kb = narration.wav.len() as f64 / 1024.0;
    let synthesis_secs = narration.synthesis_time.as_secs_f64();

    eprintln!();
    eprintln!("Output: {}", output_path.display());
    eprintln!(
        "Duration: {:.1}s ({:.1} min)",
        narration.total_duration_secs,
        narration.total_duration_secs / 60.0
    );
    eprintln!("Format: {}", narration.format);
    eprintln!("Size: {:.0} KB", size_kb);
    eprintln!(
        "Chunks: {}/{} ({} failed)",
        narration.accepted, narration.chunk_count, narration.rejected
    );
    eprintln!(
        "Synthesis time: {:.1}s ({:.1} min)",
        synthesis_secs,
        synthesis_secs / 60.0
    );
    eprintln!("Realtime factor: {:.2}x", narration.realtime_factor());

    let failed: Vec<_> = narration
        .outcomes
        .iter()
        .filter(|o| o.state == ChunkState::Rejected)
        .collect();
    if !failed.is_empty() {
        eprintln!("\nFailed chunks:");
        for outcome in failed {
            eprintln!(
                "  [{}] \"{}\": {}",
                outcome.index,
                outcome.preview,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarratorConfig::load()?;
            println!("Configuration file: {:?}", NarratorConfig::config_path()?);
            println!();
            println!("server = \"{}\"", config.server);
            match &config.voice {
                Some(voice) => println!("voice = \"{}\"", voice),
                None => println!("voice = (server default)"),
            }
            match config.seed {
                Some(seed) => println!("seed = {}", seed),
                None => println!("seed = (random)"),
            }
            println!("temperature = {}", config.temperature);
            println!("speed = {}", config.speed);
            println!("gap = {}", config.gap);
            println!("min_chars = {}", config.min_chars);
            println!("max_chars = {}", config.max_chars);
            println!("timeout_secs = {}", config.timeout_secs);
        }
        ConfigAction::SetServer { url } => {
            let mut config = NarratorConfig::load()?;
            config.server = url.trim_end_matches('/').to_string();
            config.save()?;
            println!("Default server set to: {}", config.server);
        }
        ConfigAction::SetVoice { name } => {
            let mut config = NarratorConfig::load()?;
            config.voice = Some(name.clone());
            config.save()?;
            println!("Default voice set to: {}", name);
        }
        ConfigAction::SetGap { seconds } => {
            let mut config = NarratorConfig::load()?;
            config.gap = seconds.max(0.0);
            config.save()?;
            println!("Default gap set to: {}s", config.gap);
        }
        ConfigAction::SetTemperature { value } => {
            let mut config = NarratorConfig::load()?;
            config.temperature = value.clamp(0.05, 2.0);
            config.save()?;
            println!("Default temperature set to: {}", config.temperature);
        }
        ConfigAction::SetSpeed { value } => {
            let mut config = NarratorConfig::load()?;
            config.speed = value.clamp(0.25, 4.0);
            config.save()?;
            println!("Default speed set to: {}", config.speed);
        }
    }
    Ok(())
}
