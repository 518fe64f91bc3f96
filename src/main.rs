//! moodpop CLI
//!
//! Usage:
//!   moodpop --sample "happy=0.7 sad=0.1 angry=0.05"   # Single classification
//!   moodpop --interactive                             # Interactive classifier mode
//!   moodpop --simulate                                # Headless scripted run
//!   moodpop --serve                                   # HTTP API server
//!   moodpop --sample "happy=0.9" --json               # JSON output

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use moodpop::core::{save_report, run_server, EmotionClassifier, GameSession, ReportWriter, SignalSmoother};
use moodpop::types::{ClassifyOutput, Emotion, ExpressionSample, GameMode, PlayArea, Point};
use moodpop::{DEFAULT_BUBBLES, FRAME_MS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "moodpop",
    version = VERSION,
    about = "moodpop - Affect-adaptive bubble popping core",
    long_about = "moodpop turns a stream of facial-expression scores into a playable\n\
                  difficulty signal: samples are smoothed, classified into a stable\n\
                  emotion, and fed into the bubble field as speed and size.\n\n\
                  Modes:\n  \
                  --sample       Classify one sample and exit\n  \
                  --interactive  Feed samples line by line, watch the classifier\n  \
                  --simulate     Headless scripted run, prints the final report\n  \
                  --serve        HTTP API server mode\n\n\
                  Emotions:\n  \
                  HAPPY    - Speeds bubbles up in bio mode\n  \
                  SAD      - Slows bubbles down in bio mode\n  \
                  ANGRY    - Grows bubbles in bio mode\n  \
                  NEUTRAL  - Baseline difficulty"
)]
struct Args {
    /// Classify a single sample, e.g. "happy=0.7 sad=0.1 angry=0.05"
    #[arg(long)]
    sample: Option<String>,

    /// Interactive mode - read sample lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Headless simulated run
    #[arg(long)]
    simulate: bool,

    /// Run as HTTP API server
    #[arg(long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Game mode for simulate/serve sessions
    #[arg(short, long, value_enum, default_value_t = GameMode::Classic)]
    mode: GameMode,

    /// Run duration in seconds
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// RNG seed for reproducible simulated runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show smoothed-share breakdown
    #[arg(long)]
    verbose: bool,

    /// Directory for run reports (default: ./reports)
    #[arg(long, default_value = "./reports")]
    report_dir: String,

    /// Disable report persistence
    #[arg(long)]
    no_report: bool,

    /// Shared token required on mutating API routes
    #[arg(long)]
    auth_token: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.serve {
        run_serve(&args).await;
    } else if args.simulate {
        run_simulate(&args);
    } else if let Some(ref line) = args.sample {
        run_single(line, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args);
    }
}

/// Classify one sample and exit
fn run_single(line: &str, args: &Args) {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();

    let sample = match parse_sample_line(line) {
        Ok(sample) => sample,
        Err(e) => {
            eprintln!("invalid sample: {}", e);
            std::process::exit(2);
        }
    };

    let state = smoother.update(sample.as_ref());
    let output = classifier.classify(&state, Instant::now());

    print_output(&output, &smoother, args);
}

/// Interactive classifier mode
fn run_interactive(args: &Args) {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();

    print_header("Interactive Mode", args.no_color);
    println!("Enter samples as 'happy=0.7 sad=0.1 angry=0.05' and press Enter.");
    println!("Type 'none' for a missing-face cycle, 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        let prompt = format_prompt(&classifier, args.no_color);
        print!("{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Samples: {}", smoother.update_count());
            break;
        }
        if line.is_empty() {
            continue;
        }

        let sample = match parse_sample_line(line) {
            Ok(sample) => sample,
            Err(e) => {
                println!(
                    "{}invalid sample: {}{}",
                    if args.no_color { "" } else { "\x1b[33m" },
                    e,
                    if args.no_color { "" } else { "\x1b[0m" }
                );
                continue;
            }
        };

        let state = smoother.update(sample.as_ref());
        let output = classifier.classify(&state, Instant::now());

        print_output(&output, &smoother, args);
        if !args.json && !args.no_color && output.switched {
            print_switch_message(&output);
        }
    }
}

/// Headless scripted run over a synthetic clock
fn run_simulate(args: &Args) {
    let area = PlayArea::default();
    let start = Instant::now();
    let mut session = GameSession::new(
        args.mode,
        args.duration,
        DEFAULT_BUBBLES,
        args.seed,
        start,
        &area,
    );

    print_header("Simulated Run", args.no_color);
    println!(
        "mode={} duration={}s seed={}",
        args.mode,
        args.duration,
        args.seed.map_or("random".to_string(), |s| s.to_string())
    );
    println!();

    let frame = Duration::from_millis(FRAME_MS);
    let total_ticks = args.duration * 1000 / FRAME_MS;

    for tick in 0..=total_ticks {
        let now = start + frame * tick as u32;

        // Scripted signal at ~1 Hz: cycle through the emotion phases
        if tick % 60 == 0 {
            let phase = (tick / 60) % 16;
            let sample = scripted_sample(phase);
            let output = session.ingest_sample(sample.as_ref(), now);
            if args.verbose {
                println!("[{:>5}ms] {}", tick * FRAME_MS, output.to_parseable_string());
            }
        }

        session.tick(now, &area);

        // Pop whatever sits first in the field at ~2 Hz
        if tick % 30 == 15 {
            if let Some(target) = session.bubbles().first().map(|b| Point::new(b.x, b.y)) {
                if let Some(outcome) = session.pop_at(target, false, &area) {
                    if args.verbose {
                        println!(
                            "[{:>5}ms] pop {:?} score={}",
                            tick * FRAME_MS,
                            outcome.kind,
                            outcome.score
                        );
                    }
                }
            }
        }

        if session.is_over() {
            break;
        }
    }

    let result = ReportWriter::new().generate(&session);
    match result.report {
        Some(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("report serialize failed: {}", e),
                }
            } else {
                print_report_summary(&report, args.no_color);
            }
            if !args.no_report {
                match save_report(&report, &args.report_dir) {
                    Ok(path) => println!("report saved: {}", path),
                    Err(reason) => eprintln!("report save failed: {}", reason),
                }
            }
        }
        None => {
            eprintln!("report generation failed: {}", result.reason);
            std::process::exit(1);
        }
    }
}

/// Scripted sample schedule for simulated runs
fn scripted_sample(phase: u64) -> Option<ExpressionSample> {
    match phase {
        0..=3 => Some(ExpressionSample::new(0.8, 0.05, 0.05)),
        4..=6 => Some(ExpressionSample::new(0.05, 0.75, 0.05)),
        7..=9 => Some(ExpressionSample::new(0.05, 0.05, 0.8)),
        10..=12 => Some(ExpressionSample::new(0.05, 0.05, 0.05)),
        _ => None,
    }
}

/// Parse a sample line: "happy=0.7 sad=0.1 angry=0.05", or "none" for a
/// missing-face cycle. Unknown keys are rejected, missing keys default to 0.
fn parse_sample_line(line: &str) -> Result<Option<ExpressionSample>, String> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("none") || line.eq_ignore_ascii_case("blank") {
        return Ok(None);
    }

    let mut sample = ExpressionSample::new(0.0, 0.0, 0.0);
    for part in line.split_whitespace() {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", part))?;
        let value: f64 = value
            .parse()
            .map_err(|_| format!("'{}' is not a number", value))?;
        match key.to_ascii_lowercase().as_str() {
            "happy" => sample.happy = value,
            "sad" => sample.sad = value,
            "angry" => sample.angry = value,
            "neutral" => sample.neutral = Some(value),
            "disgusted" => sample.disgusted = Some(value),
            "fearful" => sample.fearful = Some(value),
            "surprised" => sample.surprised = Some(value),
            other => return Err(format!("unknown channel '{}'", other)),
        }
    }
    Ok(Some(sample))
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  moodpop v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m╔═════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║  🫧 moodpop v{} - {}\x1b[0m", VERSION, mode);
        println!("\x1b[1m╚═════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

/// Format interactive prompt
fn format_prompt(classifier: &EmotionClassifier, no_color: bool) -> String {
    let emotion = classifier.current();
    if no_color {
        format!("[{}] > ", emotion)
    } else {
        format!(
            "{}{} [{}]{} > ",
            emotion.color_code(),
            emotion.emoji(),
            emotion,
            Emotion::color_reset()
        )
    }
}

/// Print one classification result
fn print_output(output: &ClassifyOutput, smoother: &SignalSmoother, args: &Args) {
    if args.json {
        match serde_json::to_string(output) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("serialize failed: {}", e),
        }
    } else if args.verbose {
        print_verbose(output, smoother, args.no_color);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
}

/// Print verbose classification output
fn print_verbose(output: &ClassifyOutput, smoother: &SignalSmoother, no_color: bool) {
    let color = if no_color { "" } else { output.emotion.color_code() };
    let reset = if no_color { "" } else { Emotion::color_reset() };
    let state = smoother.state();

    println!("{}┌──────────────────────────────────────┐{}", color, reset);
    println!(
        "{}│ emotion = {} ({}){}",
        color,
        output.emotion,
        output.reason.code(),
        reset
    );
    println!("{}├──────────────────────────────────────┤{}", color, reset);
    println!("{}│ Smoothed:{}", color, reset);
    println!("{}│   happy:    {:.4}{}", color, state.happy, reset);
    println!("{}│   sad:      {:.4}{}", color, state.sad, reset);
    println!("{}│   angry:    {:.4}{}", color, state.angry, reset);
    println!("{}│   neutral:  {:.4}{}", color, state.neutral, reset);
    println!("{}├──────────────────────────────────────┤{}", color, reset);
    println!("{}│ Shares:{}", color, reset);
    println!("{}│   happy:    {:.4}{}", color, output.shares.happy, reset);
    println!("{}│   sad:      {:.4}{}", color, output.shares.sad, reset);
    println!("{}│   angry:    {:.4}{}", color, output.shares.angry, reset);
    println!("{}│   neutral:  {:.4}{}", color, output.shares.neutral, reset);
    println!("{}│ switched: {}{}", color, output.switched, reset);
    println!("{}└──────────────────────────────────────┘{}", color, reset);
}

/// Print the switch banner
fn print_switch_message(output: &ClassifyOutput) {
    println!(
        "\x1b[36m  → switched to {} ({})\x1b[0m",
        output.emotion,
        output.reason.description()
    );
}

/// Print a finished run report
fn print_report_summary(report: &moodpop::types::RunReport, no_color: bool) {
    let dim = if no_color { "" } else { "\x1b[90m" };
    let reset = if no_color { "" } else { "\x1b[0m" };

    println!();
    println!("RUN {} complete", report.id);
    println!("  mode:       {}", report.mode);
    println!("  duration:   {}s", report.duration_secs);
    println!("  score:      {}", report.score);
    println!(
        "  pops:       {} normal, {} trick",
        report.normal_pops, report.trick_pops
    );
    println!(
        "{}  shares:     happy={:.3} sad={:.3} angry={:.3} neutral={:.3}{}",
        dim,
        report.emotion_shares.happy,
        report.emotion_shares.sad,
        report.emotion_shares.angry,
        report.emotion_shares.neutral,
        reset
    );
    println!("{}  samples:    {}{}", dim, report.sample_count, reset);
}

/// Run HTTP API server
async fn run_serve(args: &Args) {
    println!();
    println!("╔═════════════════════════════════════════╗");
    println!("║  🫧 moodpop API Server                  ║");
    println!("║  Version: {}                         ║", VERSION);
    println!("╚═════════════════════════════════════════╝");
    println!();

    if let Err(e) = run_server(&args.addr, args.report_dir.clone(), args.auth_token.clone()).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
