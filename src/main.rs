use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use docket::{
    generate_candidates, load_transcript_file, parse_meeting_date, BoundaryContext, HumanReport,
    LabelingSession, ResumePolicy, Segmenter, SegmenterConfig, SessionConfig, SqliteStore,
    TopicReport, TranscriptRecord,
};

#[derive(Parser)]
#[command(name = "docket")]
#[command(author, version, about = "Agenda topic segmentation for meeting transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a transcript into agenda topics with motions and votes
    Segment {
        /// Transcript file (plain text, or JSON segment list)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for topics (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable topic listing (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Pattern configuration file (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List boundary candidates in a transcript without labeling them
    Candidates {
        /// Transcript file (plain text, or JSON segment list)
        #[arg(short, long)]
        input: PathBuf,

        /// Characters of context on each side of a boundary
        #[arg(long, default_value = "200")]
        context_chars: usize,

        /// Pattern configuration file (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Add a transcript file to the labeling backlog
    Import {
        /// Label database
        #[arg(long, default_value = "meetings.db")]
        db: PathBuf,

        /// Transcript file (plain text, or JSON segment list)
        #[arg(short, long)]
        input: PathBuf,

        /// Transcript identifier (defaults to the file stem)
        #[arg(long)]
        id: Option<String>,

        /// Meeting title
        #[arg(long)]
        title: Option<String>,

        /// Meeting date (YYYY-MM-DD); other formats are dropped with a warning
        #[arg(long)]
        date: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Interactively label boundary candidates across the backlog
    Label {
        /// Label database
        #[arg(long, default_value = "meetings.db")]
        db: PathBuf,

        /// Characters of context on each side of a boundary
        #[arg(long, default_value = "200")]
        context_chars: usize,

        /// Revisit partially labeled transcripts and present their remaining candidates
        #[arg(long)]
        resume_partial: bool,

        /// Pattern configuration file (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show label counts and backlog size
    Stats {
        /// Label database
        #[arg(long, default_value = "meetings.db")]
        db: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            input,
            output,
            human_readable,
            patterns,
            verbose,
        } => {
            setup_logging(verbose);
            segment_transcript(&input, output, human_readable, patterns.as_deref())
        }
        Commands::Candidates {
            input,
            context_chars,
            patterns,
            verbose,
        } => {
            setup_logging(verbose);
            list_candidates(&input, context_chars, patterns.as_deref())
        }
        Commands::Import {
            db,
            input,
            id,
            title,
            date,
            verbose,
        } => {
            setup_logging(verbose);
            import_transcript(&db, &input, id, title, date)
        }
        Commands::Label {
            db,
            context_chars,
            resume_partial,
            patterns,
            verbose,
        } => {
            setup_logging(verbose);
            let resume = if resume_partial {
                ResumePolicy::PerCandidate
            } else {
                ResumePolicy::AnyLabel
            };
            run_labeling(&db, context_chars, resume, patterns.as_deref())
        }
        Commands::Stats { db } => {
            setup_logging(false);
            show_stats(&db)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_segmenter(patterns: Option<&Path>) -> Result<Segmenter> {
    let config = match patterns {
        Some(path) => {
            info!("Loading pattern configuration from {:?}", path);
            SegmenterConfig::from_file(path)?
        }
        None => SegmenterConfig::default(),
    };
    Segmenter::new(&config).context("Invalid pattern configuration")
}

fn segment_transcript(
    input: &Path,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    patterns: Option<&Path>,
) -> Result<()> {
    let segmenter = build_segmenter(patterns)?;

    info!("Loading transcript from {:?}", input);
    let transcript = load_transcript_file(input).context("Failed to load input transcript")?;

    let total_units = segmenter.split(&transcript.text).len();
    let topics = segmenter.segment(&transcript.text);
    info!("Found {} topics in {} units", topics.len(), total_units);

    if let Some(path) = human_readable {
        HumanReport::new(&topics).write_file(&path)?;
        info!("Human-readable topics written to {:?}", path);
    }

    let report = TopicReport::new(topics, total_units);
    match output {
        Some(path) => {
            report.write_json(&path)?;
            info!("Topics written to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn list_candidates(input: &Path, context_chars: usize, patterns: Option<&Path>) -> Result<()> {
    let segmenter = build_segmenter(patterns)?;
    let transcript = load_transcript_file(input).context("Failed to load input transcript")?;

    let set = generate_candidates(&segmenter, &transcript.text);
    println!("Found {} potential boundaries", set.len());
    for candidate in &set.candidates {
        println!(
            "\nOffset {} (unit {})",
            candidate.char_index, candidate.unit_ordinal
        );
        print!(
            "{}",
            BoundaryContext::around(&set.text, candidate.char_index, context_chars).render()
        );
    }

    Ok(())
}

fn import_transcript(
    db: &Path,
    input: &Path,
    id: Option<String>,
    title: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let transcript_id = match id {
        Some(id) => id,
        None => input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .context("Cannot derive a transcript id from the input path; pass --id")?,
    };

    let loaded = load_transcript_file(input).context("Failed to load input transcript")?;
    if loaded.corrupted {
        info!("Transcript {} flagged as corrupted", transcript_id);
    }

    let store = SqliteStore::open(db)?;
    let record = TranscriptRecord {
        transcript_id,
        title,
        date: date.as_deref().and_then(parse_meeting_date),
        text: loaded.text,
    };
    store.upsert_transcript(&record, loaded.corrupted, loaded.length_seconds)?;
    info!("Imported transcript {} into {:?}", record.transcript_id, store.path());

    Ok(())
}

fn run_labeling(
    db: &Path,
    context_chars: usize,
    resume: ResumePolicy,
    patterns: Option<&Path>,
) -> Result<()> {
    let segmenter = build_segmenter(patterns)?;
    let store = SqliteStore::open(db)?;
    let config = SessionConfig {
        context_chars,
        resume,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = LabelingSession::new(&store, &segmenter, config, stdin.lock(), stdout.lock());
    let summary = session
        .run()
        .context("Labeling session aborted; labels recorded so far are saved")?;

    info!(
        "Session {}: {} labels written ({} positive), {} meetings completed{}",
        summary.session_id,
        summary.labels_written,
        summary.positive,
        summary.transcripts_completed,
        if summary.quit { ", quit early" } else { "" }
    );

    Ok(())
}

fn show_stats(db: &Path) -> Result<()> {
    let store = SqliteStore::open(db)?;
    let stats = store.stats()?;

    println!("Boundary Labels");
    println!("===============");
    println!("Total labels: {}", stats.labels);
    println!("Confirmed boundaries: {}", stats.positive);
    println!("Rejected boundaries: {}", stats.negative);
    println!("Labeled meetings: {}", stats.labeled_transcripts);
    println!("Meetings awaiting labels: {}", stats.unlabeled_transcripts);

    Ok(())
}
