//! Diff command

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Args;
use proptrail_core::config::DEFAULT_EVENT_NAME;
use proptrail_core::logging_facility::{init, Profile};
use proptrail_core::proptrail_core_types::{RequestContext, TraceId};
use proptrail_core::{AuditConfig, Document, JsonLinesSink};
use proptrail_engine::{AuditEvent, AuditListener, InMemorySnapshotLoader, ListenerOutcome};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Document snapshot before the modification (JSON)
    #[arg(long)]
    pub before: PathBuf,

    /// Document snapshot after the modification (JSON)
    #[arg(long)]
    pub after: PathBuf,

    /// Audit configuration (TOML); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Principal recorded as the author of the change
    #[arg(long, default_value = "system")]
    pub actor: String,

    /// Repository recorded as the origin of the change
    #[arg(long, default_value = "default")]
    pub origin: String,

    /// Append entries to this file instead of writing them to stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Trace id propagated from the caller, attached to every log line
    #[arg(long)]
    pub trace_id: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}

pub fn execute(args: DiffArgs) -> Result<()> {
    init(if args.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let config = match &args.config {
        Some(path) => AuditConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AuditConfig::default(),
    };

    let before = read_document(&args.before)?;
    let mut after = read_document(&args.after)?;
    ensure!(
        before.id() == after.id(),
        "snapshots describe different documents: `{}` and `{}`",
        before.id(),
        after.id()
    );
    after
        .track_changes(&before)
        .context("comparing snapshots")?;

    let subject_id = after.id().to_string();
    let loader = InMemorySnapshotLoader::new().with_document(before);

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let sink = JsonLinesSink::new(writer);

    let event_name = config
        .event_names
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_EVENT_NAME);
    let mut request = RequestContext::new();
    if let Some(trace_id) = args.trace_id.as_deref() {
        request = request.with_trace_id(TraceId::from(trace_id));
    }
    let event = AuditEvent::for_document(event_name, after, args.actor, args.origin)
        .with_request(request);

    let listener = AuditListener::new(&config, &loader).with_sink(&sink);
    let outcome = listener.handle_event(&event)?;

    match outcome {
        ListenerOutcome::Submitted(n) => {
            eprintln!("{} change(s) recorded for {}", n, subject_id)
        }
        ListenerOutcome::NoChanges => eprintln!("No changes for {}", subject_id),
        ListenerOutcome::Ignored | ListenerOutcome::SinkUnavailable => {
            eprintln!("Event not audited for {}", subject_id)
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Document::from_json_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
