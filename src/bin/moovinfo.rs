use anyhow::{anyhow, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use moovparse::{
    Analysis, AtomNode, Fact, Payload, analyze_file,
    known_atoms::KnownAtom,
    util::hex_dump,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Parse the 'moov' atom of a MOV/MP4 file and report track dimensions and audio sample rates"
)]
struct Args {
    /// MOV/MP4 file path
    path: String,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short = 'l', long = "loglevel", default_value = "info")]
    loglevel: String,

    /// Emit the analysis as JSON instead of log lines
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Print the normalized atom tree
    #[arg(long, action = ArgAction::SetTrue)]
    tree: bool,

    /// With --tree, hex-dump payloads that have no decoder
    #[arg(long, action = ArgAction::SetTrue)]
    hex: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = parse_level(&args.loglevel)?;
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
    info!("Log level set to {}", level);

    check_input(Path::new(&args.path))?;
    let analysis = analyze_file(&args.path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if args.tree {
        print_node(&analysis.tree, 0, args.hex);
    }
    report(&analysis);
    Ok(())
}

fn parse_level(s: &str) -> anyhow::Result<LevelFilter> {
    LevelFilter::from_str(s).map_err(|_| anyhow!("invalid log level: {s}"))
}

fn check_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("file {} does not exist", path.display());
    }
    if path.is_dir() {
        bail!("{} is a directory, not a file", path.display());
    }
    Ok(())
}

// ---------- Reporting ----------

fn report(analysis: &Analysis) {
    for fact in &analysis.facts {
        match fact {
            Fact::VideoTrack { width, height } => {
                info!("Video Track: Width = {:.2}, Height = {:.2}", width, height)
            }
            Fact::SampleRate { codec, rate } => {
                info!("Codec: {}, Sample Rate: {:.2} Hz", codec, rate)
            }
            Fact::MediaTiming { time_scale, duration, language } => {
                info!("Media: timescale = {}, duration = {}, language = {}", time_scale, duration, language)
            }
            Fact::NoSampleRates { entry_types } => {
                log::debug!("No audio sample rates in entries {:?}", entry_types)
            }
        }
    }
}

// ---------- Human-readable tree ----------

fn print_node(node: &AtomNode, depth: usize, hex: bool) {
    let indent = "  ".repeat(depth);
    let hdr = node.header();
    let name = KnownAtom::from(hdr.typ).full_name();
    match node {
        AtomNode::Container { children, .. } => {
            println!(
                "{indent}{:>6} {:>10} {} ({}, container)",
                format!("{:#x}", hdr.start),
                hdr.size,
                hdr.typ,
                name
            );
            for c in children {
                print_node(c, depth + 1, hex);
            }
        }
        AtomNode::Leaf { payload, .. } => {
            println!(
                "{indent}{:>6} {:>10} {} ({})",
                format!("{:#x}", hdr.start),
                hdr.size,
                hdr.typ,
                name
            );
            println!("{indent}        -> {}", summarize(payload));
            if let Payload::Opaque(bytes) = payload
                && hex
                && !bytes.is_empty()
            {
                print!("{}", hex_dump(bytes, hdr.start + moovparse::HEADER_SIZE as u64));
            }
        }
    }
}

fn summarize(payload: &Payload) -> String {
    match payload {
        Payload::TrackHeader(t) => format!(
            "track_id={} duration={} width={} height={}",
            t.track_id,
            t.duration,
            t.width(),
            t.height()
        ),
        Payload::MediaHeader(m) => format!(
            "timescale={} duration={} language={}",
            m.time_scale,
            m.duration,
            m.language_code()
        ),
        Payload::SampleDescriptionTable(s) => {
            let codecs: Vec<String> = s.entries.iter().map(|e| e.typ.to_string()).collect();
            format!("entry_count={} codecs={:?}", s.entry_count, codecs)
        }
        Payload::Opaque(bytes) => format!("{} bytes", bytes.len()),
    }
}
