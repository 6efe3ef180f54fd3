use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

use dcvoronoi::io::{parse_cases, write_cases, DiagramFile};
use dcvoronoi::prelude::*;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Divide-and-conquer Voronoi diagrams from site files")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build diagrams for every case of a batch site file
    Run {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
        /// Only build the case at this (0-based) index
        #[arg(long)]
        case: Option<usize>,
        /// Record merge checkpoints and include them in the provenance
        #[arg(long)]
        trace: bool,
    },
    /// Write a random single-case site file
    Generate {
        #[arg(long)]
        count: usize,
        #[arg(long)]
        seed: u64,
        #[arg(long, default_value_t = 100.0)]
        extent: f64,
        #[arg(long)]
        integer: bool,
        #[arg(long)]
        out: String,
    },
    /// Print a JSON summary of a diagram file
    Inspect {
        #[arg(long)]
        input: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            input,
            out,
            case,
            trace,
        } => run(&input, &out, case, trace),
        Action::Generate {
            count,
            seed,
            extent,
            integer,
            out,
        } => generate(count, seed, extent, integer, &out),
        Action::Inspect { input } => {
            let summary = inspect(&input)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

/// Merge statistics gathered with `--trace`.
#[derive(Debug, Serialize)]
struct TraceSummary {
    merges: usize,
    chain_hits: usize,
    longest_chain: usize,
    pruned: usize,
}

#[derive(Debug, Serialize)]
struct CaseSummary {
    index: usize,
    input_sites: usize,
    sites: usize,
    edges: usize,
    unbounded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<TraceSummary>,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn build_case(index: usize, sites: &[Point], trace: bool) -> Result<(Diagram, CaseSummary)> {
    let mut rec = Recorder::default();
    let diagram = if trace {
        build_voronoi_with(sites, &VoronoiCfg::default(), &mut rec)
    } else {
        build_voronoi(sites)
    }
    .with_context(|| format!("case {index}"))?;
    let summary = CaseSummary {
        index,
        input_sites: sites.len(),
        sites: diagram.sites().len(),
        edges: diagram.edges().len(),
        unbounded: diagram.unbounded_edge_count(),
        trace: trace.then(|| TraceSummary {
            merges: rec.merges,
            chain_hits: rec.chain_hits.len(),
            longest_chain: rec.chain_lengths.iter().copied().max().unwrap_or(0),
            pruned: rec.pruned.len(),
        }),
    };
    tracing::info!(
        case = index,
        sites = summary.sites,
        edges = summary.edges,
        unbounded = summary.unbounded,
        "case"
    );
    Ok((diagram, summary))
}

fn run(input: &str, out: &str, case: Option<usize>, trace: bool) -> Result<()> {
    tracing::info!(input, out, case = ?case, trace, "run");
    let text = fs::read_to_string(input).with_context(|| format!("reading {input}"))?;
    let cases = parse_cases(&text).with_context(|| format!("parsing {input}"))?;
    let selected: Vec<(usize, &Vec<Point>)> = match case {
        Some(k) if k < cases.len() => vec![(k, &cases[k])],
        Some(k) => bail!("case {k} out of range: {input} has {} cases", cases.len()),
        None => cases.iter().enumerate().collect(),
    };

    let mut blocks = Vec::with_capacity(selected.len());
    let mut summaries = Vec::with_capacity(selected.len());
    for (index, sites) in selected {
        let (diagram, summary) = build_case(index, sites, trace)?;
        blocks.push(DiagramFile::from_diagram(&diagram).to_text());
        summaries.push(summary);
    }

    let out_path = Path::new(out);
    ensure_parent(out_path)?;
    fs::write(out_path, blocks.join("\n")).with_context(|| format!("writing {out}"))?;

    let payload = provenance::Payload::new(serde_json::json!({
        "command": "run",
        "input": input,
        "case": case,
        "trace": trace
    }))
    .with_cases(serde_json::to_value(&summaries)?);
    let prov = provenance::write_sidecar(out_path, payload)?;
    tracing::info!(cases = summaries.len(), provenance = %prov.display(), "run done");
    Ok(())
}

fn generate(count: usize, seed: u64, extent: f64, integer: bool, out: &str) -> Result<()> {
    tracing::info!(count, seed, extent, integer, out, "generate");
    let cfg = SiteCfg {
        count,
        extent,
        integer,
    };
    let sites = draw_sites(cfg, ReplayToken { seed, index: 0 });
    let out_path = Path::new(out);
    ensure_parent(out_path)?;
    let body = format!(
        "# generated: count={count} seed={seed} extent={extent} integer={integer}\n{}",
        write_cases(&[sites])
    );
    fs::write(out_path, body).with_context(|| format!("writing {out}"))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct FileSummary {
    sites: usize,
    segments: usize,
}

fn inspect(input: &str) -> Result<FileSummary> {
    let text = fs::read_to_string(input).with_context(|| format!("reading {input}"))?;
    let file = DiagramFile::parse(&text).with_context(|| format!("parsing {input}"))?;
    tracing::info!(input, sites = file.sites.len(), "inspect");
    Ok(FileSummary {
        sites: file.sites.len(),
        segments: file.segments.len(),
    })
}
