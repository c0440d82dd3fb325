//! Offline index build: read all embedding parts for a (kind, model),
//! build a flat index, and persist it with its id mapping.

use std::env;

use matsearch_core::config::Config;
use matsearch_core::types::{Metric, Modality};
use matsearch_index::build_from_store;
use matsearch_store::Manifest;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <build|manifest> <kind> <model> [metric]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let (cmd, args) = parse_args();

    let kind: Modality = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("missing <kind> (text|simulation|timeseries)"))?
        .parse()?;
    let model = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("missing <model>"))?;

    match cmd.as_str() {
        "build" => {
            let metric: Metric = args.get(2).map_or("ip", String::as_str).parse()?;
            let emb_root = config.embeddings_root();
            let index_root = config.index_root();
            let out = build_from_store(&emb_root, &index_root, kind, model, metric)?;
            println!("Index saved at: {}", out.display());
        }
        "manifest" => {
            let dir = config.embeddings_root().join(kind.as_str()).join(model);
            let manifest = Manifest::load(&dir)?;
            let rows: usize = manifest.parts.iter().map(|p| p.count).sum();
            println!(
                "{}/{}: {} parts, {} rows, dim {}",
                manifest.kind,
                manifest.model,
                manifest.parts.len(),
                rows,
                manifest.dim().unwrap_or(0)
            );
            for p in &manifest.parts {
                println!("  {}  count={} dim={}", p.part, p.count, p.dim);
            }
        }
        other => {
            eprintln!("Unknown command '{}'; expected build|manifest", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
