//! Manifest-driven MVC benchmark.
//!
//! Runs the edge-branching search on every instance of a dataset manifest
//! and writes one CSV of per-instance metrics:
//!
//!   cargo run --release -p montecover-harness --bin perf_mvc -- \
//!     --manifest data/exact/manifest.json --iterations 10

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use montecover_harness::{load_manifest, manifest_tag, output_file_name, run_manifest, write_csv};

#[derive(Parser, Debug)]
#[command(name = "perf_mvc", about = "Minimum-vertex-cover performance harness")]
struct Args {
    /// Dataset manifest listing input/output file pairs.
    #[arg(long, default_value = "data/exact/manifest.json")]
    manifest: PathBuf,

    /// Search iterations per instance.
    #[arg(long, default_value_t = 10)]
    iterations: u32,

    /// Exploration parameter of the tree policy.
    #[arg(long, default_value_t = 0.0)]
    exploration: f64,

    /// Directory the CSV report is written into.
    #[arg(long, default_value = "./result")]
    out_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let instances = match load_manifest(&args.manifest) {
        Ok(instances) => instances,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = fs::create_dir_all(&args.out_dir) {
        eprintln!("failed to create {}: {err}", args.out_dir.display());
        return ExitCode::FAILURE;
    }

    let tag = manifest_tag(&args.manifest);
    let out_path = args
        .out_dir
        .join(output_file_name(&tag, args.iterations, args.exploration));
    let file = match File::create(&out_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to open output file {}: {err}", out_path.display());
            return ExitCode::FAILURE;
        }
    };

    info!("writing results to {}", out_path.display());
    let reports = run_manifest(&instances, args.iterations, args.exploration);
    if let Err(err) = write_csv(BufWriter::new(file), &reports) {
        eprintln!("failed to write {}: {err}", out_path.display());
        return ExitCode::FAILURE;
    }
    info!("{} instances reported", reports.len());
    ExitCode::SUCCESS
}
