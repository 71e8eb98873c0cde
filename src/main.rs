use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use obj_scratch::config::{CliArgs, InspectConfig};
use obj_scratch::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing; reports go to stdout, logs to stderr
    let filter = if args.verbose {
        EnvFilter::new("obj_scratch=debug")
    } else {
        EnvFilter::new("obj_scratch=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config: InspectConfig = args.into();

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(summary) => {
            eprintln!(
                "Done: {} files, {} triangles in {:.2}s",
                summary.file_count,
                summary.triangle_count,
                summary.duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!(%e, "Inspection failed");
            Err(anyhow::anyhow!(e)).context("objscan inspection failed")
        }
    }
}
