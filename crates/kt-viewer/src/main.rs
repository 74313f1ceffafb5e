//! kt-view entry point

use anyhow::{Context, Result};
use clap::Parser;
use kt_viewer::{Args, ViewerConfig, run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kt_viewer=info,kt_core=info,kt_scene=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let base = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let config = args.apply(base);

    let output = run(&args.input, &config)?;
    tracing::info!(
        "Joints below '{}': {}",
        config.start_link().unwrap_or("root"),
        output.joint_names.join(", ")
    );

    let text = output.render(config.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote scene to {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}
