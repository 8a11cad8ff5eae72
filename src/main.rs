//main.rs
use anyhow::Context;
use clap::Parser;
use skincare_clusters::config::DEFAULT_DATA_PATH;
use skincare_clusters::report::TextReport;
use skincare_clusters::{Pipeline, PipelineConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[clap(version, about = "Segment a skincare product catalog and print dashboard figures")]
struct Opts {
    /// Product catalog (CSV, or TSV by extension)
    #[clap(short, long, default_value = DEFAULT_DATA_PATH)]
    data: String,

    /// Print the summary as JSON instead of text
    #[clap(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let mut pipeline = Pipeline::new(PipelineConfig::new(&opts.data));
    let output = pipeline
        .run()
        .with_context(|| format!("cannot build dashboard from {}", opts.data))?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    } else {
        print!("{}", TextReport(&output.summary));
    }

    Ok(())
}
