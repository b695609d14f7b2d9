use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sfxbake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an effect JSON into `<out-dir>/<name>.sfx`.
    Export(ExportArgs),
    /// Decode an `.sfx` file and print it as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input effect JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Directory searched for texture files (matched by file stem). Textures are copied into
    /// `<out-dir>/Texture/`. Without it, logical texture names are written as is.
    #[arg(long)]
    textures: Option<PathBuf>,

    /// Sample parts in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Abort the whole export at the first failing part.
    #[arg(long)]
    fail_fast: bool,

    /// Lifetime subdivisions per part.
    #[arg(long)]
    subdivisions: Option<u32>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input `.sfx` file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let effect = sfxbake::Effect::from_path(&args.in_path)?;

    let mut opts = sfxbake::ExportOpts {
        parallel: args.parallel,
        threads: args.threads,
        ..sfxbake::ExportOpts::default()
    };
    if args.fail_fast {
        opts.failure_policy = sfxbake::FailurePolicy::Abort;
    }
    if let Some(n) = args.subdivisions {
        opts.sampling.subdivisions = n;
    }

    let summary = match &args.textures {
        Some(dir) => {
            let mut resolver = sfxbake::DirTextureResolver::new(dir, &args.out_dir);
            sfxbake::export_to_dir(&effect, &args.out_dir, &opts, &mut resolver)?
        }
        None => sfxbake::export_to_dir(
            &effect,
            &args.out_dir,
            &opts,
            &mut sfxbake::NameOnlyTextures,
        )?,
    };

    for d in &summary.report.diagnostics {
        println!("{d}");
    }
    if summary.report.records_written == 0 {
        anyhow::bail!("no part records were written for '{}'", effect.name);
    }
    println!("wrote {}", summary.path.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read sfx '{}'", args.in_path.display()))?;
    let file = sfxbake::decode_sfx(&bytes)
        .with_context(|| format!("decode sfx '{}'", args.in_path.display()))?;
    println!("{}", serde_json::to_string_pretty(&file)?);
    Ok(())
}
