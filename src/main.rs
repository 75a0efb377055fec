// Thu Oct 15 2026 - Alex

use clap::Parser;
use colored::Colorize;
use pe_proxy_gen::{
    config::GenerationPolicy,
    output::OutputManager,
    pipeline::{resolve_input, EngineError, ProxyPipeline, ProxyPlan},
    utils::logging,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Generates forwarding proxy sources from a PE image's export table", long_about = None)]
struct Args {
    /// Image path, or a directory when IMAGE_NAME is given
    input: PathBuf,

    /// Image name inside the INPUT directory
    image_name: Option<String>,

    /// Output directory (defaults to the image's directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Suffix appended to the real image's base name
    #[arg(long)]
    orig_suffix: Option<String>,

    #[arg(long)]
    emit_def: bool,

    #[arg(long)]
    emit_json_report: bool,

    #[arg(long)]
    emit_host: bool,

    /// Only forward names matching this pattern
    #[arg(long)]
    include: Option<String>,

    /// Never forward names matching this pattern
    #[arg(long)]
    exclude: Option<String>,

    #[arg(long)]
    keep_ordinals: bool,

    #[arg(long)]
    respect_existing_forwarders: bool,

    #[arg(long)]
    parallel: bool,

    /// JSON policy file; flags given on the command line win
    #[arg(long)]
    policy: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    logging::init_logger(&args.log_level, args.verbose);

    let start_time = Instant::now();

    match run(&args) {
        Ok(()) => {
            println!(
                "{} Done in {:.2}s",
                "[+]".green(),
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(args: &Args) -> Result<(), EngineError> {
    let policy = build_policy(args)?;
    let pipeline = ProxyPipeline::new(policy)?;

    let image_path = resolve_input(&args.input, args.image_name.as_deref())?;
    println!("{} Loading image: {}", "[*]".blue(), image_path.display());

    let plan = pipeline.run(&image_path)?;
    print_summary(&plan);

    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| parent_dir(&image_path));

    let written = OutputManager::new(out_dir, &plan.base_name)
        .with_def(args.emit_def)
        .with_json(args.emit_json_report)
        .with_host(args.emit_host)
        .write_all(&plan.table, &plan.generation)?;

    for path in &written {
        println!("{} Wrote {}", "[+]".green(), path.display());
    }

    println!();
    println!(
        "{} Rename the real image to {}.dll",
        "[>]".cyan(),
        plan.renamed_base()
    );
    println!("{} Build the proxy as {}.dll", "[>]".cyan(), plan.base_name);

    Ok(())
}

/// Policy file first, then explicit flags on top.
fn build_policy(args: &Args) -> Result<GenerationPolicy, EngineError> {
    let mut policy = match &args.policy {
        Some(path) => GenerationPolicy::load(path)?,
        None => GenerationPolicy::default(),
    };

    if let Some(suffix) = &args.orig_suffix {
        policy = policy.with_rename_suffix(suffix.as_str());
    }
    if let Some(include) = &args.include {
        policy = policy.with_include(include.as_str());
    }
    if let Some(exclude) = &args.exclude {
        policy = policy.with_exclude(exclude.as_str());
    }
    if args.keep_ordinals {
        policy = policy.with_keep_ordinals(true);
    }
    if args.respect_existing_forwarders {
        policy = policy.with_respect_existing_forwarders(true);
    }
    if args.verbose {
        policy = policy.with_verbose(true);
    }
    if args.parallel {
        policy = policy.with_parallel(true);
    }

    Ok(policy)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn print_summary(plan: &ProxyPlan) {
    let stats = &plan.generation.stats;

    println!("{}", "Export Summary".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    println!("  Slots:            {}", plan.table.len().to_string().green());
    println!("  Ordinal base:     {}", plan.table.ordinal_base);
    println!("  Forward by name:  {}", stats.by_name.to_string().green());
    println!("  Ordinal only:     {}", stats.by_ordinal.to_string().green());
    println!("  Kept forwarders:  {}", stats.kept_forwarders.to_string().green());
    println!("  Gaps (RVA=0):     {}", stats.gaps.to_string().yellow());
    println!("  Probable data:    {}", stats.probable_data.to_string().yellow());
    println!();

    if plan.generation.declarations.is_empty() {
        println!("{} No declarations generated", "[!]".yellow());
    }
}
