use anyhow::Context;
use clap::{Parser, Subcommand};
use dossier::{
    DocumentBuilder, FilesystemResourceProvider, HttpResourceProvider, RenderConfig,
    ReportDocument, ReportRenderer, ResourceProvider,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders case report documents (JSON) into PDF.
#[derive(Parser, Debug)]
#[command(name = "dossier", version, about)]
struct Cli {
    /// TOML configuration file; DOSSIER__* environment variables override it.
    #[arg(long, global = true, env = "DOSSIER_CONFIG")]
    config: Option<PathBuf>,

    /// Load images from this directory instead of over HTTP.
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single flat PDF.
    Render {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Render a main report plus appendix parts into a directory.
    Package {
        input: PathBuf,
        #[arg(short = 'd', long)]
        out_dir: PathBuf,
    },
}

fn load_document(path: &Path) -> anyhow::Result<ReportDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: ReportDocument = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    // The economy summary is always derived, never taken from the input.
    Ok(DocumentBuilder::from_document(document).build())
}

fn provider(cli: &Cli, config: &RenderConfig) -> anyhow::Result<Arc<dyn ResourceProvider>> {
    Ok(match &cli.assets_dir {
        Some(dir) => Arc::new(FilesystemResourceProvider::new(dir)),
        None => Arc::new(HttpResourceProvider::new(config.fetch_timeout())?),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = RenderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let renderer = ReportRenderer::with_config(provider(&cli, &config)?, config);

    match &cli.command {
        Command::Render { input, output } => {
            let document = load_document(input)?;
            let data = renderer.render(&document).await?;
            fs::write(output, &data)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote {} ({} bytes)", output.display(), data.len());
        }
        Command::Package { input, out_dir } => {
            let document = load_document(input)?;
            let package = renderer.render_package(&document).await?;

            fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let stem = match slug::slugify(&document.metadata.case_number) {
                slug if slug.is_empty() => "report".to_string(),
                slug => slug,
            };
            let main_path = out_dir.join(format!("{}.pdf", stem));
            fs::write(&main_path, &package.main)?;
            println!("Wrote {} ({} bytes)", main_path.display(), package.main.len());

            for part in &package.parts {
                let path = out_dir.join(&part.name);
                fs::write(&path, &part.data)?;
                println!(
                    "Wrote {} ({}: {}..{}, {} entries, {} bytes)",
                    path.display(),
                    part.title,
                    part.first_code,
                    part.last_code,
                    part.entries,
                    part.data.len()
                );
            }
        }
    }
    Ok(())
}
