//! `fontsvg`: upload fonts and render text as SVG from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fontsvg_client::api::FontApiClient;
use fontsvg_client::notify::TracingNotifier;
use fontsvg_client::session::{ClientSession, RenderMode};
use fontsvg_core::types::FontVariant;

#[derive(Parser)]
#[command(version, about = "Upload fonts and render text as SVG")]
struct Cli {
    /// Base URL of the font server
    #[arg(long, env = "FONTSVG_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List selectable font families
    List,

    /// Upload font files (TTF, OTF, WOFF, WOFF2)
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render text to an SVG file
    Render {
        /// Font family; defaults to the first selectable family
        #[arg(long)]
        font: Option<String>,

        #[arg(long, default_value = "")]
        text: String,

        /// Font size in pixels
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
        size: u32,

        /// regular, bold, italic or bold-italic
        #[arg(long, default_value = "regular")]
        variant: FontVariant,

        /// Directory the SVG is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fontsvg_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut session = ClientSession::new(FontApiClient::new(cli.server), Arc::new(TracingNotifier));
    session.sync_fonts().await;

    match cli.command {
        Command::List => {
            let library = session.library();
            for family in library.families() {
                let marker = if library.is_uploaded(family) { "*" } else { " " };
                println!("{marker} {family}");
            }
        }
        Command::Upload { files } => {
            let summary = session.upload_files(&files).await;
            for asset in &summary.uploaded {
                println!("{} -> {}", asset.font_family, asset.url);
            }
            if summary.uploaded.is_empty() {
                bail!("no fonts were uploaded");
            }
        }
        Command::Render {
            font,
            text,
            size,
            variant,
            out_dir,
        } => {
            if let Some(font) = font {
                if !session.library_mut().select(&font) {
                    bail!("font family '{font}' is not available");
                }
            }
            session.library_mut().set_variant(variant);

            let (path, mode) = session
                .download(&text, size, &out_dir)
                .await
                .context("failed to write SVG")?;
            let how = match mode {
                RenderMode::Server => "outlines",
                RenderMode::Fallback => "fallback",
            };
            println!("{} ({how})", path.display());
        }
    }

    Ok(())
}
