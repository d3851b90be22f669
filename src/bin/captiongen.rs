use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "captiongen", version, about = "Render a dated caption card from a template image")]
struct Cli {
    /// Template image.
    #[arg(short = 't', long = "template", default_value = "./temp1.png")]
    template: PathBuf,

    /// Caption body text.
    #[arg(short = 's', long = "text", default_value = "")]
    text: String,

    /// Output PNG path.
    #[arg(short = 'o', long = "out", default_value = "./out.png")]
    out: PathBuf,

    /// TrueType/OpenType font used for the title and body.
    #[arg(long, default_value = "./FZDBSJW.TTF")]
    font: PathBuf,

    /// JSON layout overrides; missing fields keep their defaults.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Wrap and center by UTF-8 bytes instead of characters.
    #[arg(long)]
    byte_wrap: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let out = cli.out.clone();
    match execute(cli) {
        Ok(()) => {
            println!("successful!\tOutPath:{}", out.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut layout = match &cli.layout {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open layout '{}'", path.display()))?;
            captiongen::LayoutConfig::from_json_reader(BufReader::new(f))
                .with_context(|| format!("load layout '{}'", path.display()))?
        }
        None => captiongen::LayoutConfig::default(),
    };
    if cli.byte_wrap {
        layout.wrap_unit = captiongen::WrapUnit::Bytes;
    }

    let cfg = captiongen::RunConfig {
        template_path: cli.template,
        text: cli.text,
        output_path: cli.out,
        font_path: cli.font,
    };

    let mut engine = captiongen::ParleyFontEngine::new();
    let now = chrono::Local::now();
    captiongen::run_to_file(&mut engine, &cfg, &now, &layout)
        .with_context(|| format!("render caption to '{}'", cfg.output_path.display()))?;
    Ok(())
}
