//! photo-studio - compose photos with Gemini image generation
//!
//! Command-line front end over the `photo_studio` library.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use photo_studio::config::{load_config, load_dotenv};
use photo_studio::core::assets::{AssetSlot, ImageAsset};
use photo_studio::core::normalizer::normalize_image;
use photo_studio::core::options::{
    ASPECT_RATIOS, CAMERA_ANGLES, IMAGE_QUALITIES, LIGHTING_STYLES, LOCATIONS, POSE_MOVEMENTS,
    SelectOption,
};
use photo_studio::core::providers::gemini::GeminiClient;
use photo_studio::utils::logging::{LogLevel, init_logging};
use photo_studio::utils::format_bytes;
use photo_studio::{OptionState, Studio, StudioConfig, synthesize_prompt};

#[derive(Parser, Debug)]
#[command(name = "photo-studio", version, about = "Compose a person and an object into a new photo with Gemini")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "STUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a composed image and save it
    Generate(GenerateArgs),
    /// Print the prompt the current options produce
    Prompt {
        #[command(flatten)]
        options: OptionArgs,

        /// Include the style reference clause
        #[arg(long)]
        style_reference: bool,
    },
    /// Crop and resize one image to an aspect ratio
    Normalize {
        /// Source image
        input: PathBuf,

        #[arg(short, long, default_value = "1:1")]
        aspect_ratio: String,

        /// Destination file; defaults to `<stem>-normalized.<ext>` in the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the values every option accepts
    Options,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Photo of the person
    #[arg(long)]
    person: PathBuf,

    /// Photo of the object
    #[arg(long)]
    object: PathBuf,

    /// Optional style reference photo
    #[arg(long)]
    style: Option<PathBuf>,

    /// Use this prompt instead of the synthesized one
    #[arg(long)]
    prompt: Option<String>,

    /// Directory the generated image is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: OptionArgs,
}

/// Option overrides; anything not given keeps the configured default
#[derive(Args, Debug, Default)]
struct OptionArgs {
    #[arg(long)]
    aspect_ratio: Option<String>,

    #[arg(long)]
    lighting: Option<String>,

    #[arg(long)]
    camera_angle: Option<String>,

    /// Pose value, or `custom` together with --custom-pose
    #[arg(long)]
    pose: Option<String>,

    #[arg(long)]
    custom_pose: Option<String>,

    /// Location value, or `custom` together with --custom-location
    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    custom_location: Option<String>,

    #[arg(long)]
    quality: Option<String>,

    #[arg(long, overrides_with = "no_hdr")]
    hdr: bool,

    /// Turn HDR off even when the configured default has it on
    #[arg(long, overrides_with = "hdr")]
    no_hdr: bool,
}

impl OptionArgs {
    fn apply(self, mut options: OptionState) -> anyhow::Result<OptionState> {
        let overrides = [
            (self.aspect_ratio, &mut options.aspect_ratio),
            (self.lighting, &mut options.lighting),
            (self.camera_angle, &mut options.camera_angle),
            (self.pose, &mut options.pose_movement),
            (self.custom_pose, &mut options.custom_pose_movement),
            (self.location, &mut options.location),
            (self.custom_location, &mut options.custom_location),
            (self.quality, &mut options.quality),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if self.hdr {
            options.hdr = true;
        } else if self.no_hdr {
            options.hdr = false;
        }

        options.validate().context("Invalid option")?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    load_dotenv();

    let config = match load_config(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = LogLevel::Debug;
    }
    if let Err(e) = init_logging(&logging) {
        eprintln!("Warning: {}", e);
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: StudioConfig) -> anyhow::Result<()> {
    match command {
        Command::Generate(args) => generate(args, config).await,
        Command::Prompt {
            options,
            style_reference,
        } => {
            let options = options.apply(config.defaults)?;
            println!("{}", synthesize_prompt(&options, style_reference));
            Ok(())
        }
        Command::Normalize {
            input,
            aspect_ratio,
            output,
        } => normalize(&input, &aspect_ratio, output, &config.output.directory).await,
        Command::Options => {
            print_options();
            Ok(())
        }
    }
}

async fn generate(args: GenerateArgs, config: StudioConfig) -> anyhow::Result<()> {
    let options = args.options.apply(config.defaults.clone())?;
    let client = GeminiClient::new(config.gemini.clone()).context("Cannot create Gemini client")?;
    let mut studio = Studio::with_options(client, options);

    studio.select(AssetSlot::Person, load_asset(&args.person)?);
    studio.select(AssetSlot::Object, load_asset(&args.object)?);
    if let Some(style) = &args.style {
        studio.select(AssetSlot::StyleReference, load_asset(style)?);
    }
    if let Some(prompt) = args.prompt {
        studio.edit_prompt(prompt);
    }

    println!("Prompt: {}", studio.prompt());
    info!("Generating with {}", config.gemini.model);

    let view = studio.generate().await;
    if let Some(advisory) = view.advisory() {
        println!("AI note: {}", advisory);
    }
    if let Some(message) = view.error_banner() {
        bail!("{}", message);
    }

    let directory = args.output.unwrap_or(config.output.directory);
    let path = view
        .save(&directory)
        .await
        .with_context(|| format!("Cannot save into {}", directory.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

fn load_asset(path: &Path) -> anyhow::Result<ImageAsset> {
    ImageAsset::from_path(path).with_context(|| format!("Cannot select {}", path.display()))
}

async fn normalize(
    input: &Path,
    aspect_ratio: &str,
    output: Option<PathBuf>,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let asset = load_asset(input)?;
    let normalized = normalize_image(&asset, aspect_ratio).await?;
    let bytes = normalized.decoded_bytes()?;

    let output = match output {
        Some(path) => path,
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let extension = normalized
                .mime_type
                .strip_prefix("image/")
                .unwrap_or("png");
            output_dir.join(format!("{}-normalized.{}", stem, extension))
        }
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("Cannot write {}", output.display()))?;

    println!(
        "{}x{} {} ({}) -> {}",
        normalized.width,
        normalized.height,
        normalized.mime_type,
        format_bytes(bytes.len() as u64),
        output.display()
    );
    Ok(())
}

fn print_options() {
    let groups: [(&str, &[SelectOption]); 6] = [
        ("aspect-ratio", ASPECT_RATIOS),
        ("lighting", LIGHTING_STYLES),
        ("camera-angle", CAMERA_ANGLES),
        ("pose", POSE_MOVEMENTS),
        ("location", LOCATIONS),
        ("quality", IMAGE_QUALITIES),
    ];

    for (name, options) in groups {
        println!("--{}", name);
        for option in options {
            println!("  {:<30} {}", option.value, option.label);
        }
    }
}
