mod generate;
mod llm;
mod output;
mod prompts;
mod webui;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use guide::{MaskBuilder, RngJitter};

use generate::circular::DEFAULT_CIRCULAR_PROMPT;
use generate::pizza::{DEFAULT_NUM_PIECES, DEFAULT_TOTAL_NUM_PIECES};
use generate::{CircularGen, GenerateError, PizzaGen, PromptOverrides, DEFAULT_IMAGE_WIDTH, RANDOM_SEED};
use llm::config::{LlmConfig, DEFAULT_LLM_MODEL};
use llm::retry::{RetryPolicy, DEFAULT_MAX_RETRIES};
use llm::types::{ChatOptions, LlmError};
use llm::LlmClient;
use output::{OutputError, OutputOptions, DEFAULT_CIRCULAR_TEMPLATE, DEFAULT_IMAGE_FORMAT};
use prompts::{PromptError, PromptGenerator, DEFAULT_NUM_PROMPTS, DEFAULT_OUTPUT_FILE};
use webui::{WebUiClient, WebUiError, WebUiTimeouts, DEFAULT_SERVER_URL};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Guide(#[from] guide::GuideError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    WebUi(#[from] WebUiError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to load guide image {path}: {source}")]
    GuideImage { path: PathBuf, source: image::ImageError },
}

#[derive(Parser, Debug)]
#[command(name = "pizza-gen", about = "ControlNet-guided circular and pizza image generation")]
struct Cli {
    /// Verbose logs; also dump guide masks to the working directory.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate something circular.
    Circular(CircularArgs),
    /// Generate pizza.
    Pizza(PizzaArgs),
    /// Ask a language model for circular-subject prompts.
    Prompts(PromptsArgs),
    /// Write a guide mask PNG without contacting a server.
    Mask(MaskArgs),
}

#[derive(Args, Debug)]
struct ServerArgs {
    #[arg(short = 's', long, env = "PIZZA_GEN_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(short = 'f', long)]
    force_overwrite: bool,
    #[arg(short = 'o', long, default_value = ".")]
    output_path: PathBuf,
    #[arg(short = 'F', long, default_value = DEFAULT_IMAGE_FORMAT)]
    output_image_format: String,
}

impl OutputArgs {
    fn options(self) -> Result<OutputOptions, OutputError> {
        output::parse_image_format(&self.output_image_format)?;
        Ok(OutputOptions {
            dir: self.output_path,
            image_format: self.output_image_format,
            force_overwrite: self.force_overwrite,
        })
    }
}

#[derive(Args, Debug)]
struct CircularArgs {
    #[command(flatten)]
    server: ServerArgs,
    #[arg(short = 'W', long, default_value_t = DEFAULT_IMAGE_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = RANDOM_SEED, allow_negative_numbers = true)]
    seed: i64,
    #[arg(short = 'p', long, default_value = DEFAULT_CIRCULAR_PROMPT)]
    prompt: String,
    #[arg(long)]
    negative_prompt_override: Option<String>,
    #[arg(long)]
    canny_weight: Option<f64>,
    #[command(flatten)]
    output: OutputArgs,
    #[arg(short = 't', long, default_value = DEFAULT_CIRCULAR_TEMPLATE)]
    output_filename_template: String,
}

#[derive(Args, Debug)]
struct PizzaArgs {
    #[command(flatten)]
    server: ServerArgs,
    /// Photo whose depth map guides the plate and table.
    #[arg(short = 'g', long)]
    guide_image: Option<PathBuf>,
    #[arg(short = 'W', long, default_value_t = DEFAULT_IMAGE_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = RANDOM_SEED, allow_negative_numbers = true)]
    seed: i64,
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_PIECES)]
    num_pieces: u32,
    #[arg(short = 'N', long, default_value_t = DEFAULT_TOTAL_NUM_PIECES)]
    total_num_pieces: u32,
    #[arg(long)]
    prompt_override: Option<String>,
    #[arg(long)]
    negative_prompt_override: Option<String>,
    #[arg(long)]
    seg_weight: Option<f64>,
    /// Seed for wedge-edge jitter in the segmentation mask.
    #[arg(long)]
    mask_seed: Option<u64>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PromptsArgs {
    #[arg(short = 'm', long, env = "LLM_MODEL", default_value = DEFAULT_LLM_MODEL)]
    model: String,
    /// OpenAI-compatible base URL; defaults to a local Ollama.
    #[arg(long, env = "LLM_BASE_URL")]
    base_url: Option<String>,
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_PROMPTS)]
    num_prompts: u32,
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_FILE)]
    output_file_path: PathBuf,
    #[arg(short = 't', long, default_value_t = 0.7)]
    temperature: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    num_retries: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum MaskShape {
    Circle,
    Pizza,
}

#[derive(Args, Debug)]
struct MaskArgs {
    #[arg(value_enum)]
    shape: MaskShape,
    #[arg(short = 'W', long, default_value_t = DEFAULT_IMAGE_WIDTH)]
    width: u32,
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_PIECES)]
    num_pieces: u32,
    #[arg(short = 'N', long, default_value_t = DEFAULT_TOTAL_NUM_PIECES)]
    total_num_pieces: u32,
    #[arg(long)]
    mask_seed: Option<u64>,
    #[arg(short = 'o', long, default_value = "mask.png")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let debug_dir = cli.debug.then(|| PathBuf::from("."));
    match cli.command {
        Command::Circular(args) => run_circular(args, debug_dir).await,
        Command::Pizza(args) => run_pizza(args, debug_dir).await,
        Command::Prompts(args) => run_prompts(args).await,
        Command::Mask(args) => run_mask(&args),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

async fn run_circular(args: CircularArgs, debug_dir: Option<PathBuf>) -> Result<(), CliError> {
    tracing::debug!(output_path = %args.output.output_path.display(), "circular");
    let destination = args.output.options()?;
    let backend = WebUiClient::new(&args.server.server_url, WebUiTimeouts::default())?;
    tracing::debug!(server = backend.base_url(), "connecting");

    let generator = CircularGen { canny_weight: args.canny_weight, debug_dir, ..CircularGen::new(args.width) };
    let overrides = PromptOverrides { prompt: None, negative_prompt: args.negative_prompt_override };
    let result = generator.generate(&backend, &args.prompt, &overrides, args.seed).await?;
    tracing::debug!(infotext = ?result.infotext(), "generated");

    let base = output::circular_base_filename(&args.output_filename_template, &result.info)?;
    let info_json = output::info_json(&result.info)?;
    destination.save(&base, &result.image, &info_json)?;
    Ok(())
}

async fn run_pizza(args: PizzaArgs, debug_dir: Option<PathBuf>) -> Result<(), CliError> {
    tracing::debug!(output_path = %args.output.output_path.display(), "pizza");
    let destination = args.output.options()?;
    let depth_guide = args.guide_image.as_deref().map(load_guide_image).transpose()?;
    let backend = WebUiClient::new(&args.server.server_url, WebUiTimeouts::default())?;
    tracing::debug!(server = backend.base_url(), "connecting");

    let generator = PizzaGen {
        seg_weight: args.seg_weight,
        debug_dir,
        mask_seed: args.mask_seed,
        ..PizzaGen::new(args.width, args.num_pieces, args.total_num_pieces)
    };
    let overrides = PromptOverrides { prompt: args.prompt_override, negative_prompt: args.negative_prompt_override };
    let result = generator.generate(&backend, depth_guide.as_ref(), &overrides, args.seed).await?;

    let info_json = output::info_json(&result.info)?;
    let base = output::pizza_base_filename(args.total_num_pieces, args.num_pieces, &info_json);
    destination.save(&base, &result.image, &info_json)?;
    Ok(())
}

fn load_guide_image(path: &Path) -> Result<image::DynamicImage, CliError> {
    tracing::info!(path = %path.display(), "loading guide image");
    image::open(path).map_err(|source| CliError::GuideImage { path: path.to_path_buf(), source })
}

async fn run_prompts(args: PromptsArgs) -> Result<(), CliError> {
    let config = LlmConfig::from_env()?.with_overrides(args.base_url.as_deref(), Some(&args.model));
    let llm = LlmClient::from_config(config)?;
    tracing::info!(model = llm.model(), num_prompts = args.num_prompts, "generating prompts");

    let policy = RetryPolicy::default().with_max_retries(args.num_retries);
    let options = ChatOptions { temperature: args.temperature, json_output: true };
    let mut generator = PromptGenerator::new(&llm, policy, options);
    let outputs = generator.run(args.num_prompts, &args.output_file_path).await?;
    tracing::info!(count = outputs.len(), path = %args.output_file_path.display(), "prompts written");
    Ok(())
}

fn run_mask(args: &MaskArgs) -> Result<(), CliError> {
    let jitter = match args.mask_seed {
        Some(seed) => RngJitter::seeded(seed),
        None => RngJitter::from_entropy(),
    };
    let mut builder = MaskBuilder::new().with_jitter(jitter);
    let canvas = match args.shape {
        MaskShape::Circle => builder.build_circle_mask(args.width)?,
        MaskShape::Pizza => {
            builder
                .build_pizza_segmentation_mask(args.width, args.num_pieces, args.total_num_pieces)?
                .canvas
        }
    };
    canvas.save_png(&args.output)?;
    tracing::info!(path = %args.output.display(), shape = ?args.shape, "mask written");
    Ok(())
}
