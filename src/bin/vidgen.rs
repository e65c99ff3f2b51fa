//! CLI for vidgen - video generation task API and tools.

use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use vidgen::server::{serve, shutdown_signal, AppState};
use vidgen::{GenerationRequest, Settings, Task, TaskProvider, TaskProviderExt, TaskStatus};

#[derive(Parser)]
#[command(name = "vidgen")]
#[command(about = "Submit and track text/image-to-video generation tasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve(ServeArgs),

    /// Create a generation task and print its id
    Create(CreateArgs),

    /// Print the current state of a task
    Status {
        /// Task id returned by `create`
        task_id: String,
    },

    /// Poll a task until it finishes
    Wait {
        /// Task id returned by `create`
        task_id: String,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Listen host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct CreateArgs {
    /// The text prompt describing the video
    prompt: String,

    /// First-frame image URL (image-to-video)
    #[arg(long)]
    image_url: Option<String>,

    /// Video duration in seconds (4, 8 or 12)
    #[arg(short, long)]
    duration: Option<u32>,

    /// Also generate an audio track
    #[arg(long)]
    audio: bool,

    /// Wait for the task to finish
    #[arg(short, long)]
    wait: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    vidgen::logging::init(&settings);
    tracing::debug!(?settings, "configuration loaded");

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            if let Some(host) = args.host {
                settings.host = host;
            }
            if let Some(port) = args.port {
                settings.port = port;
            }
            run_server(&settings).await?;
        }
        Commands::Create(args) => {
            create_task(&settings, args, cli.json).await?;
        }
        Commands::Status { task_id } => {
            let provider = settings.ark_provider()?;
            let task = provider.get_task(&task_id).await?;
            print_task(&task, cli.json)?;
        }
        Commands::Wait { task_id } => {
            let provider = settings.ark_provider()?;
            let task = provider.wait_for_task(&task_id, &settings.poll).await?;
            print_task(&task, cli.json)?;
            ensure_succeeded(&task)?;
        }
    }

    Ok(())
}

async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let provider = settings.ark_provider()?;
    tracing::info!(
        environment = %settings.environment,
        model = %provider.model(),
        base_url = %settings.base_url,
        "starting video generation API"
    );

    let listener = tokio::net::TcpListener::bind(settings.listen_addr()).await?;
    serve(listener, AppState::new(Arc::new(provider)), shutdown_signal()).await?;
    Ok(())
}

async fn create_task(settings: &Settings, args: CreateArgs, json_output: bool) -> anyhow::Result<()> {
    let provider = settings.ark_provider()?;

    let mut request = GenerationRequest::new(&args.prompt);
    if let Some(url) = args.image_url {
        request = request.with_image_url(url);
    }
    if let Some(d) = args.duration {
        request = request.with_duration(d);
    }
    if args.audio {
        request = request.with_audio(true);
    }

    let task = if args.wait {
        provider.generate(&request, &settings.poll).await?
    } else {
        provider.create_task(&request).await?
    };

    print_task(&task, json_output)?;
    if args.wait {
        ensure_succeeded(&task)?;
    }
    Ok(())
}

fn print_task(task: &Task, json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }

    println!("Task: {}", task.id);
    println!("Status: {}", task.status);
    if let Some(url) = task.video_url() {
        println!("Video: {}", url);
    }
    if let Some(ref error) = task.error {
        println!("Error: {}", error);
    }
    Ok(())
}

fn ensure_succeeded(task: &Task) -> anyhow::Result<()> {
    match task.status {
        TaskStatus::Succeeded => Ok(()),
        ref other => anyhow::bail!("task {} finished with status {}", task.id, other),
    }
}
