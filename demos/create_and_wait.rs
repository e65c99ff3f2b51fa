//! Create a task and wait for the video.
//!
//! Run with: `cargo run --example create_and_wait`
//!
//! Requires `BYTEDANCE_ARK_API_KEY` and `BYTEDANCE_MODEL_ID`.

use vidgen::{GenerationRequest, PollPolicy, Settings, TaskProvider, TaskProviderExt, TaskStatus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    vidgen::logging::init(&settings);
    let provider = settings.ark_provider()?;

    let request = GenerationRequest::new("A cute cat playing on the grass, cinematic lighting")
        .with_image_url("https://example.com/cat.jpg")
        .with_duration(4);

    let task = provider.create_task(&request).await?;
    println!("Created task {} ({})", task.id, task.status);

    println!("Waiting for the video (this may take a few minutes)...");
    let done = provider.wait_for_task(&task.id, &PollPolicy::default()).await?;

    match done.status {
        TaskStatus::Succeeded => println!("Video: {}", done.video_url().unwrap_or("<no url>")),
        ref other => println!("Task finished with status {other}"),
    }

    Ok(())
}
