use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;
use watson_voice::{AudioOutput, ClientConfig, DeviceOutput, MutedOutput, Script, ScriptRunner};

/// Sends a scripted conversation to the assistant and speaks each reply.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Question to ask. Repeat for several. Defaults to the built-in script.
    #[arg(long = "question", short = 'q')]
    questions: Vec<String>,

    /// Skip the opening "hello".
    #[arg(long)]
    no_greeting: bool,

    /// Output device name. Overrides AUDIO_OUTPUT_DEVICE.
    #[arg(long)]
    output_device: Option<String>,

    /// Print the available output devices and exit.
    #[arg(long)]
    list_devices: bool,

    /// Do not open an audio device. Replies still take their spoken length.
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let args = Args::parse();

    if args.list_devices {
        println!("{}", watson_voice::utils::device::get_available_outputs()?);
        return Ok(());
    }

    let config = ClientConfig::from_env().context("failed to load configuration")?;

    let output: Box<dyn AudioOutput> = if args.mute {
        Box::new(MutedOutput)
    } else {
        let device = args.output_device.as_deref().or(config.output_device());
        Box::new(DeviceOutput::new(device))
    };

    let script = if args.questions.is_empty() {
        Script::default()
    } else {
        Script::new(args.questions)
    };
    let script = if args.no_greeting {
        script.without_greeting()
    } else {
        script
    };

    let run = async {
        let mut runner = ScriptRunner::connect(&config, output)
            .await
            .context("failed to authenticate")?;
        runner.run(&script).await.context("conversation aborted")
    };

    tokio::select! {
        summary = run => {
            let summary = summary?;
            if summary.stopped_early {
                println!("Conversation ended by the assistant.");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl-C, shutting down...");
        }
    }
    Ok(())
}
