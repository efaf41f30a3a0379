use std::path::PathBuf;

use clap::{Parser, Subcommand};
use refineflow::cli::{run_workflow_file, validate_workflow_file};
use refineflow::utils::LoggingConfig;

#[derive(Parser)]
#[command(name = "refineflow", version, about = "RefineFlow CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 用本地回显后端干跑一个工作流
    Run {
        config: PathBuf,
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
    /// 预检一个工作流配置
    Validate {
        config: PathBuf,
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            prompt,
            api_key,
            pretty,
        } => {
            let output = run_workflow_file(&config, &prompt, api_key).await?;
            let content = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{content}");
        }
        Command::Validate { config, api_key } => {
            validate_workflow_file(&config, api_key)?;
            println!("Workflow config `{}` is valid.", config.display());
        }
    }
    Ok(())
}
