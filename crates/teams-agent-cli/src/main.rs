//! Teams Agent CLI - chat with a Microsoft Teams assistant
//!
//! Reads `ARCADE_USER_ID`, `OPENAI_MODEL` and `ARCADE_API_KEY` from the
//! environment (a `.env` file in the working directory is loaded first),
//! retrieves the Microsoft Teams tools from Arcade and starts an interactive
//! session. Type `exit` to quit.

mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use teams_agent_core::agent::{create_agent, AgentOptions, MemorySaver, RunnableConfig};
use teams_agent_core::approval::ToolApprovalConfig;
use teams_agent_core::arcade::ArcadeClient;
use teams_agent_core::config::{AgentConfig, AgentSettings, ApprovalSettings};
use teams_agent_core::provider::GenAIProvider;
use teams_agent_core::session::ChatLoop;
use teams_agent_core::tools::{get_tools, ToolQuery};

use terminal::ConsoleTerminal;

#[derive(Parser)]
#[command(name = "teams-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Microsoft Teams assistant powered by Arcade tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Conversation thread identifier
    #[arg(long)]
    thread_id: Option<String>,

    /// Auto-approve all tool calls (use with caution!)
    #[arg(long)]
    auto_approve: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Warn level by default so logs stay out of the chat; RUST_LOG wins over both
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "info,teams_agent_core=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match &cli.config {
        Some(path) => AgentSettings::load(path)?,
        None => AgentSettings::default(),
    };
    if let Some(thread_id) = cli.thread_id {
        settings.thread_id = thread_id;
    }

    // Fails before anything touches the network
    let config = AgentConfig::from_env(settings)?;
    let approval = approval_config(cli.auto_approve, &config.settings.approval);
    run_chat(config, approval).await
}

fn approval_config(auto_approve: bool, settings: &ApprovalSettings) -> ToolApprovalConfig {
    if auto_approve {
        ToolApprovalConfig::trust_all()
    } else {
        ToolApprovalConfig::from_settings(settings)
    }
}

async fn run_chat(config: AgentConfig, approval: ToolApprovalConfig) -> anyhow::Result<()> {
    let arcade = Arc::new(ArcadeClient::new(&config.arcade)?);

    let settings = &config.settings;
    let tools = get_tools(
        &arcade,
        &ToolQuery {
            toolkits: &settings.toolkits,
            tools: &settings.tools,
            user_id: &config.user_id,
            limit: settings.tool_limit,
        },
    )
    .await?;
    info!(count = tools.len(), model = %config.model, "Starting chat");

    let agent = create_agent(AgentOptions {
        system_prompt: settings.system_prompt.clone(),
        model: Arc::new(GenAIProvider::new(&config.model)),
        tools,
        executor: arcade.clone(),
        approval,
        checkpointer: Arc::new(MemorySaver::new()),
        user_id: config.user_id.clone(),
        recursion_limit: settings.recursion_limit,
    });

    let mut terminal = ConsoleTerminal::new()?;
    ChatLoop::new(&agent, &*arcade, RunnableConfig::new(&settings.thread_id))
        .run(&mut terminal)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_approve_flag_trusts_all_tools() {
        let settings = ApprovalSettings {
            require_approval: vec!["MicrosoftTeams_ListChats".to_string()],
            auto_approve_all: false,
        };

        let approval = approval_config(true, &settings);
        assert!(!approval.needs_approval("MicrosoftTeams_SendMessageToChat"));
        assert!(!approval.needs_approval("MicrosoftTeams_ListChats"));
    }

    #[test]
    fn test_settings_apply_without_flag() {
        let settings = ApprovalSettings {
            require_approval: vec!["MicrosoftTeams_ListChats".to_string()],
            auto_approve_all: false,
        };

        let approval = approval_config(false, &settings);
        assert!(approval.needs_approval("MicrosoftTeams_SendMessageToChat"));
        assert!(approval.needs_approval("MicrosoftTeams_ListChats"));
    }
}
