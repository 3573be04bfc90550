//! Stdio MCP server exposing WeChat Official Account publishing tools.

// std
use std::sync::Arc;
// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use wechat_mp_mcp::{account::AccountConfig, client::MpClient, mcp::McpServer, url::Url};

/// WeChat Official Account publishing tools over MCP (stdio).
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Official Account app id.
	#[arg(long, env = "WECHAT_APP_ID")]
	app_id: String,
	/// Official Account app secret.
	#[arg(long, env = "WECHAT_APP_SECRET", hide_env_values = true)]
	app_secret: String,
	/// Override for the `cgi-bin` API base.
	#[arg(long, env = "WECHAT_API_BASE")]
	api_base: Option<Url>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	dotenvy::dotenv().ok();

	// Stdout carries the protocol.
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wechat_mp_mcp=info".into()))
		.with(fmt::layer().with_writer(std::io::stderr))
		.init();

	let cli = Cli::parse();
	let mut account = AccountConfig::builder(cli.app_id, cli.app_secret);

	if let Some(api_base) = cli.api_base {
		account = account.api_base(api_base);
	}

	let account = account.build()?;

	tracing::info!(app_id = %account.app_id, api_base = %account.api_base, "Configured account.");

	let server = Arc::new(McpServer::new(MpClient::new(account)));

	tracing::info!("WeChat MP MCP server running on stdio.");

	server.serve_stdio().await?;

	Ok(())
}
