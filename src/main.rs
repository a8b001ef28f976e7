use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklane_mcp::auth::TokenSource;
use tasklane_mcp::mcp::{self, AppContext};
use tasklane_mcp::Config;

#[derive(Parser)]
#[command(name = "tasklane-mcp")]
#[command(about = "Tasklane project boards as MCP tools for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server via stdio (default)
    Mcp,
    /// Log in with the OAuth device flow and store the token
    Login,
    /// Remove the stored token and any pending login
    Logout,
    /// Show where the token comes from and whether it works
    Status,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tasklane_mcp=info".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // MCP mode needs stderr for logging since stdout is the protocol channel
    let use_stderr = matches!(cli.command, None | Some(Commands::Mcp));
    init_tracing(use_stderr);

    let config = Config::from_env();
    let ctx = AppContext::new(&config);

    match cli.command {
        None | Some(Commands::Mcp) => mcp::run_stdio_server(ctx).await?,
        Some(Commands::Login) => login(&ctx).await?,
        Some(Commands::Logout) => {
            ctx.tokens().clear_token()?;
            ctx.tokens().clear_pending_device_code()?;
            println!("Logged out.");
            if ctx.tokens().token_source() == TokenSource::Environment {
                println!("Note: TASKLANE_API_TOKEN is still set and takes precedence.");
            }
        }
        Some(Commands::Status) => status(&ctx).await?,
    }

    Ok(())
}

/// Device login with the poll loop owned here; Ctrl-C cancels it.
async fn login(ctx: &AppContext) -> anyhow::Result<()> {
    let code = ctx.device.request_device_code().await?;
    ctx.tokens()
        .save_pending_device_code(&code.device_code, code.expires_in)?;

    println!("Open {} and confirm the code:", code.verification_url());
    println!();
    println!("    {}", code.user_code);
    println!();
    println!("Waiting for approval (expires in {}s)...", code.expires_in);

    let token = tokio::select! {
        result = ctx.device.wait_for_token(&code) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("Login cancelled.");
            ctx.tokens().clear_pending_device_code()?;
            return Ok(());
        }
    };

    let token = match token {
        Ok(token) => token,
        Err(e) => {
            ctx.tokens().clear_pending_device_code()?;
            return Err(e.into());
        }
    };

    ctx.tokens().save_token(&token.access_token)?;
    ctx.tokens().clear_pending_device_code()?;
    println!("Logged in.");
    Ok(())
}

async fn status(ctx: &AppContext) -> anyhow::Result<()> {
    let source = ctx.tokens().token_source();
    if source == TokenSource::None {
        println!("Not logged in. Run `tasklane-mcp login`.");
        return Ok(());
    }

    println!("Token source: {}", source.as_str());
    match ctx.client.get("/me", &[]).await {
        Ok(user) => {
            let user = user.get("data").cloned().unwrap_or(user);
            println!("Authenticated as:");
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Err(mcp::ApiError::Unauthorized(message)) => println!("Token rejected: {}", message),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
