use phonebook::app::PhonebookApp;
use phonebook::config::PhonebookConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliMode {
    Run { base_url: Option<String> },
    Help,
}

fn parse_cli_mode<I>(args: I) -> anyhow::Result<CliMode>
where
    I: IntoIterator<Item = String>,
{
    let mut base_url = None;
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(CliMode::Help),
            "--base-url" => match args.next() {
                Some(value) => base_url = Some(value),
                None => anyhow::bail!("--base-url requires a value"),
            },
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(CliMode::Run { base_url })
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let base_url = match parse_cli_mode(std::env::args())? {
        CliMode::Help => {
            println!("Usage: phonebook [--base-url <url>]");
            println!("  --base-url <url>   Collection endpoint (default: $PHONEBOOK_BASE_URL)");
            return Ok(());
        }
        CliMode::Run { base_url } => base_url,
    };
    let mut config = PhonebookConfig::from_env()?;
    if let Some(base_url) = base_url {
        config = config.with_base_url(&base_url)?;
    }
    init_tracing(&config.log_filter);
    let app = PhonebookApp::bootstrap(config)?;
    app.run().await
}
