use breachpress::cli::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breachpress=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, name }) => {
            breachpress::cli::init::run(path, name).await?;
        }
        Some(Commands::Serve { host, port }) => {
            breachpress::cli::serve::run(&cli.config, &host, port).await?;
        }
        Some(Commands::Migrate) => {
            breachpress::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::Bootstrap {
            username,
            email,
            password,
        }) => {
            breachpress::cli::bootstrap::run(&cli.config, &username, &email, password).await?;
        }
        Some(Commands::Story { command }) => {
            breachpress::cli::story::run(&cli.config, command).await?;
        }
        Some(Commands::Publish {
            title,
            summary,
            body_file,
            category,
            author,
            meta_description,
            tags,
            featured,
            draft,
        }) => {
            breachpress::cli::publish::run(
                &cli.config,
                title,
                summary,
                body_file,
                category,
                author,
                meta_description,
                tags,
                featured,
                draft,
            )
            .await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
