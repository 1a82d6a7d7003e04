mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use tfstate_migrate::{MigrateError, Migration, MigrationPlan, migrate, output};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Discover(args) => discover(&cli.root, args.json),
        Command::Check(args) => migrate::connect(args.connection_string(), &args.container, &[])
            .await
            .map(|_| ()),
        Command::List(args) => list(args.connection_string(), &args.container).await,
        Command::Migrate(args) => Migration::new(&cli.root, &args.container)
            .run(args.connection_string())
            .await
            .map(|_| ()),
    };

    if let Err(err) = result {
        output::print_abort(&err);
        return Err(err.into());
    }

    Ok(())
}

fn discover(root: &std::path::Path, json: bool) -> Result<(), MigrateError> {
    let plan = MigrationPlan::discover(root);
    tracing::info!(
        files = plan.state_files.len(),
        numeric_directories = plan.numeric_directories.len(),
        "discovery complete"
    );

    if json {
        println!("{}", plan.to_json()?);
    } else {
        output::print_plan(&plan);
    }

    if plan.state_files.is_empty() {
        return Err(MigrateError::NoStateFiles {
            root: plan.root,
        });
    }
    Ok(())
}

async fn list(connection_string: &str, container: &str) -> Result<(), MigrateError> {
    let store = migrate::connect(connection_string, container, &[]).await?;
    let count = migrate::confirm_uploads(store.as_ref(), container).await;
    tracing::info!(count, "listing complete");
    Ok(())
}
