use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory searched for terraform.tfstate files
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find state files and numeric directories without touching the network
    Discover(DiscoverArgs),
    /// Validate the connection string and the destination container
    Check(StorageArgs),
    /// List terraform.tfstate blobs already in the container
    List(StorageArgs),
    /// Discover, upload and confirm
    Migrate(StorageArgs),
}

#[derive(clap::Args, Debug)]
pub struct DiscoverArgs {
    /// Print the discovery result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct StorageArgs {
    #[arg(
        long,
        env = "AZURE_STORAGE_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub connection_string: Option<String>,

    #[arg(long, env = "AZURE_STORAGE_CONTAINER")]
    pub container: String,
}

impl StorageArgs {
    /// Missing and blank are treated the same downstream.
    pub fn connection_string(&self) -> &str {
        self.connection_string.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_discover_defaults() {
        let cli = Cli::parse_from(["tfstate-migrate", "discover"]);

        assert_eq!(cli.root, PathBuf::from("."));
        if let Command::Discover(args) = cli.command {
            assert!(!args.json);
        } else {
            panic!("Expected Discover command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_root_is_global() {
        let cli = Cli::parse_from(["tfstate-migrate", "discover", "--json", "--root=/work/infra"]);

        assert_eq!(cli.root, PathBuf::from("/work/infra"));
        if let Command::Discover(args) = cli.command {
            assert!(args.json);
        } else {
            panic!("Expected Discover command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_migrate_args_from_flags() {
        let cli = Cli::parse_from([
            "tfstate-migrate",
            "migrate",
            "--connection-string=AccountName=acct;AccountKey=a2V5",
            "--container=tfstate",
        ]);

        if let Command::Migrate(args) = cli.command {
            assert_eq!(args.connection_string(), "AccountName=acct;AccountKey=a2V5");
            assert_eq!(args.container, "tfstate");
        } else {
            panic!("Expected Migrate command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_connection_string_missing_is_empty() {
        let cs_backup = std::env::var("AZURE_STORAGE_CONNECTION_STRING").ok();
        unsafe {
            std::env::remove_var("AZURE_STORAGE_CONNECTION_STRING");
        }

        let cli = Cli::parse_from(["tfstate-migrate", "check", "--container=tfstate"]);

        unsafe {
            if let Some(cs) = cs_backup {
                std::env::set_var("AZURE_STORAGE_CONNECTION_STRING", cs);
            }
        }

        if let Command::Check(args) = cli.command {
            assert!(args.connection_string.is_none());
            assert_eq!(args.connection_string(), "");
        } else {
            panic!("Expected Check command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_settings_from_env() {
        let cs_backup = std::env::var("AZURE_STORAGE_CONNECTION_STRING").ok();
        let container_backup = std::env::var("AZURE_STORAGE_CONTAINER").ok();

        unsafe {
            std::env::set_var("AZURE_STORAGE_CONNECTION_STRING", "UseDevelopmentStorage=true");
            std::env::set_var("AZURE_STORAGE_CONTAINER", "env-container");
        }

        let cli = Cli::parse_from(["tfstate-migrate", "list"]);

        unsafe {
            match cs_backup {
                Some(cs) => std::env::set_var("AZURE_STORAGE_CONNECTION_STRING", cs),
                None => std::env::remove_var("AZURE_STORAGE_CONNECTION_STRING"),
            }
            match container_backup {
                Some(c) => std::env::set_var("AZURE_STORAGE_CONTAINER", c),
                None => std::env::remove_var("AZURE_STORAGE_CONTAINER"),
            }
        }

        if let Command::List(args) = cli.command {
            assert_eq!(args.connection_string(), "UseDevelopmentStorage=true");
            assert_eq!(args.container, "env-container");
        } else {
            panic!("Expected List command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let container_backup = std::env::var("AZURE_STORAGE_CONTAINER").ok();

        unsafe {
            std::env::set_var("AZURE_STORAGE_CONTAINER", "env-container");
        }

        let cli = Cli::parse_from(["tfstate-migrate", "migrate", "--container=cli-container"]);

        unsafe {
            match container_backup {
                Some(c) => std::env::set_var("AZURE_STORAGE_CONTAINER", c),
                None => std::env::remove_var("AZURE_STORAGE_CONTAINER"),
            }
        }

        if let Command::Migrate(args) = cli.command {
            assert_eq!(args.container, "cli-container");
        } else {
            panic!("Expected Migrate command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_container_is_required() {
        let container_backup = std::env::var("AZURE_STORAGE_CONTAINER").ok();
        unsafe {
            std::env::remove_var("AZURE_STORAGE_CONTAINER");
        }

        let result = Cli::try_parse_from(["tfstate-migrate", "migrate"]);

        unsafe {
            if let Some(c) = container_backup {
                std::env::set_var("AZURE_STORAGE_CONTAINER", c);
            }
        }

        assert!(result.is_err());
    }
}
