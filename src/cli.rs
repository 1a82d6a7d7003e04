mod args;

pub use args::{Cli, Command, DiscoverArgs, StorageArgs};
