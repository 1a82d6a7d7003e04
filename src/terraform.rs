mod discovery;
mod numeric;
mod state;

pub use discovery::find_state_files;
pub use numeric::numeric_directories;
pub use state::StateFile;

pub const STATE_FILE_NAME: &str = "terraform.tfstate";
