pub mod run_loader;

pub use run_loader::{load_all_run_files, load_toml_to_run};
