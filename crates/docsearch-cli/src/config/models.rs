use docsearch::engine::config::ControllerConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub controller: ControllerConfig,
}
