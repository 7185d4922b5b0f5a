use docsearch::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Renders replay progress as a step bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::ReplayStart { total_steps } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    if let Some(style) = Self::bar_style() {
                        pb_guard.set_style(style);
                    }
                    pb_guard.set_message("Replaying");
                }
                Progress::StepStart { description, .. } => {
                    pb_guard.set_message(description);
                }
                Progress::StepFinish { .. } => {
                    pb_guard.inc(1);
                }
                Progress::ReplayFinish => {
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn bar_style() -> Option<ProgressStyle> {
        ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len}")
            .ok()
            .map(|style| style.progress_chars("##-"))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
