use std::sync::{LazyLock, Mutex, MutexGuard};

use indicatif::{ProgressBar, ProgressStyle};
use modsync_catalog::{Mod, ModFile};
use modsync_fetch::Progress;
use modsync_sync::SyncObserver;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>24.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

const PREFIX_WIDTH: usize = 24;

static PB_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

fn prefix(name: &str) -> String {
    if name.chars().count() <= PREFIX_WIDTH {
        return name.to_string();
    }
    let mut short: String = name.chars().take(PREFIX_WIDTH - 1).collect();
    short.push('…');
    short
}

/// Renders one progress bar per download on stderr.
///
/// Downloads run one after another, so a single slot is enough. indicatif
/// hides the bar when stderr is not a terminal.
#[derive(Default)]
pub struct ProgressTracker {
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressTracker {
    pub fn new() -> Self { Self::default() }

    fn current(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SyncObserver for ProgressTracker {
    fn download_started(&self, m: &Mod, file: &ModFile) {
        let pb = match file.size {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix(prefix(&m.name));

        if let Some(previous) = self.current().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn download_progress(&self, progress: &Progress) {
        if let Some(pb) = self.current().as_ref() {
            if let Some(total) = progress.total_bytes {
                pb.set_length(total);
            }
            pb.set_position(progress.bytes_downloaded);
        }
    }

    fn download_finished(&self, _m: &Mod, _file: &ModFile, succeeded: bool) {
        if let Some(pb) = self.current().take() {
            if succeeded {
                pb.finish();
            } else {
                pb.abandon();
            }
        }
    }
}
