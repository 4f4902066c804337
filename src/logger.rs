//! Terminal output: colored `log!` lines and a task progress bar.
//!
//! ```ignore
//! log!("styles"; "patched {} rules", rules.len());
//!
//! let progress = ProgressBars::new(&[("tasks", graph.len())]);
//! progress.inc(0);
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Number of bar lines currently reserved below the log area
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// Bar layout: "[tasks] [████░░░░] 3/9"

/// "[" + "]" + trailing space
const PREFIX_OVERHEAD: usize = 3;
/// " []" around the bar plus the space before the counter
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn prefix_len(module_len: usize) -> usize {
    module_len + PREFIX_OVERHEAD
}

/// Falls back to 120 columns when the width cannot be detected (pipes, CI).
fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("html"; "assembled {} pages", count);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print one prefixed line, keeping any active progress bars below it.
#[allow(clippy::cast_possible_truncation)] // bar count is tiny
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    // Multiline messages (tool diagnostics) are printed whole.
    if message.contains('\n') {
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let max_len = terminal_width().saturating_sub(prefix_len(module.len()));
        writeln!(stdout, "{prefix} {}", truncate_str(message, max_len)).ok();
    }

    for _ in 0..bar_count {
        writeln!(stdout).ok();
    }
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" | "dev" => prefix.bright_green().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate to at most `max_len` bytes on a char boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress Bars
// ============================================================================

/// Progress bars drawn on reserved lines under the log output.
///
/// Bars are addressed by creation index. Updates from rayon workers are
/// serialized through an internal mutex.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    /// Reserve one terminal line per `(name, total)` entry.
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in modules {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        BAR_COUNT.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .enumerate()
            .map(|(row, (module, total))| ProgressBar {
                prefix: colorize_prefix(module),
                prefix_len: prefix_len(module.len()),
                total: *total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Advance the bar at `index` by one step.
    pub fn inc(&self, index: usize) {
        if let Some(bar) = self.bars.get(index) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    #[allow(clippy::cast_possible_truncation)] // bar count is tiny
    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let counter = format!("{}/{}", current, bar.total);
        let available = terminal_width().saturating_sub(bar.prefix_len + BAR_OVERHEAD + counter.len());
        let width = available.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
        let filled = if bar.total > 0 {
            (current.min(bar.total) * width) / bar.total
        } else {
            0
        };
        let drawn = "█".repeat(filled) + &"░".repeat(width - filled);

        let mut stdout = stdout().lock();
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(stdout, cursor::MoveUp(lines_up)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", bar.prefix, drawn, counter).ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Erase the bars and hand their lines back to the log.
    #[allow(clippy::cast_possible_truncation)] // bar count is tiny
    pub fn finish(&self) {
        if BAR_COUNT.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        let rows = self.bars.len() as u16;
        execute!(stdout, cursor::MoveUp(rows)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}
