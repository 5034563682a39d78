use indicatif::{ProgressBar, ProgressStyle};

const DEFAULT_WIDTH: usize = 80;

/// Wraps `label` in an OSC-8 terminal hyperlink pointing at `url`.
pub fn link(url: &str, label: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, label)
}

pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// A horizontal rule, optionally with a centred title.
pub fn rule(title: Option<&str>, width: usize) -> String {
    let Some(title) = title else {
        return "─".repeat(width);
    };

    let title_width = title.chars().count() + 2;
    if title_width >= width {
        return format!(" {} ", title);
    }

    let left = (width - title_width) / 2;
    let right = width - title_width - left;
    format!("{} {} {}", "─".repeat(left), title, "─".repeat(right))
}

/// Indents every line of `text` by two spaces.
pub fn pad(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Progress bar on stderr for the per-entity fetch loops.
pub fn progress(len: usize, message: String) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{msg} {bar:40} {pos}/{len} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message(message);
    bar
}
