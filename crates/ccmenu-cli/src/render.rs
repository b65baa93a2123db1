use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use ccmenu_core::{ComponentState, Plan, Snapshot};
use ccmenu_installer::{ApplyReport, StepOutcome, StepReport};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct TerminalProgress {
    style: OutputStyle,
    label: String,
    total: u64,
    current: u64,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn style(self) -> OutputStyle {
        self.style
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        println!("{}", render_status_line(self.style, status, message));
    }

    pub(crate) fn print_section(self, title: &str) {
        if let Some(line) = render_section_header(self.style, title) {
            println!();
            println!("{}", colorize(section_style(), &line));
        }
    }

    pub(crate) fn start_progress(self, label: &str, total: u64) -> TerminalProgress {
        let progress_bar = if self.style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new(total.max(1));
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.cyan.bold} {msg:<12} [{bar:20.cyan/blue}] {pos:>3}/{len:3} {elapsed_precise}",
            ) {
                progress_bar.set_style(
                    style
                        .tick_chars(progress_tick_chars(label))
                        .progress_chars("=>-"),
                );
            }
            progress_bar.set_message(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };

        TerminalProgress {
            style: self.style,
            label: label.to_string(),
            total,
            current: 0,
            progress_bar,
            started_at: Instant::now(),
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }
}

impl TerminalProgress {
    pub(crate) fn set(&mut self, current: u64) {
        self.current = current.min(self.total);

        let Some(progress_bar) = &self.progress_bar else {
            return;
        };

        let safe_total = self.total.max(1);
        progress_bar.set_length(safe_total);
        progress_bar.set_position(self.current.min(safe_total));
    }

    /// Prints above the bar so the bar is not torn.
    pub(crate) fn println(&self, line: &str) {
        match &self.progress_bar {
            Some(progress_bar) => progress_bar.println(line),
            None => println!("{line}"),
        }
    }

    pub(crate) fn finish_success(mut self) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };

        progress_bar.finish_and_clear();
        if let Some(line) = render_progress_line(
            self.style,
            &self.label,
            self.current,
            self.total,
            Some(self.started_at.elapsed()),
        ) {
            println!("{line}");
        }
    }

    pub(crate) fn finish_abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn current_output_style(force_plain: bool) -> OutputStyle {
    if force_plain {
        return OutputStyle::Plain;
    }
    resolve_output_style(
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    )
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool, _stderr_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

/// Badges stay ASCII so redirected logs remain readable.
pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = match status {
                "ok" => "[OK]",
                "warn" => "[WARN]",
                "err" => "[ERR]",
                _ => "[..]",
            };
            format!("{badge} {message}")
        }
    }
}

fn status_for_state(state: &ComponentState) -> &'static str {
    match state {
        ComponentState::Installed(_) => "ok",
        ComponentState::Stale | ComponentState::PartiallyInstalled => "warn",
        ComponentState::Absent => "err",
    }
}

fn component_row(label: &str, state: &ComponentState) -> String {
    format!("{label:<22} {}", state.label())
}

pub(crate) fn render_snapshot_lines(style: OutputStyle, snapshot: &Snapshot) -> Vec<String> {
    let mut lines = snapshot
        .iter()
        .map(|(component, state)| {
            render_status_line(
                style,
                status_for_state(state),
                &component_row(component.display_name(), state),
            )
        })
        .collect::<Vec<_>>();

    let aggregate = snapshot.context_menu_state();
    lines.push(render_status_line(
        style,
        status_for_state(&aggregate),
        &component_row("Context Menu", &aggregate),
    ));
    lines
}

pub(crate) fn render_plan_lines(style: OutputStyle, plan: &Plan) -> Vec<String> {
    if plan.is_empty() {
        return vec![render_status_line(
            style,
            "ok",
            &format!("{}: nothing to do", plan.target()),
        )];
    }

    plan.actions()
        .iter()
        .enumerate()
        .map(|(index, action)| {
            render_status_line(
                style,
                "info",
                &format!("{}. {}", index + 1, action.describe()),
            )
        })
        .collect()
}

pub(crate) fn render_step_line(style: OutputStyle, total: usize, step: &StepReport) -> String {
    let prefix = format!("[{}/{}] {}", step.index + 1, total, step.action.describe());
    match &step.outcome {
        StepOutcome::Applied { state } => match state.version() {
            Some(version) => render_status_line(style, "ok", &format!("{prefix} ({version})")),
            None => render_status_line(style, "ok", &prefix),
        },
        StepOutcome::Failed(err) => {
            render_status_line(style, "err", &format!("{prefix} failed: {err}"))
        }
        StepOutcome::Skipped { reason } => {
            render_status_line(style, "warn", &format!("{prefix} {reason}"))
        }
        StepOutcome::NotAttempted => {
            render_status_line(style, "info", &format!("{prefix} not attempted"))
        }
    }
}

pub(crate) fn format_reconcile_summary_line(report: &ApplyReport) -> String {
    let mut applied = 0;
    let mut failed = 0;
    let mut skipped = 0;
    let mut not_attempted = 0;
    for step in &report.steps {
        match step.outcome {
            StepOutcome::Applied { .. } => applied += 1,
            StepOutcome::Failed(_) => failed += 1,
            StepOutcome::Skipped { .. } => skipped += 1,
            StepOutcome::NotAttempted => not_attempted += 1,
        }
    }
    format!(
        "{} summary: applied={applied} failed={failed} skipped={skipped} not-attempted={not_attempted}",
        report.target
    )
}

pub(crate) fn render_report_lines(style: OutputStyle, report: &ApplyReport) -> Vec<String> {
    let mut lines = report
        .warnings
        .iter()
        .map(|warning| render_status_line(style, "warn", warning))
        .collect::<Vec<_>>();
    let status = if report.is_success() { "ok" } else { "err" };
    lines.push(render_status_line(
        style,
        status,
        &format_reconcile_summary_line(report),
    ));
    lines
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn progress_tick_chars(label: &str) -> &'static str {
    match label {
        "install" => ".oO@* ",
        "context-only" => "-=~* ",
        "uninstall" => "\\|/- ",
        _ => "|/-\\ ",
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn progress_bar_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightBlue.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(format!("== {title} ==")),
    }
}

fn render_progress_line(
    style: OutputStyle,
    label: &str,
    current: u64,
    total: u64,
    elapsed: Option<Duration>,
) -> Option<String> {
    if style == OutputStyle::Plain {
        return None;
    }

    let width = 18_usize;
    let safe_total = total.max(1);
    let bounded_current = current.min(safe_total);
    let filled = ((bounded_current as usize) * width) / (safe_total as usize);
    let bar = format!(
        "{}{}",
        "=".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let percent = (bounded_current * 100) / safe_total;
    let counts = format!("{}/{}", HumanCount(current), HumanCount(total));
    let suffix = elapsed
        .map(|value| format!(" complete in {}", format_elapsed(value)))
        .unwrap_or_default();

    Some(format!(
        "{} [{}] {:>3}% {}{}",
        colorize(progress_label_style(), label),
        colorize(progress_bar_style(), &bar),
        percent,
        counts,
        suffix
    ))
}
