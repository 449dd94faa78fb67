//! Text rendering of the page view model.

use console_core::{
    BarStyle, BatchControl, ChartData, HarvesterState, HarvesterView, PageView, Panel,
    PanelVisibility, ViewMode,
};

const BAR_CELLS: usize = 20;

pub fn render(view: &PageView) -> Vec<String> {
    let mut lines = Vec::new();
    let mode = view.ui.get_mode();
    let switches: Vec<String> = view
        .mode_switches
        .iter()
        .map(|switch| {
            if switch.enabled {
                switch.mode.to_string()
            } else {
                format!("[{}]", switch.mode)
            }
        })
        .collect();
    lines.push(format!(
        "== harvester console == view: {} | theme: {}",
        switches.join(" "),
        view.ui.theme.as_str()
    ));
    lines.push(format!(
        "harvesters: {} enabled, {} disabled | documents: {} cached / {} max",
        view.totals.enabled, view.totals.disabled, view.totals.cached_docs, view.totals.max_docs
    ));
    if !view.filter_query.is_empty() {
        lines.push(format!("filter: {}", view.filter_query));
    }

    if is_open(view, Panel::Toolbox) {
        lines.push(format!(
            "toolbox: all rows {} | batch start: {} | batch toggle: {}",
            if view.master_checked { "[x]" } else { "[ ]" },
            batch_label(&view.batch.start),
            batch_label(&view.batch.toggle)
        ));
    }

    let (enabled, disabled): (Vec<&HarvesterView>, Vec<&HarvesterView>) = view
        .visible_harvesters()
        .partition(|harvester| harvester.widget.state != HarvesterState::Disabled);

    if is_open(view, Panel::EnabledHarvesters) {
        lines.push(String::from("-- enabled --"));
        lines.extend(enabled.iter().flat_map(|harvester| harvester_lines(harvester, mode)));
    }
    if is_open(view, Panel::DisabledHarvesters) {
        lines.push(String::from("-- disabled --"));
        lines.extend(disabled.iter().flat_map(|harvester| harvester_lines(harvester, mode)));
    }

    if is_open(view, Panel::Chart) {
        if let Some(chart) = &view.chart {
            lines.extend(chart_lines(chart));
        }
    }

    for alert in &view.alerts {
        lines.push(format!("! {alert}"));
    }
    if let Some(modal) = &view.modal {
        lines.push(format!("-- {} --", modal.title));
        lines.extend(modal.body.lines().map(str::to_string));
        lines.push(String::from("-- 'close' to dismiss --"));
    }
    lines
}

fn is_open(view: &PageView, panel: Panel) -> bool {
    view.ui.panels.get(panel) == PanelVisibility::Visible
}

fn batch_label(control: &BatchControl) -> &str {
    control.target.as_deref().unwrap_or("-")
}

fn harvester_lines(harvester: &HarvesterView, mode: ViewMode) -> Vec<String> {
    let widget = &harvester.widget;
    let polling = if harvester.polling { " *" } else { "" };
    match mode {
        ViewMode::List => vec![format!("  {} ({}){}", widget.name, widget.badge.text, polling)],
        ViewMode::Card => {
            let mut lines = vec![
                format!("  [{}] {}{}", widget.badge.text, widget.name, polling),
                format!("    {} {}", bar(widget.progress.width, widget.progress.style), widget.progress.text),
            ];
            if !widget.time_label.is_empty() {
                lines.push(format!("    {}", widget.time_label));
            }
            if let Some(health) = widget.health.as_deref().filter(|health| *health != "OK") {
                lines.push(format!("    health: {health}"));
            }
            lines
        }
        ViewMode::Table => vec![format!(
            "  {} {:<20} {:<12} {:>6} {:>10} {:>10}  {}",
            if harvester.checked { "[x]" } else { "[ ]" },
            widget.name,
            widget.badge.text,
            widget.progress.text,
            widget
                .cached_docs
                .map_or_else(|| "N/A".to_string(), |count| count.to_string()),
            widget.max_docs.to_string(),
            widget.time_label
        )],
    }
}

fn bar(width: u8, style: BarStyle) -> String {
    let filled = usize::from(width.min(100)) * BAR_CELLS / 100;
    let fill = match style {
        BarStyle::Animated => '>',
        BarStyle::Static => '#',
    };
    let mut bar = String::with_capacity(BAR_CELLS + 2);
    bar.push('|');
    bar.extend(std::iter::repeat(fill).take(filled));
    bar.extend(std::iter::repeat(' ').take(BAR_CELLS - filled));
    bar.push('|');
    bar
}

fn chart_lines(chart: &ChartData) -> Vec<String> {
    let total = chart.total().max(1);
    let mut lines = vec![format!("-- cached documents ({}) --", chart.total())];
    for (label, count) in chart.labels.iter().zip(&chart.data) {
        let share = usize::try_from(*count * BAR_CELLS as u64 / total).unwrap_or(BAR_CELLS);
        lines.push(format!("  {:<20} {:<20} {}", label, "=".repeat(share), count));
    }
    lines
}
