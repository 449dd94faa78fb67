//! Operator command lines read from stdin.

use console_core::{Msg, Panel, ViewMode};

pub const HELP: &str = "\
commands:
  view <list|card|table>        switch the harvester view
  filter [text]                 show harvesters whose name contains text
  theme                         toggle light/dark
  panel <toolbox|chart|enabled|disabled>
  check <name> | uncheck <name> select a table row
  checkall | uncheckall         master checkbox
  batch-start | batch-toggle    act on the selected rows
  start <name> | stop <name>
  start-all | stop-all
  schedule <name> <crontab>     add a cron schedule
  unschedule <name> <crontab>   remove a cron schedule
  log | history <name> | chart
  close | dismiss               close the dialog, clear alerts
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Parses one input line. Blank lines are `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    if word.is_empty() {
        return Ok(None);
    }

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "view" => {
            let mode = required(rest, "view", "a view mode")?
                .parse::<ViewMode>()
                .map_err(CommandError::Invalid)?;
            Msg::ViewModeSelected(mode)
        }
        "filter" => Msg::FilterChanged(rest.to_string()),
        "theme" => Msg::ThemeToggled,
        "panel" => {
            let panel = required(rest, "panel", "a panel name")?
                .parse::<Panel>()
                .map_err(CommandError::Invalid)?;
            Msg::PanelToggled(panel)
        }
        "check" => Msg::RowCheckChanged {
            name: required(rest, "check", "a harvester name")?.to_string(),
            checked: true,
        },
        "uncheck" => Msg::RowCheckChanged {
            name: required(rest, "uncheck", "a harvester name")?.to_string(),
            checked: false,
        },
        "checkall" => Msg::MasterCheckChanged(true),
        "uncheckall" => Msg::MasterCheckChanged(false),
        "batch-start" => Msg::BatchStartClicked,
        "batch-toggle" => Msg::BatchToggleClicked,
        "start" => Msg::StartClicked {
            name: required(rest, "start", "a harvester name")?.to_string(),
        },
        "stop" => Msg::StopClicked {
            name: required(rest, "stop", "a harvester name")?.to_string(),
        },
        "start-all" => Msg::StartAllClicked,
        "stop-all" => Msg::StopAllClicked,
        "schedule" => {
            let (name, crontab) = name_and_crontab(rest, "schedule")?;
            Msg::ScheduleSubmitted { name, crontab }
        }
        "unschedule" => {
            let (name, crontab) = name_and_crontab(rest, "unschedule")?;
            Msg::ScheduleDeleted { name, crontab }
        }
        "log" | "logs" => Msg::LogRequested,
        "history" => Msg::HistoryRequested {
            name: required(rest, "history", "a harvester name")?.to_string(),
        },
        "chart" => Msg::ChartRequested,
        "close" => Msg::ModalClosed,
        "dismiss" => Msg::AlertsDismissed,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(Command::Dispatch(msg)))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn name_and_crontab(rest: &str, command: &'static str) -> Result<(String, String), CommandError> {
    let rest = required(rest, command, "a harvester name and a crontab")?;
    match rest.split_once(char::is_whitespace) {
        Some((name, crontab)) if !crontab.trim().is_empty() => {
            Ok((name.to_string(), crontab.trim().to_string()))
        }
        _ => Err(CommandError::MissingArgument {
            command,
            argument: "a crontab",
        }),
    }
}
