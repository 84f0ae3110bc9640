//! Event handling and console rendering

use anvil_events::{AppEvent, BuildEvent, GeneralEvent};
use console::Style;

/// Renders events from the build pipeline onto the terminal
pub struct EventHandler {
    bold: Style,
    dim: Style,
    green: Style,
    yellow: Style,
    red: Style,
    verbose: bool,
}

impl EventHandler {
    /// Create a new event handler. With colors disabled every style
    /// renders as plain text.
    pub fn new(colors_enabled: bool, verbose: bool) -> Self {
        if colors_enabled {
            let base = Style::new().force_styling(true);
            Self {
                bold: base.clone().bold(),
                dim: base.clone().dim(),
                green: base.clone().green(),
                yellow: base.clone().yellow(),
                red: base.red(),
                verbose,
            }
        } else {
            Self {
                bold: Style::new(),
                dim: Style::new(),
                green: Style::new(),
                yellow: Style::new(),
                red: Style::new(),
                verbose,
            }
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: &AppEvent) {
        crate::logging::log_event(event);
        match event {
            AppEvent::Build(build) => self.handle_build_event(build),
            AppEvent::General(general) => self.handle_general_event(general),
        }
    }

    fn handle_build_event(&self, event: &BuildEvent) {
        match event {
            BuildEvent::SessionStarted { project, toolchain } => {
                println!("{}", self.bold.apply_to(format!("{project} [{toolchain}]")));
            }
            BuildEvent::SessionCompleted { duration, .. } => {
                println!(
                    "{}",
                    self.green
                        .apply_to(format!("Successfully built in {:.1}s", duration.as_secs_f64()))
                );
            }
            BuildEvent::CleanStarted { .. } => {
                println!("{}", self.bold.apply_to("Clean build!"));
            }
            BuildEvent::CompileStarted { object } | BuildEvent::LinkStarted { exe: object } => {
                println!("{}", self.bold.apply_to(format!("* {object}")));
            }
            BuildEvent::CompileSkipped { object } => {
                if self.verbose {
                    println!("{}", self.dim.apply_to(format!("  {object} up to date")));
                }
            }
            BuildEvent::CommandEmitted { command } => {
                println!("{command}");
            }
        }
    }

    fn handle_general_event(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, .. } => {
                println!("{}", self.yellow.apply_to(format!("Warning: {message}")));
            }
            GeneralEvent::Error { message, details } => {
                println!("{}", self.red.apply_to(format!("Error: {message}")));
                if let Some(details) = details {
                    println!("{}", self.dim.apply_to(details.to_string()));
                }
            }
            GeneralEvent::DebugLog { message } => {
                if self.verbose {
                    println!("{}", self.dim.apply_to(message.to_string()));
                }
            }
            GeneralEvent::OperationStarted { operation } => {
                println!("{}", self.bold.apply_to(operation.to_string()));
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    println!("{}", self.green.apply_to(operation.to_string()));
                } else {
                    println!("{}", self.red.apply_to(operation.to_string()));
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                println!(
                    "{}",
                    self.red.apply_to(format!("{operation} failed: {error}"))
                );
            }
        }
    }
}
