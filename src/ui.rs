//! Terminal output for the CLI.
//!
//! Results go to stdout uncolored so they can be captured by scripts;
//! status and warnings go to stderr.

use console::style;

use crate::version::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Display the change from the current to the new version.
pub fn display_version_change(current: &str, new: &str) {
    eprintln!(
        "{} {} {} {}",
        style("Bumping").bold(),
        style(current).red(),
        style("→").dim(),
        style(new).green()
    );
}

/// Render `key=value` lines describing a bump.
///
/// `new_version` is omitted when no part was bumped.
pub fn format_listing(current: &str, new: Option<&str>, order: &[&str]) -> String {
    let mut lines = vec![format!("current_version={}", current)];
    if let Some(new) = new {
        lines.push(format!("new_version={}", new));
    }
    lines.push(format!("order={}", order.join(",")));
    lines.join("\n")
}

/// Render the parsed parts of a version as `name=value` lines, in `order`
/// first and then any remaining parts.
pub fn format_parts(version: &Version, order: &[&str]) -> String {
    let mut lines = Vec::new();
    for name in order {
        if let Some(part) = version.get(name) {
            let line = format!("{}={}", name, part);
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    for (name, part) in version.parts() {
        if !order.contains(&name) {
            lines.push(format!("{}={}", name, part));
        }
    }
    lines.join("\n")
}
