//! Plain-text rendering of templates.
//!
//! The head unit renders templates natively; this renderer exists for the
//! demo binary and for logs. Selectable rows are numbered so a scripted
//! driver can refer to them, and buttons are listed in brackets.
//!
//! ```text
//! < Nearby stations
//!   1) Eni
//!      Self: 1,70 € - Attended: 1,90 € Via Roma
//! ```

use super::template::{ActionButton, HeaderAction, Row, Template};
use std::fmt::Write;

/// Renders `template` as indented plain text.
#[must_use]
pub fn render(template: &Template) -> String {
    let mut out = String::new();
    let header = match header_of(template) {
        HeaderAction::AppIcon => '*',
        HeaderAction::Back => '<',
    };
    let _ = writeln!(out, "{header} {}", template.title());

    if let Some(message) = template.message_text() {
        for line in message.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    render_rows(&mut out, template.rows());
    render_actions(&mut out, template.actions());
    out
}

fn header_of(template: &Template) -> HeaderAction {
    match template {
        Template::List(t) => t.header,
        Template::Message(t) => t.header,
        Template::Pane(t) => t.header,
    }
}

fn render_rows(out: &mut String, rows: &[Row]) {
    for (index, row) in rows.iter().enumerate() {
        if row.selectable {
            let _ = writeln!(out, "  {}) {}", index + 1, row.title);
        } else {
            let _ = writeln!(out, "  - {}", row.title);
        }
        for text in &row.texts {
            let _ = writeln!(out, "     {text}");
        }
    }
}

fn render_actions(out: &mut String, actions: &[ActionButton]) {
    if actions.is_empty() {
        return;
    }
    let buttons: Vec<String> = actions.iter().map(|a| format!("[{}]", a.title)).collect();
    let _ = writeln!(out, "  {}", buttons.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenEvent;

    #[test]
    fn numbers_only_selectable_rows() {
        let template = Template::list(
            "Average prices - Italy",
            vec![Row::new("Diesel").text("1,66 € per liter"), Row::new("Eni").selectable()],
        );
        let text = render(&template);
        assert!(text.starts_with("< Average prices - Italy\n"));
        assert!(text.contains("  - Diesel\n     1,66 € per liter\n"));
        assert!(text.contains("  2) Eni\n"));
    }

    #[test]
    fn message_lists_its_buttons() {
        let template = Template::message("Error", "An error occurred: boom")
            .with_action(ActionButton::new("Retry", ScreenEvent::Retry));
        assert_eq!(
            render(&template),
            "< Error\n  An error occurred: boom\n  [Retry]\n"
        );
    }
}
