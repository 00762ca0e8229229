use campaign_core::{AppViewModel, LogLine, LogSeverity, SessionView};

/// Turns successive view snapshots into terminal lines, emitting only what
/// changed since the previous snapshot.
#[derive(Debug, Default)]
pub struct Renderer {
    printed_log: usize,
    label: Option<String>,
    notice: Option<String>,
    progress: Option<(u8, u64, u64)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.label.as_deref() != Some(view.recipient_label.as_str()) {
            self.label = Some(view.recipient_label.clone());
            if !view.recipient_label.is_empty() {
                lines.push(view.recipient_label.clone());
            }
        }

        if view.notice != self.notice {
            if let Some(notice) = &view.notice {
                lines.push(format!("! {notice}"));
            }
            self.notice = view.notice.clone();
        }

        // The log is newest first and only ever grows.
        let fresh = view.log.len().saturating_sub(self.printed_log);
        lines.extend(view.log[..fresh].iter().rev().map(format_line));
        self.printed_log = view.log.len();

        if matches!(view.session, SessionView::Tracking { .. }) {
            let progress = (view.percent, view.sent, view.failed);
            if self.progress != Some(progress) {
                self.progress = Some(progress);
                lines.push(format!(
                    "Progress: {}% | Sent: {} | Failed: {}",
                    view.percent, view.sent, view.failed
                ));
            }
        }

        lines
    }
}

fn format_line(line: &LogLine) -> String {
    let stamp = line.at.format("%H:%M:%S");
    match line.severity {
        LogSeverity::Info => format!("[{stamp}] {}", line.text),
        LogSeverity::Error => format!("[{stamp}] ERROR {}", line.text),
    }
}
