use crate::severity::Severity;
use std::fmt::Write;
use std::time::SystemTime;

const TITLE: &str = concat!("SolidFire Monitoring Plugin v", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Row label in the interactive table.
    pub label: &'static str,
    /// Key in the single-line plugin output.
    pub key: &'static str,
    pub value: String,
}

/// Everything a run prints, with the aggregate status it exits with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub fields: Vec<Field>,
    pub status: Severity,
}

impl Report {
    pub fn new(status: Severity) -> Self {
        Self {
            fields: Vec::new(),
            status,
        }
    }

    pub fn field(mut self, label: &'static str, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            label,
            key,
            value: value.into(),
        });
        self
    }

    #[cfg(test)]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn render(&self, interactive: bool, width: usize) -> String {
        if interactive {
            self.render_table(width, SystemTime::now())
        } else {
            self.render_summary()
        }
    }

    /// Boxed table for a terminal. Values wider than the value cell (half the
    /// table less the border) are word-wrapped onto continuation rows.
    pub fn render_table(&self, width: usize, executed_at: SystemTime) -> String {
        let border = format!("+{}+\n", "-".repeat(width + 3));
        let mut out = String::new();
        out.push_str(&border);
        let _ = writeln!(out, "| {:<w$}|", TITLE, w = width + 2);
        out.push_str(&border);

        for field in &self.fields {
            push_row(&mut out, field.label, &field.value, width);
        }
        let executed_at = humantime::format_rfc3339_seconds(executed_at).to_string();
        push_row(&mut out, "Execution Time", &executed_at, width);
        push_row(&mut out, "Exit State", self.status.label(), width);

        out.push_str(&border);
        out
    }

    /// Single space-delimited line in the Nagios plugin output convention.
    pub fn render_summary(&self) -> String {
        let mut line = format!("Status: {}", self.status.label());
        for field in &self.fields {
            let _ = write!(line, " {}: {}", field.key, field.value);
        }
        line
    }
}

fn push_row(out: &mut String, label: &str, value: &str, width: usize) {
    let half = width / 2;
    let cell = half - 1;
    if value.chars().count() <= cell {
        let _ = writeln!(out, "| {label:<half$} | {value:<cell$}|");
        return;
    }

    for (i, chunk) in textwrap::wrap(value, cell).iter().enumerate() {
        let label = if i == 0 { label } else { "" };
        let _ = writeln!(out, "| {label:<half$} | {chunk:<cell$}|");
    }
}
