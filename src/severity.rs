/// Nagios plugin status. The discriminant is the process exit code and the
/// derived ordering follows it, so `max` picks the worse status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
    /// Reserved by the plugin API; no probe produces it.
    #[allow(dead_code)]
    Dependent = 4,
}

impl Severity {
    pub const fn exit_code(self) -> i32 {
        self as i32
    }

    pub const fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "*Warning",
            Severity::Critical => "*Critical",
            Severity::Unknown => "*Unknown",
            Severity::Dependent => "*Dependent",
        }
    }

    /// Worst severity of a run. An empty run is OK.
    pub fn worst<I>(severities: I) -> Severity
    where
        I: IntoIterator<Item = Severity>,
    {
        severities.into_iter().max().unwrap_or_default()
    }
}

/// Strict greater-than threshold check, critical first.
pub fn evaluate(value: f64, warning: f64, critical: f64) -> Severity {
    if value > critical {
        Severity::Critical
    } else if value > warning {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// One evaluated health value as it will be shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub value: String,
    pub severity: Severity,
}

impl Signal {
    pub fn new(value: impl Into<String>, severity: Severity) -> Self {
        Self {
            value: value.into(),
            severity,
        }
    }

    pub fn ok(value: impl Into<String>) -> Self {
        Self::new(value, Severity::Ok)
    }

    /// Value with the `*` marker appended when the signal is not OK.
    pub fn display(&self) -> String {
        if self.severity == Severity::Ok {
            self.value.clone()
        } else {
            format!("{}*", self.value)
        }
    }
}
