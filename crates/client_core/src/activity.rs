use chrono::{DateTime, Local};
use shared::{domain::ActivityKind, protocol::ActivityLogEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub message: String,
    pub icon: String,
    /// Local time the entry was appended on this side, not backend event time.
    pub timestamp: DateTime<Local>,
}

impl ActivityEvent {
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Append-only, insertion-ordered record of pipeline progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    events: Vec<ActivityEvent>,
}

impl ActivityLog {
    pub fn append(
        &mut self,
        kind: ActivityKind,
        message: impl Into<String>,
        icon: impl Into<String>,
    ) {
        self.events.push(ActivityEvent {
            kind,
            message: message.into(),
            icon: icon.into(),
            timestamp: Local::now(),
        });
    }

    pub fn append_entry(&mut self, entry: ActivityLogEntry) {
        self.append(entry.kind, entry.message, entry.icon);
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&ActivityEvent> {
        self.events.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_keep_insertion_order_and_stamp_time() {
        let before = Local::now();
        let mut log = ActivityLog::default();
        log.append(ActivityKind::System, "first", "🚀");
        log.append_entry(ActivityLogEntry {
            kind: ActivityKind::Coder,
            message: "second".to_string(),
            icon: "💻".to_string(),
        });

        let messages: Vec<_> = log.events().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert!(log.events().iter().all(|e| e.timestamp >= before));
        assert_eq!(log.last().map(|e| e.kind.clone()), Some(ActivityKind::Coder));
        assert_eq!(log.events()[0].display_time().len(), 8);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = ActivityLog::default();
        log.append(ActivityKind::Error, "boom", "❌");
        log.clear();
        assert!(log.is_empty());
    }
}
