//! Multi-message error collector.

/// Separator used by [`ErrorCollector::message`].
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Accumulates validation messages without short-circuiting.
///
/// Messages keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCollector {
    messages: Vec<String>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns all messages joined with [`MESSAGE_SEPARATOR`].
    ///
    /// Empty string when nothing was collected.
    pub fn message(&self) -> String {
        self.messages.join(MESSAGE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCollector;

    #[test]
    fn empty_collector_has_no_errors() {
        let collector = ErrorCollector::new();
        assert!(!collector.has_errors());
        assert_eq!(collector.message(), "");
    }

    #[test]
    fn message_joins_in_insertion_order() {
        let mut collector = ErrorCollector::new();
        collector.add("first");
        collector.add(String::from("second"));

        assert!(collector.has_errors());
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.message(), "first; second");
    }
}
