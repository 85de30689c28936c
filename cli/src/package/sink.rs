//! Log sink for warnings raised while packaging.
//!
//! The engine only ever needs to emit warnings (one per skipped symlink or
//! unsupported entry). Routing them through a trait lets embedders collect
//! them; the CLI uses `TracingSink`, which forwards to `tracing::warn!`.

/// Receives warning-level messages from a build.
pub trait LogSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Collects warnings in memory so tests can assert on them.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

#[cfg(test)]
impl LogSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
