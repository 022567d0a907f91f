//! Buffered per-frame diagnostics
//!
//! Participants log through a namespaced [`DiagnosticsLogger`]. Live lines
//! last for one frame; keyed values persist until overwritten. The scheduler
//! flushes both once per tick, after every participant has run, rendering
//!
//! ```text
//! surface: scale = 1.00
//! app: frame = 12.00
//! ---
//! input: pointer = (0.25, -1.50)
//! ```
//!
//! The rendered text goes to `tracing` at trace level and, if attached, to a
//! [`DebugPanel`].

use indexmap::IndexMap;
use serde::Serialize;
use stagehand_core::{FrameInfo, Point};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A value that can be shown in the diagnostics output
#[derive(Debug, Clone, PartialEq)]
pub enum DebugValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Point(Point),
    Json(serde_json::Value),
}

impl DebugValue {
    /// Wrap any serializable value
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => DebugValue::Json(value),
            Err(err) => DebugValue::Text(format!("<unserializable: {err}>")),
        }
    }
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugValue::Number(n) => write!(f, "{n:.2}"),
            DebugValue::Bool(b) => write!(f, "{b}"),
            DebugValue::Text(s) => f.write_str(s),
            DebugValue::Point(p) => write!(f, "{p}"),
            DebugValue::Json(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DebugValue {
                fn from(n: $ty) -> Self {
                    DebugValue::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i32, i64, u32, u64, usize);

impl From<bool> for DebugValue {
    fn from(b: bool) -> Self {
        DebugValue::Bool(b)
    }
}

impl From<&str> for DebugValue {
    fn from(s: &str) -> Self {
        DebugValue::Text(s.to_string())
    }
}

impl From<String> for DebugValue {
    fn from(s: String) -> Self {
        DebugValue::Text(s)
    }
}

impl From<Point> for DebugValue {
    fn from(p: Point) -> Self {
        DebugValue::Point(p)
    }
}

impl From<serde_json::Value> for DebugValue {
    fn from(v: serde_json::Value) -> Self {
        DebugValue::Json(v)
    }
}

/// Where flushed diagnostics text is displayed
pub trait DebugPanel {
    fn present(&mut self, text: &str);
}

impl<F: FnMut(&str)> DebugPanel for F {
    fn present(&mut self, text: &str) {
        self(text)
    }
}

#[derive(Default)]
struct DiagnosticsState {
    enabled: bool,
    lines: Vec<String>,
    values: IndexMap<String, String>,
    panel: Option<Box<dyn DebugPanel>>,
}

/// Shared diagnostics buffer
#[derive(Clone, Default)]
pub struct Diagnostics {
    state: Rc<RefCell<DiagnosticsState>>,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(DiagnosticsState {
                enabled,
                ..Default::default()
            })),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }

    /// Logger that prefixes every entry with `name`
    pub fn namespace(&self, name: impl Into<String>) -> DiagnosticsLogger {
        DiagnosticsLogger {
            namespace: name.into(),
            diagnostics: self.clone(),
        }
    }

    /// Send flushed output to `panel`, replacing any previous one
    pub fn attach_panel(&self, panel: impl DebugPanel + 'static) {
        self.state.borrow_mut().panel = Some(Box::new(panel));
    }

    pub fn detach_panel(&self) {
        self.state.borrow_mut().panel = None;
    }

    /// Live lines buffered for the current frame
    pub fn live_lines(&self) -> Vec<String> {
        self.state.borrow().lines.clone()
    }

    /// Rendered persistent value for `key` (e.g. `"surface: scale"`)
    pub fn value(&self, key: &str) -> Option<String> {
        self.state.borrow().values.get(key).cloned()
    }

    /// Render the current buffer without clearing it
    pub fn render(&self) -> String {
        let state = self.state.borrow();
        let values: Vec<String> = state
            .values
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect();
        format!("{}\n---\n{}", values.join("\n"), state.lines.join("\n"))
    }

    /// Emit this frame's output and clear the live lines
    pub fn flush(&self, frame: &FrameInfo) {
        if !self.is_enabled() {
            return;
        }
        let text = self.render();
        tracing::trace!(target: "stagehand::diagnostics", frame = frame.frame, "\n{text}");

        // The panel is taken out so it may log without re-borrowing the state
        let panel = {
            let mut state = self.state.borrow_mut();
            state.lines.clear();
            state.panel.take()
        };
        if let Some(mut panel) = panel {
            panel.present(&text);
            let mut state = self.state.borrow_mut();
            if state.panel.is_none() {
                state.panel = Some(panel);
            }
        }
    }

    fn push_line(&self, line: String) {
        let mut state = self.state.borrow_mut();
        if state.enabled {
            state.lines.push(line);
        }
    }

    fn put_value(&self, key: String, value: String) {
        self.state.borrow_mut().values.insert(key, value);
    }

    /// Drop this frame's live lines without emitting them
    pub(crate) fn discard_live(&self) {
        self.state.borrow_mut().lines.clear();
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Diagnostics")
            .field("enabled", &state.enabled)
            .field("lines", &state.lines.len())
            .field("values", &state.values.len())
            .field("panel", &state.panel.is_some())
            .finish()
    }
}

/// Namespaced writer into [`Diagnostics`]
#[derive(Clone, Debug)]
pub struct DiagnosticsLogger {
    namespace: String,
    diagnostics: Diagnostics,
}

impl DiagnosticsLogger {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_enabled(&self) -> bool {
        self.diagnostics.is_enabled()
    }

    /// Log immediately, regardless of the enabled flag
    pub fn log(&self, key: &str, value: impl Into<DebugValue>) {
        let value = value.into();
        tracing::info!(target: "stagehand::diagnostics", "{}: {key} = {value}", self.namespace);
    }

    /// Add a line to this frame's output
    pub fn log_live(&self, key: &str, value: impl Into<DebugValue>) {
        if !self.is_enabled() {
            return;
        }
        let value = value.into();
        self.diagnostics
            .push_line(format!("{}: {key} = {value}", self.namespace));
    }

    /// Set a value that stays in the output until overwritten
    ///
    /// Values are kept while diagnostics are disabled, so enabling them later
    /// shows the latest value of every key.
    pub fn log_value(&self, key: &str, value: impl Into<DebugValue>) {
        let value = value.into();
        self.diagnostics
            .put_value(format!("{}: {key}", self.namespace), value.to_string());
    }
}
