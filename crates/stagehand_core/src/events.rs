//! Host input event payloads
//!
//! Only the data the input latch keeps between host callbacks and the next
//! tick. Dispatch and routing live with the host.

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000; // Cmd on macOS, Win on Windows

    /// Create new modifiers from flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }

    /// Check if any modifier is pressed
    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// A key press latched for the current frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Physical key identifier as reported by the host (e.g. `"KeyA"`, `"Space"`)
    pub code: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(code: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            code: code.into(),
            modifiers,
        }
    }

    /// A plain key press has no modifiers held; hosts usually suppress their
    /// default handling for these.
    pub fn is_plain(&self) -> bool {
        !self.modifiers.any()
    }
}
