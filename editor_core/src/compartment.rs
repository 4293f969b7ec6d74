//! Reconfigurable extension slots.
//!
//! A compartment is a named slot holding zero or one active policy. The host
//! swaps the policy with an explicit reconfigure call instead of checking a
//! flag at render time.

/// A named slot holding at most one active policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compartment<T> {
    name: &'static str,
    active: Option<T>,
}

impl<T: PartialEq> Compartment<T> {
    /// Creates a compartment with its initial content.
    pub fn of(name: &'static str, initial: Option<T>) -> Self {
        Self {
            name,
            active: initial,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the active policy, if any.
    pub fn get(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Replaces the slot content. Returns true if it changed.
    pub fn reconfigure(&mut self, next: Option<T>) -> bool {
        if self.active == next {
            return false;
        }
        log::debug!(
            "Reconfigured compartment '{}' ({} -> {})",
            self.name,
            if self.active.is_some() { "active" } else { "empty" },
            if next.is_some() { "active" } else { "empty" }
        );
        self.active = next;
        true
    }
}

/// Style rules the editor can switch on through a compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GutterStyle {
    /// Hides the line-number gutter.
    HideLineNumbers,
}

impl GutterStyle {
    /// The CSS-like selector the rule targets in a rendered host.
    pub fn selector(self) -> &'static str {
        match self {
            GutterStyle::HideLineNumbers => ".cm-gutter.cm-lineNumbers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconfigure() {
        let mut slot = Compartment::of("line-numbers", None);
        assert!(slot.is_empty());

        assert!(slot.reconfigure(Some(GutterStyle::HideLineNumbers)));
        assert_eq!(slot.get(), Some(&GutterStyle::HideLineNumbers));

        // Same content again is not a change.
        assert!(!slot.reconfigure(Some(GutterStyle::HideLineNumbers)));

        assert!(slot.reconfigure(None));
        assert!(slot.is_empty());
        assert_eq!(slot.name(), "line-numbers");
    }

    #[test]
    fn test_selector() {
        assert_eq!(
            GutterStyle::HideLineNumbers.selector(),
            ".cm-gutter.cm-lineNumbers"
        );
    }
}
