/// What a delegated click handler did with a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub handled: bool,
    /// The host should cancel the browser's default action.
    pub prevent_default: bool,
}

impl ClickOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }

    pub fn prevented() -> Self {
        Self {
            handled: true,
            prevent_default: true,
        }
    }

    /// Combine the outcomes of two handlers that saw the same click.
    pub fn merge(self, other: Self) -> Self {
        Self {
            handled: self.handled || other.handled,
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_prevent_default() {
        let merged = ClickOutcome::handled().merge(ClickOutcome::prevented());
        assert_eq!(merged, ClickOutcome::prevented());
        assert_eq!(
            ClickOutcome::ignored().merge(ClickOutcome::ignored()),
            ClickOutcome::ignored()
        );
    }
}
