pub const DEFAULT_MAX_RECIPIENTS: usize = 5_000;
pub const DEFAULT_WARN_THRESHOLD: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_recipients: usize,
    pub warn_threshold: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_recipients: DEFAULT_MAX_RECIPIENTS,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitVerdict {
    NoRecipients,
    ExceedsMax { count: usize, max: usize },
    NeedsConfirmation { count: usize },
    Clear { count: usize },
}

impl SubmitVerdict {
    pub fn allowed(self) -> bool {
        matches!(
            self,
            SubmitVerdict::NeedsConfirmation { .. } | SubmitVerdict::Clear { .. }
        )
    }

    pub fn requires_confirmation(self) -> bool {
        matches!(self, SubmitVerdict::NeedsConfirmation { .. })
    }
}

pub fn can_submit(count: usize, limits: &Limits) -> SubmitVerdict {
    if count == 0 {
        SubmitVerdict::NoRecipients
    } else if count > limits.max_recipients {
        SubmitVerdict::ExceedsMax {
            count,
            max: limits.max_recipients,
        }
    } else if count > limits.warn_threshold {
        SubmitVerdict::NeedsConfirmation { count }
    } else {
        SubmitVerdict::Clear { count }
    }
}
