use strum::{Display, EnumIter, IntoEnumIterator};

/// Pages of the recipe wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum WizardStep {
    Basics,
    Image,
    Ingredients,
    Instructions,
}

impl WizardStep {
    pub fn first() -> Self {
        WizardStep::Basics
    }

    pub fn last() -> Self {
        WizardStep::Instructions
    }

    /// Zero-based position in the wizard.
    pub fn index(self) -> usize {
        WizardStep::iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Self> {
        WizardStep::iter().nth(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|index| WizardStep::iter().nth(index))
    }

    pub fn is_last(self) -> bool {
        self == Self::last()
    }
}
