use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Topic bindings: topic → dataset file, display label, colour
// ---------------------------------------------------------------------------

/// One analysable topic, bound to a dataset file and display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Budget,
    Housing,
    Investments,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Budget, Topic::Housing, Topic::Investments];

    /// Label in the topic selector.
    pub fn label(self) -> &'static str {
        match self {
            Topic::Budget => "Бюджет",
            Topic::Housing => "Жилищный фонд",
            Topic::Investments => "Инвестиции",
        }
    }

    /// Legend label with units.
    pub fn display_label(self) -> &'static str {
        match self {
            Topic::Budget => "Бюджет (рубли)",
            Topic::Housing => "Жилищный фонд (кв.м/чел.)",
            Topic::Investments => "Инвестиции (рубли)",
        }
    }

    /// Matplotlib "tab10" colours: blue, orange, green.
    pub fn color(self) -> Color32 {
        match self {
            Topic::Budget => Color32::from_rgb(0x1f, 0x77, 0xb4),
            Topic::Housing => Color32::from_rgb(0xff, 0x7f, 0x0e),
            Topic::Investments => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Topic::Budget => "budget.csv",
            Topic::Housing => "housing.csv",
            Topic::Investments => "investments.csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bindings_are_distinct() {
        let files: HashSet<_> = Topic::ALL.iter().map(|t| t.file_name()).collect();
        let colors: HashSet<_> = Topic::ALL.iter().map(|t| t.color()).collect();
        assert_eq!(files.len(), Topic::ALL.len());
        assert_eq!(colors.len(), Topic::ALL.len());
        assert!(Topic::ALL
            .iter()
            .all(|t| t.display_label().starts_with(t.label())));
    }
}
