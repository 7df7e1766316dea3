use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Next difficulty given whether the previous answer passed.
    ///
    /// A pass moves one step up (Easy to Medium, Medium to Hard, Hard stays).
    /// A fail drops Medium to Easy and pulls anything else back to Medium.
    pub fn adjust(self, passed: bool) -> Difficulty {
        if passed {
            match self {
                Difficulty::Easy => Difficulty::Medium,
                Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
            }
        } else {
            match self {
                Difficulty::Medium => Difficulty::Easy,
                Difficulty::Easy | Difficulty::Hard => Difficulty::Medium,
            }
        }
    }

    /// Qualifier appended to the generation hint.
    pub fn qualifier(&self) -> &'static str {
        match self {
            Difficulty::Easy => "(Focus on basic concepts)",
            Difficulty::Medium => "(Include moderate complexity)",
            Difficulty::Hard => "(Include edge cases and advanced scenarios)",
        }
    }

    /// Seconds allowed per question.
    pub fn time_budget_secs(&self) -> f64 {
        match self {
            Difficulty::Easy => 90.0,
            Difficulty::Medium => 60.0,
            Difficulty::Hard => 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_is_total_and_deterministic() {
        for difficulty in Difficulty::ALL {
            for passed in [true, false] {
                let first = difficulty.adjust(passed);
                assert!(Difficulty::ALL.contains(&first));
                assert_eq!(first, difficulty.adjust(passed));
            }
        }
    }

    #[test]
    fn pass_escalates_one_step() {
        assert_eq!(Difficulty::Easy.adjust(true), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.adjust(true), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.adjust(true), Difficulty::Hard);
    }

    #[test]
    fn fail_drops_medium_and_recentres_the_rest() {
        assert_eq!(Difficulty::Medium.adjust(false), Difficulty::Easy);
        assert_eq!(Difficulty::Hard.adjust(false), Difficulty::Medium);
        assert_eq!(Difficulty::Easy.adjust(false), Difficulty::Medium);
    }

    #[test]
    fn harder_levels_get_less_time() {
        assert!(Difficulty::Easy.time_budget_secs() > Difficulty::Medium.time_budget_secs());
        assert!(Difficulty::Medium.time_budget_secs() > Difficulty::Hard.time_budget_secs());
    }
}
