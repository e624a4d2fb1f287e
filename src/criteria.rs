//! Fixed competency criteria and their categories
//!
//! The rating sheet is a closed list of ten criteria: four for work
//! efficiency, four for productivity and supervision, two personal
//! attributes. Category is a total function of the criterion; free-form
//! names are rejected rather than defaulted.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{AppraiseError, Result};
use crate::types::RatingCategory;

/// One of the ten fixed competency criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Criterion {
    WorksWithoutSupervision,
    KnowsRolesAndResponsibilities,
    WorkAccuracy,
    Resourcefulness,
    FollowsInstructions,
    TakesResponsibility,
    SustainsProductiveWork,
    MeetsTimeEstimates,
    InitiativeAndAmbition,
    MannerAndAppearance,
}

static BY_NAME: Lazy<HashMap<&'static str, Criterion>> =
    Lazy::new(|| Criterion::ALL.iter().map(|c| (c.name(), *c)).collect());

impl Criterion {
    /// Sheet order: grouped by category, then as presented to reviewers
    pub const ALL: [Criterion; 10] = [
        Criterion::WorksWithoutSupervision,
        Criterion::KnowsRolesAndResponsibilities,
        Criterion::WorkAccuracy,
        Criterion::Resourcefulness,
        Criterion::FollowsInstructions,
        Criterion::TakesResponsibility,
        Criterion::SustainsProductiveWork,
        Criterion::MeetsTimeEstimates,
        Criterion::InitiativeAndAmbition,
        Criterion::MannerAndAppearance,
    ];

    /// Name as stored in `criterion_name`
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::WorksWithoutSupervision => "Ability to work without supervision",
            Criterion::KnowsRolesAndResponsibilities => "Knowledge of roles and responsibilities",
            Criterion::WorkAccuracy => "Work accuracy and correctness",
            Criterion::Resourcefulness => "Resourcefulness and creativity",
            Criterion::FollowsInstructions => "Completes tasks according to instructions",
            Criterion::TakesResponsibility => "Takes responsibility for work",
            Criterion::SustainsProductiveWork => "Sustains productive work",
            Criterion::MeetsTimeEstimates => "Meets reasonable time estimates",
            Criterion::InitiativeAndAmbition => "Initiative and ambition",
            Criterion::MannerAndAppearance => "Manner and appearance",
        }
    }

    pub fn category(&self) -> RatingCategory {
        match self {
            Criterion::WorksWithoutSupervision
            | Criterion::KnowsRolesAndResponsibilities
            | Criterion::WorkAccuracy
            | Criterion::Resourcefulness => RatingCategory::WorkEfficiency,
            Criterion::FollowsInstructions
            | Criterion::TakesResponsibility
            | Criterion::SustainsProductiveWork
            | Criterion::MeetsTimeEstimates => RatingCategory::Productivity,
            Criterion::InitiativeAndAmbition | Criterion::MannerAndAppearance => {
                RatingCategory::Personal
            }
        }
    }

    /// Exact-name lookup
    pub fn from_name(name: &str) -> Option<Criterion> {
        BY_NAME.get(name).copied()
    }

    /// Lookup that also accepts a 1-based sheet position or a
    /// case-insensitive name, for command-line input.
    pub fn parse(input: &str) -> Result<Criterion> {
        let trimmed = input.trim();
        if let Some(criterion) = Criterion::from_name(trimmed) {
            return Ok(criterion);
        }
        if let Ok(index) = trimmed.parse::<usize>() {
            if let Some(criterion) = index.checked_sub(1).and_then(|i| Criterion::ALL.get(i)) {
                return Ok(*criterion);
            }
        }
        Criterion::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| AppraiseError::UnknownCriterion(input.to_string()))
    }

    /// Criteria of one category, in sheet order
    pub fn in_category(category: RatingCategory) -> impl Iterator<Item = Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(move |c| c.category() == category)
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a stored criterion name.
///
/// Names outside the fixed list are an error.
pub fn resolve_category(name: &str) -> Result<RatingCategory> {
    Criterion::from_name(name)
        .map(|c| c.category())
        .ok_or_else(|| AppraiseError::UnknownCriterion(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_category_sizes() {
        assert_eq!(Criterion::in_category(RatingCategory::WorkEfficiency).count(), 4);
        assert_eq!(Criterion::in_category(RatingCategory::Productivity).count(), 4);
        assert_eq!(Criterion::in_category(RatingCategory::Personal).count(), 2);
    }

    #[test]
    fn test_every_fixed_name_resolves() {
        for criterion in Criterion::ALL {
            assert_eq!(resolve_category(criterion.name()).unwrap(), criterion.category());
            assert_eq!(Criterion::from_name(criterion.name()), Some(criterion));
        }
        assert_eq!(
            resolve_category("Sustains productive work").unwrap(),
            RatingCategory::Productivity
        );
        assert_eq!(
            resolve_category("Manner and appearance").unwrap(),
            RatingCategory::Personal
        );
    }

    #[test]
    fn test_unknown_criterion_is_rejected_not_defaulted() {
        let err = resolve_category("Punctuality").unwrap_err();
        assert!(matches!(err, AppraiseError::UnknownCriterion(ref n) if n == "Punctuality"));

        // Near misses are not silently mapped to a category either
        assert!(resolve_category("sustains productive work").is_err());
        assert!(resolve_category("").is_err());
    }

    #[test]
    fn test_parse_accepts_position_and_case() {
        assert_eq!(Criterion::parse("1").unwrap(), Criterion::WorksWithoutSupervision);
        assert_eq!(Criterion::parse("10").unwrap(), Criterion::MannerAndAppearance);
        assert_eq!(
            Criterion::parse("initiative AND ambition").unwrap(),
            Criterion::InitiativeAndAmbition
        );
        assert!(Criterion::parse("0").is_err());
        assert!(Criterion::parse("11").is_err());
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(index in 0usize..10) {
            let name = Criterion::ALL[index].name();
            let first = resolve_category(name).unwrap();
            let second = resolve_category(name).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_unlisted_names_never_resolve(name in "[a-z ]{0,40}") {
            prop_assume!(Criterion::from_name(&name).is_none());
            prop_assert!(resolve_category(&name).is_err());
        }
    }
}
