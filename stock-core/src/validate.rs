use std::fmt;

use crate::error::ValidationError;
use crate::types::Stock;

/// Нарушенное правило кандидата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    EmptyName,
    DuplicateName,
    EmptyDescription,
    NegativePrice,
    /// NaN/inf в файл не записать
    NonFinitePrice,
    MinutesWithoutProcedure,
    ProcedureWithoutMinutes,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Violation::EmptyName => "Please enter the stock's Name",
            Violation::DuplicateName => "The Name entered is already on file",
            Violation::EmptyDescription => "Please enter a Description of the stock",
            Violation::NegativePrice => "Price cannot be less than zero",
            Violation::NonFinitePrice => "Price must be a finite number",
            Violation::MinutesWithoutProcedure => {
                "Minutes must be zero if the stock is not a procedure"
            }
            Violation::ProcedureWithoutMinutes => {
                "Minutes must be greater than zero if the stock is a procedure"
            }
        };
        f.write_str(msg)
    }
}

/// Проверяет кандидата перед `add`/`update`.
///
/// `existing`: записи, найденные поиском по имени кандидата; дубликатом
/// считается запись с другим id и тем же именем без учёта регистра.
/// Нарушения собираются все, без остановки на первом.
pub fn validate(candidate: &Stock, existing: &[Stock]) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    let name = candidate.name.trim();
    if name.is_empty() {
        violations.push(Violation::EmptyName);
    } else if is_duplicate_name(candidate, existing) {
        violations.push(Violation::DuplicateName);
    }

    if candidate.description.trim().is_empty() {
        violations.push(Violation::EmptyDescription);
    }

    if !candidate.price.is_finite() {
        violations.push(Violation::NonFinitePrice);
    } else if candidate.price < 0.0 {
        violations.push(Violation::NegativePrice);
    }

    match (candidate.is_procedure, candidate.minutes) {
        (false, m) if m != 0 => violations.push(Violation::MinutesWithoutProcedure),
        (true, m) if m <= 0 => violations.push(Violation::ProcedureWithoutMinutes),
        _ => {}
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn is_duplicate_name(candidate: &Stock, existing: &[Stock]) -> bool {
    let name = candidate.name.to_lowercase();
    existing
        .iter()
        .any(|s| s.id != candidate.id && s.name.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consult() -> Stock {
        Stock::new("Consult", "30 min visit", 50.0, 30, true)
    }

    fn violations(candidate: &Stock, existing: &[Stock]) -> Vec<Violation> {
        validate(candidate, existing).unwrap_err().violations
    }

    #[test]
    fn valid_candidates_pass() {
        assert!(validate(&consult(), &[]).is_ok());
        assert!(validate(&Stock::new("Bandage", "supply", 0.0, 0, false), &[]).is_ok());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let bad = Stock::new("   ", "\n", -1.0, 0, false);
        assert_eq!(
            violations(&bad, &[]),
            vec![
                Violation::EmptyName,
                Violation::EmptyDescription,
                Violation::NegativePrice
            ]
        );
    }

    #[test]
    fn duplicate_name_is_case_insensitive_and_ignores_own_id() {
        let stored = consult().with_id(1);

        let other = Stock::new("CONSULT", "again", 1.0, 5, true);
        assert_eq!(
            violations(&other, std::slice::from_ref(&stored)),
            vec![Violation::DuplicateName]
        );

        // та же запись при update
        let same = consult().with_id(1);
        assert!(validate(&same, &[stored]).is_ok());
    }

    #[test]
    fn similar_but_different_name_is_not_duplicate() {
        let stored = Stock::new("Consult extended", "x", 1.0, 5, true).with_id(1);
        assert!(validate(&consult(), &[stored]).is_ok());
    }

    #[test]
    fn empty_name_is_not_also_reported_as_duplicate() {
        let stored = Stock::new("", "legacy", 1.0, 0, false).with_id(1);
        let bad = Stock::new("", "x", 1.0, 0, false);
        assert_eq!(violations(&bad, &[stored]), vec![Violation::EmptyName]);
    }

    #[test]
    fn minutes_must_match_procedure_flag() {
        let supply = Stock::new("Bandage", "supply", 5.0, 10, false);
        assert_eq!(
            violations(&supply, &[]),
            vec![Violation::MinutesWithoutProcedure]
        );

        let procedure = Stock::new("Consult", "visit", 50.0, 0, true);
        assert_eq!(
            violations(&procedure, &[]),
            vec![Violation::ProcedureWithoutMinutes]
        );

        let negative = Stock::new("Consult", "visit", 50.0, -5, true);
        assert_eq!(
            violations(&negative, &[]),
            vec![Violation::ProcedureWithoutMinutes]
        );
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let bad = Stock::new("Consult", "visit", f64::NAN, 30, true);
        assert_eq!(violations(&bad, &[]), vec![Violation::NonFinitePrice]);
    }
}
