//! Composable rule sets: ordered `(field, condition, predicate, message)` rules.

use super::rules::ValidationErrors;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Rule<T> {
    field: &'static str,
    when: Option<Predicate<T>>,
    check: Predicate<T>,
    message: &'static str,
}

/// An ordered list of field rules evaluated against a `T`.
///
/// Every applicable rule runs; failures are collected, never short-circuited.
///
/// ```
/// use todo_core::validation::RuleSet;
///
/// struct Input { name: String }
///
/// let rules = RuleSet::new()
///     .rule("name", |i: &Input| !i.name.is_empty(), "Name is required")
///     .rule("name", |i: &Input| i.name.len() <= 3, "Name is too long");
///
/// let errors = rules.validate(&Input { name: "abcd".into() }).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unconditional rule. `check` returns `true` when the value is valid.
    pub fn rule<F>(mut self, field: &'static str, check: F, message: &'static str) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            field,
            when: None,
            check: Box::new(check),
            message,
        });
        self
    }

    /// Add a rule that only applies when `when` holds for the target.
    pub fn rule_when<W, F>(
        mut self,
        field: &'static str,
        when: W,
        check: F,
        message: &'static str,
    ) -> Self
    where
        W: Fn(&T) -> bool + Send + Sync + 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            field,
            when: Some(Box::new(when)),
            check: Box::new(check),
            message,
        });
        self
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every applicable rule and collect the violations.
    pub fn collect(&self, target: &T) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            let applies = rule.when.as_ref().map_or(true, |when| when(target));
            if applies && !(rule.check)(target) {
                errors.push(rule.field, rule.message);
            }
        }
        errors
    }

    /// Like [`collect`](Self::collect), as a `Result`.
    pub fn validate(&self, target: &T) -> Result<(), ValidationErrors> {
        self.collect(target).into_result()
    }
}
