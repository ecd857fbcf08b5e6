//! Field rules evaluated before any write reaches the store.

use crate::i18n::Message;

/// A single check applied to a field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and contain non-whitespace characters.
    InputRequired(Message),
}

#[derive(Clone, Debug)]
pub struct FieldRules {
    pub value: Option<String>,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn required(value: Option<String>, message: Message) -> Self {
        Self { value, rules: vec![Rule::InputRequired(message)] }
    }
}

/// Evaluates field rules in order and reports the first failure.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, fields: &[FieldRules]) -> Result<(), Message>;
}

#[derive(Default, Clone, Copy)]
pub struct RuleValidator;

impl FieldValidator for RuleValidator {
    fn validate(&self, fields: &[FieldRules]) -> Result<(), Message> {
        for field in fields {
            for rule in &field.rules {
                match rule {
                    Rule::InputRequired(msg) => {
                        let present = field.value.as_deref().is_some_and(|v| !v.trim().is_empty());
                        if !present {
                            return Err(msg.clone());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
