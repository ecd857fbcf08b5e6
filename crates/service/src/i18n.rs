//! Message catalog port and the built-in English templates.

use std::{borrow::Cow, collections::HashMap, path::Path};

/// Keys of every user-facing message the admin module emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    SomethingWentWrong,
    NothingToDoWithOptions,
    RecordsFound,
    NoRecordsFound,
    FieldIsRequired,
    FieldAlreadyExist,
    RequiredParamMissing,
    DataAdded,
    DataAddedError,
    DataUpdated,
    DataUpdatedError,
    DataActivated,
    DataActivatedError,
    DataInactivated,
    DataInactivatedError,
    DataDeleted,
    DataDeletedError,
}

impl MessageKey {
    /// Catalog identifier, as used in locale files.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::SomethingWentWrong => "msgSomethingWentWrong",
            MessageKey::NothingToDoWithOptions => "msgNothingToDoWithOptions",
            MessageKey::RecordsFound => "msgRecordsFound",
            MessageKey::NoRecordsFound => "msgNoRecordsFound",
            MessageKey::FieldIsRequired => "msgFieldIsRequired",
            MessageKey::FieldAlreadyExist => "msgFieldAlreadyExist",
            MessageKey::RequiredParamMissing => "msgRequiredParamMissing",
            MessageKey::DataAdded => "msgDataAdded",
            MessageKey::DataAddedError => "msgDataAddedError",
            MessageKey::DataUpdated => "msgDataUpdated",
            MessageKey::DataUpdatedError => "msgDataUpdatedError",
            MessageKey::DataActivated => "msgDataActivated",
            MessageKey::DataActivatedError => "msgDataActivatedError",
            MessageKey::DataInactivated => "msgDataInactivated",
            MessageKey::DataInactivatedError => "msgDataInactivatedError",
            MessageKey::DataDeleted => "msgDataDeleted",
            MessageKey::DataDeletedError => "msgDataDeletedError",
        }
    }

    fn english(self) -> &'static str {
        match self {
            MessageKey::SomethingWentWrong => "Something went wrong. Please try again later.",
            MessageKey::NothingToDoWithOptions => "Nothing to do here with options.",
            MessageKey::RecordsFound => "{} record(s) found.",
            MessageKey::NoRecordsFound => "No {} found.",
            MessageKey::FieldIsRequired => "{} is required.",
            MessageKey::FieldAlreadyExist => "{} already exists.",
            MessageKey::RequiredParamMissing => "Required parameter(s) missing.",
            MessageKey::DataAdded => "{} added successfully.",
            MessageKey::DataAddedError => "Unable to add the record. Please try again.",
            MessageKey::DataUpdated => "{} updated successfully.",
            MessageKey::DataUpdatedError => "Unable to update the record. Please try again.",
            MessageKey::DataActivated => "{} activated successfully.",
            MessageKey::DataActivatedError => "Unable to activate the record. Please try again.",
            MessageKey::DataInactivated => "{} inactivated successfully.",
            MessageKey::DataInactivatedError => "Unable to inactivate the record. Please try again.",
            MessageKey::DataDeleted => "{} deleted successfully.",
            MessageKey::DataDeletedError => "Unable to delete the record(s). Please try again.",
        }
    }
}

/// A message key plus its substitution arguments, rendered late.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub key: MessageKey,
    pub args: Vec<String>,
}

impl Message {
    pub fn new(key: MessageKey) -> Self { Self { key, args: Vec::new() } }

    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }
}

impl From<MessageKey> for Message {
    fn from(key: MessageKey) -> Self { Message::new(key) }
}

/// Looks up templates by key; `{}` placeholders are filled in order.
pub trait MessageCatalog: Send + Sync {
    fn template(&self, key: MessageKey) -> Cow<'_, str>;

    fn render(&self, msg: &Message) -> String {
        fill(&self.template(msg.key), &msg.args)
    }
}

fn fill(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        if let Some(a) = args.next() {
            out.push_str(a);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// Built-in English templates, optionally overridden per key.
#[derive(Default)]
pub struct EnglishCatalog {
    overrides: HashMap<String, String>,
}

impl EnglishCatalog {
    pub fn new() -> Self { Self::default() }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self { Self { overrides } }

    /// Load overrides from a flat JSON object keyed by catalog identifier.
    pub fn from_locale_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read(path.as_ref())?;
        let overrides: HashMap<String, String> = serde_json::from_slice(&raw)?;
        Ok(Self { overrides })
    }
}

impl MessageCatalog for EnglishCatalog {
    fn template(&self, key: MessageKey) -> Cow<'_, str> {
        match self.overrides.get(key.as_str()) {
            Some(t) => Cow::Borrowed(t.as_str()),
            None => Cow::Borrowed(key.english()),
        }
    }
}
