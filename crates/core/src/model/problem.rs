use serde::{Deserialize, Serialize};

use crate::model::ids::{LanguageId, TestCaseId};

/// A language the judge accepts for a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    /// Judge-side key such as `python` or `cpp`; this is what gets submitted.
    pub key: String,
    pub starter_code: Option<String>,
}

/// Public example shown in the sample tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTestCase {
    pub id: Option<TestCaseId>,
    pub input: String,
    pub expected_output: String,
}

/// Judge problem attached to a `judge` lesson. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    title: String,
    languages: Vec<Language>,
    samples: Vec<SampleTestCase>,
    starter_code: Option<String>,
}

impl Problem {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        languages: Vec<Language>,
        samples: Vec<SampleTestCase>,
    ) -> Self {
        Self {
            title: title.into(),
            languages,
            samples,
            starter_code: None,
        }
    }

    /// Problem-wide starter code, used when a language has none of its own.
    #[must_use]
    pub fn with_starter_code(mut self, starter_code: Option<String>) -> Self {
        self.starter_code = starter_code.filter(|code| !code.is_empty());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    #[must_use]
    pub fn samples(&self) -> &[SampleTestCase] {
        &self.samples
    }

    /// First allowed language, if any.
    #[must_use]
    pub fn default_language(&self) -> Option<&Language> {
        self.languages.first()
    }

    #[must_use]
    pub fn language(&self, id: &LanguageId) -> Option<&Language> {
        self.languages.iter().find(|lang| &lang.id == id)
    }

    #[must_use]
    pub fn language_by_key(&self, key: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|lang| lang.key.eq_ignore_ascii_case(key))
    }

    /// Code placed in the editor when the lesson opens.
    #[must_use]
    pub fn initial_code(&self) -> String {
        self.default_language()
            .and_then(|lang| lang.starter_code.as_deref())
            .filter(|code| !code.is_empty())
            .or(self.starter_code.as_deref())
            .unwrap_or_default()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(id: &str, key: &str, starter: Option<&str>) -> Language {
        Language {
            id: LanguageId::new(id),
            key: key.into(),
            starter_code: starter.map(str::to_owned),
        }
    }

    #[test]
    fn first_language_is_default() {
        let problem = Problem::new(
            "Sum",
            vec![lang("1", "python", None), lang("2", "cpp", None)],
            vec![],
        );
        assert_eq!(problem.default_language().unwrap().key, "python");
        assert_eq!(problem.language_by_key("CPP").unwrap().id, LanguageId::new("2"));
    }

    #[test]
    fn initial_code_prefers_language_then_problem_starter() {
        let with_lang = Problem::new("P", vec![lang("1", "python", Some("print()"))], vec![])
            .with_starter_code(Some("# generic".into()));
        assert_eq!(with_lang.initial_code(), "print()");

        let fallback = Problem::new("P", vec![lang("1", "python", None)], vec![])
            .with_starter_code(Some("# generic".into()));
        assert_eq!(fallback.initial_code(), "# generic");

        let empty = Problem::new("P", vec![], vec![]);
        assert_eq!(empty.initial_code(), "");
    }
}
