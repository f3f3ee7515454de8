//! Template matching: priority-ordered linear scan over the compiled catalog.

use regex::{Captures, Regex};
use tracing::{info, warn};

use crate::models::template::{Template, TemplateCatalog};

/// A template paired with its compiled regex.
#[derive(Debug)]
pub struct CompiledTemplate {
    pub template: Template,
    pub regex: Regex,
}

/// Matches document numbers against the enabled templates, first match wins.
///
/// Matching is O(templates) per string by design: the catalog is small and
/// declaration order carries priority, so a linear scan is the contract,
/// not an implementation detail.
#[derive(Debug)]
pub struct PatternMatcher {
    templates: Vec<CompiledTemplate>,
}

impl PatternMatcher {
    /// Compile the enabled templates of `catalog`.
    ///
    /// A template with an invalid pattern is skipped with a warning and
    /// excluded from matching for the rest of the run.
    pub fn from_catalog(catalog: &TemplateCatalog) -> Self {
        let mut templates = Vec::new();

        for template in catalog.enabled_templates() {
            match Regex::new(&template.pattern) {
                Ok(regex) => templates.push(CompiledTemplate {
                    template: template.clone(),
                    regex,
                }),
                Err(e) => {
                    warn!(
                        "invalid regex in template '{}', skipping: {}",
                        template.name, e
                    );
                }
            }
        }

        info!("loaded {} templates", templates.len());
        Self { templates }
    }

    /// The usable templates, in priority order.
    pub fn templates(&self) -> &[CompiledTemplate] {
        &self.templates
    }

    /// Index of the first template matching `input`.
    pub fn first_match_index(&self, input: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.regex.is_match(input))
    }

    /// The first template matching `input`.
    pub fn first_match(&self, input: &str) -> Option<&CompiledTemplate> {
        self.first_match_index(input).map(|i| &self.templates[i])
    }

    /// The first matching template together with its capture groups.
    pub fn first_captures<'s>(
        &self,
        input: &'s str,
    ) -> Option<(&CompiledTemplate, Captures<'s>)> {
        self.templates
            .iter()
            .find_map(|t| t.regex.captures(input).map(|caps| (t, caps)))
    }
}
