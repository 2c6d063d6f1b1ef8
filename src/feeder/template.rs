use url::Url;

use crate::error::FeederError;

const ID_PLACEHOLDER: &str = "{id}";
const FORMAT_PLACEHOLDER: &str = "%s";
const PROBE_ID: &str = "0";

/// Base URL with a single identifier slot, written as `{id}` or `%s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    prefix: String,
    suffix: String,
}

impl UrlTemplate {
    /// Parses a template and checks that it renders to a valid URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the template has no placeholder or does not form
    /// an absolute URL.
    pub fn parse(template: &str) -> Result<Self, FeederError> {
        let template = template.trim();
        let (prefix, suffix) = template
            .split_once(ID_PLACEHOLDER)
            .or_else(|| template.split_once(FORMAT_PLACEHOLDER))
            .ok_or_else(|| FeederError::MissingPlaceholder {
                template: template.to_owned(),
            })?;
        let parsed = Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        };
        parsed.render(PROBE_ID)?;
        Ok(parsed)
    }

    /// Substitutes `id` into the template.
    ///
    /// # Errors
    ///
    /// Returns an error when the result is not a valid URL.
    pub fn render(&self, id: &str) -> Result<Url, FeederError> {
        let raw = format!("{}{}{}", self.prefix, id, self.suffix);
        Url::parse(&raw).map_err(|err| FeederError::InvalidUrl {
            url: raw,
            source: err,
        })
    }
}
