use crate::error::VibesError;

pub const DATA_PLACEHOLDER: &str = "VIBES_DATA_TARGET";
pub const CSS_PLACEHOLDER: &str = "VIBES_CSS_TARGET";
pub const BUNDLE_PLACEHOLDER: &str = "VIBES_SODA_TARGET";

/// Replaces every occurrence of `placeholder`; errors if there is none.
pub fn substitute(template: &str, placeholder: &str, value: &str) -> Result<String, VibesError> {
    if !template.contains(placeholder) {
        return Err(VibesError::MissingPlaceholder(placeholder.to_string()));
    }
    Ok(template.replace(placeholder, value))
}

/// A page template with the visualization bundle already inlined, ready to take
/// one genome's data block at a time.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    text: String,
}

impl PageTemplate {
    pub fn new(template: &str, bundle: &str) -> Result<Self, VibesError> {
        if !template.contains(DATA_PLACEHOLDER) {
            return Err(VibesError::MissingPlaceholder(DATA_PLACEHOLDER.to_string()));
        }
        let text = substitute(template, BUNDLE_PLACEHOLDER, bundle)?;
        Ok(Self { text })
    }

    pub fn fill(&self, data_block: &str) -> String {
        self.text.replace(DATA_PLACEHOLDER, data_block)
    }
}

/// Self-contained document: data, stylesheet and bundle inlined into one file.
///
/// The bundle is inlined last so its contents are never scanned for placeholders.
pub fn combine_document(
    template: &str,
    data: &str,
    stylesheet: &str,
    bundle: &str,
) -> Result<String, VibesError> {
    let html = substitute(template, DATA_PLACEHOLDER, data)?;
    let html = substitute(&html, CSS_PLACEHOLDER, stylesheet)?;
    substitute(&html, BUNDLE_PLACEHOLDER, bundle)
}
