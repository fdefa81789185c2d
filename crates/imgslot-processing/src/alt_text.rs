use imgslot_core::ValidationError;

/// Require descriptive text before any image work starts.
///
/// Must run before variant generation and before any storage call.
pub fn check_accessibility_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::MissingAltText);
    }
    Ok(())
}
