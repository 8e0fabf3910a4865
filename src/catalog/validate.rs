use serde_json::{json, Value};

/// Collects field violations for a draft, in the `details` shape of a
/// validation error.
#[derive(Debug, Default)]
pub struct Violations(Vec<Value>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, error: &str) -> &mut Self {
        if !ok {
            self.0.push(json!({ "field": field, "error": error }));
        }
        self
    }

    pub fn require(&mut self, value: &str, field: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, "required")
    }

    pub fn positive(&mut self, id: i64, field: &str) -> &mut Self {
        self.check(id > 0, field, "must be a positive id")
    }

    pub fn finish(&mut self) -> Result<(), Vec<Value>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_violation() {
        let details = Violations::new()
            .require("  ", "title")
            .positive(0, "author_id")
            .check(true, "published_year", "must not be negative")
            .finish()
            .unwrap_err();

        assert_eq!(
            details,
            vec![
                json!({"field": "title", "error": "required"}),
                json!({"field": "author_id", "error": "must be a positive id"}),
            ]
        );
    }

    #[test]
    fn test_clean_draft_passes() {
        assert!(Violations::new().require("Dune", "title").finish().is_ok());
    }
}
