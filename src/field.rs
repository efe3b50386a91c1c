/// Metadata about one environment variable read by a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMetadata {
    /// Environment variable key
    pub key: String,
    /// Expected shape of the value, e.g. `number` or `one of: dev, prod`
    pub kind: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Rendered default value, if the variable has one
    pub default: Option<String>,
    /// Whether loading fails when the variable is unset
    pub required: bool,
}

impl FieldMetadata {
    pub fn required(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            description: None,
            default: None,
            required: true,
        }
    }
}

/// Render field metadata as a markdown summary table
pub fn render_markdown(fields: &[FieldMetadata]) -> String {
    let mut md = String::new();

    md.push_str("## Environment Variables Summary\n\n");
    md.push_str("| Variable | Required | Type | Description | Default |\n");
    md.push_str("|----------|----------|------|-------------|---------|\n");
    for field in fields {
        let required_str = if field.required { "Yes" } else { "No" };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            field.key,
            required_str,
            field.kind,
            field.description.as_deref().unwrap_or("-"),
            field.default.as_deref().unwrap_or("-"),
        ));
    }

    md
}
