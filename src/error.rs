use thiserror::Error;

pub type Result<T> = std::result::Result<T, KitchenError>;

#[derive(Debug, Error)]
pub enum KitchenError {
    /// Operator typed something that is not a usable quantity.
    #[error("Invalid number for {field}: '{input}'")]
    InvalidNumber { field: String, input: String },

    /// Catalog file parsed but holds values a recipe cannot have.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Flavor stock can only be recorded for this week's flavors.
    #[error("Flavor '{0}' is not in this week's lineup")]
    NotInLineup(String),

    /// Scaling options that do not describe exactly one directive.
    #[error("Invalid scaling directive: {0}")]
    InvalidDirective(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parses operator-typed numeric text into a non-negative quantity.
///
/// Blank, non-numeric, non-finite and negative inputs are rejected so the
/// caller can report the problem inline and skip the dependent computation.
pub fn parse_grams(field: &str, input: &str) -> Result<f64> {
    let invalid = || KitchenError::InvalidNumber {
        field: field.to_string(),
        input: input.to_string(),
    };
    let value = input.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}
