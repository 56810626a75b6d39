//! Prediction Form
//!
//! Text inputs for the five prediction features and their coercion into a
//! [`PredictionRequest`].

use crate::client::{PredictionRequest, Sex};
use thiserror::Error;

/// Raw form state, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub diagnosis_age: String,
    pub mutation_count: String,
    pub samples_per_patient: String,
    pub tmb_nonsynonymous: String,
    pub sex: String,
}

impl PredictionForm {
    pub fn new() -> Self {
        Self {
            sex: Sex::default().to_string(),
            ..Self::default()
        }
    }

    /// Coerce the inputs; every field is required
    pub fn into_request(&self) -> Result<PredictionRequest, FormError> {
        let sex_input = self.sex.trim();
        if sex_input.is_empty() {
            return Err(FormError::Missing("Sex"));
        }
        let sex = sex_input
            .parse::<Sex>()
            .map_err(|_| FormError::InvalidSex(sex_input.to_string()))?;

        Ok(PredictionRequest {
            diagnosis_age: number("Diagnosis_Age", &self.diagnosis_age)?,
            mutation_count: number("Mutation_Count", &self.mutation_count)?,
            samples_per_patient: number(
                "Number_of_Samples_Per_Patient",
                &self.samples_per_patient,
            )?,
            tmb_nonsynonymous: number("TMB_nonsynonymous", &self.tmb_nonsynonymous)?,
            sex,
        })
    }
}

fn number(field: &'static str, input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::NotNumeric {
            field,
            value: trimmed.to_string(),
        }),
    }
}

/// Form coercion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Sex must be Male or Female, got {0:?}")]
    InvalidSex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PredictionForm {
        PredictionForm {
            diagnosis_age: "45".to_string(),
            mutation_count: " 12 ".to_string(),
            samples_per_patient: "1".to_string(),
            tmb_nonsynonymous: "3.2".to_string(),
            sex: "Male".to_string(),
        }
    }

    #[test]
    fn test_new_form_defaults_to_male() {
        assert_eq!(PredictionForm::new().sex, "Male");
    }

    #[test]
    fn test_coerces_numbers() {
        let request = filled().into_request().unwrap();
        assert_eq!(request.diagnosis_age, 45.0);
        assert_eq!(request.mutation_count, 12.0);
        assert_eq!(request.samples_per_patient, 1.0);
        assert_eq!(request.tmb_nonsynonymous, 3.2);
        assert_eq!(request.sex, Sex::Male);
    }

    #[test]
    fn test_missing_field() {
        let mut form = filled();
        form.tmb_nonsynonymous = "  ".to_string();
        assert_eq!(
            form.into_request().unwrap_err(),
            FormError::Missing("TMB_nonsynonymous")
        );
    }

    #[test]
    fn test_non_numeric_field() {
        let mut form = filled();
        form.diagnosis_age = "forty".to_string();
        assert_eq!(
            form.into_request().unwrap_err(),
            FormError::NotNumeric {
                field: "Diagnosis_Age",
                value: "forty".to_string()
            }
        );

        form.diagnosis_age = "inf".to_string();
        assert!(matches!(
            form.into_request().unwrap_err(),
            FormError::NotNumeric { .. }
        ));
    }

    #[test]
    fn test_sex_validation() {
        let mut form = filled();
        form.sex = String::new();
        assert_eq!(form.into_request().unwrap_err(), FormError::Missing("Sex"));

        form.sex = "other".to_string();
        assert_eq!(
            form.into_request().unwrap_err(),
            FormError::InvalidSex("other".to_string())
        );
    }
}
