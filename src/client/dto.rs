//! Request DTOs
//!
//! Wire shapes sent to the prediction API. Field names follow the backend's
//! JSON exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Login credentials
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Biological sex as accepted by the prediction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("Unknown sex: {}. Use: Male, Female", other)),
        }
    }
}

/// Features submitted to `/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Diagnosis_Age")]
    pub diagnosis_age: f64,
    #[serde(rename = "Mutation_Count")]
    pub mutation_count: f64,
    #[serde(rename = "Number_of_Samples_Per_Patient")]
    pub samples_per_patient: f64,
    #[serde(rename = "TMB_nonsynonymous")]
    pub tmb_nonsynonymous: f64,
    #[serde(rename = "Sex")]
    pub sex: Sex,
}

/// Body of `/chat`
///
/// `image_url` is always serialized, as `null` when no image is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub image_url: Option<String>,
}

impl ChatRequest {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
