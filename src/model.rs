//! Student record types shared by the store, the HTTP layer and the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

pub const NAME_MIN_LEN: usize = 2;
pub const MARKS_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(Error::validation(format!(
                "gender must be Male, Female or Other (got {other:?})"
            ))),
        }
    }
}

/// A numeric wire value that may arrive as a JSON number or as a string.
///
/// Relational drivers commonly hand NUMERIC columns over as text, so readers
/// accept both and treat anything that does not parse as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    /// The numeric value, or 0 when the field holds non-numeric text.
    pub fn value(&self) -> f64 {
        match self {
            Numeric::Int(v) => *v as f64,
            Numeric::Float(v) if v.is_finite() => *v,
            Numeric::Float(_) => 0.0,
            Numeric::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return 0.0;
                }
                t.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0)
            }
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::Int(0)
    }
}

impl From<i64> for Numeric {
    fn from(v: i64) -> Self {
        Numeric::Int(v)
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        Numeric::Float(v)
    }
}

impl From<&str> for Numeric {
    fn from(v: &str) -> Self {
        Numeric::Text(v.to_string())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{v}"),
            Numeric::Float(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Numeric::Float(v) => write!(f, "{v}"),
            Numeric::Text(s) => f.write_str(s),
        }
    }
}

/// Class labels are strings on the wire, but older rows may carry integers.
fn de_label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Label::deserialize(deserializer)? {
        Label::Text(s) => s,
        Label::Int(v) => v.to_string(),
        Label::Float(v) => v.to_string(),
    })
}

/// One row of the `students` table as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub st_id: String,
    pub name: String,
    pub age: Numeric,
    #[serde(deserialize_with = "de_label")]
    pub class: String,
    pub marks: Numeric,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The five mutable fields, in storage vocabulary. Body of POST and PUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub class: String,
    pub marks: f64,
    pub gender: Gender,
}

impl NewStudent {
    /// Server-side shape check run before any statement reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < NAME_MIN_LEN {
            return Err(Error::validation(format!(
                "name must be at least {NAME_MIN_LEN} characters long"
            )));
        }
        if self.age <= 0 {
            return Err(Error::validation("age must be a positive integer"));
        }
        if self.class.trim().is_empty() {
            return Err(Error::validation("class must not be empty"));
        }
        if !self.marks.is_finite() || !(0.0..=MARKS_MAX).contains(&self.marks) {
            return Err(Error::validation("marks must be between 0 and 100"));
        }
        Ok(())
    }

    /// Trimmed copy, the form persisted by the store.
    pub fn normalized(&self) -> NewStudent {
        NewStudent {
            name: self.name.trim().to_string(),
            age: self.age,
            class: self.class.trim().to_string(),
            marks: self.marks,
            gender: self.gender,
        }
    }
}

/// Add/edit form in client vocabulary (`class_name` rather than `class`).
///
/// Numeric fields stay as typed text until submission, like form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    pub name: String,
    pub age: String,
    pub class_name: String,
    pub marks: String,
    pub gender: Gender,
}

impl StudentForm {
    /// Client-side check that blocks submission before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.name.chars().count() < NAME_MIN_LEN {
            return Err(Error::validation(format!(
                "Name must be at least {NAME_MIN_LEN} characters long"
            )));
        }
        Ok(())
    }

    /// Translate to the wire body: `class_name` becomes `class`.
    pub fn to_payload(&self) -> Result<NewStudent> {
        self.validate()?;
        let age = self
            .age
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::validation(format!("age is not a number: {:?}", self.age)))?;
        let marks = self
            .marks
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::validation(format!("marks is not a number: {:?}", self.marks)))?;
        Ok(NewStudent {
            name: self.name.clone(),
            age,
            class: self.class_name.clone(),
            marks,
            gender: self.gender,
        })
    }

    /// Prefill an edit form from a stored record: `class` becomes `class_name`.
    pub fn from_record(record: &StudentRecord) -> StudentForm {
        StudentForm {
            name: record.name.clone(),
            age: record.age.to_string(),
            class_name: record.class.clone(),
            marks: record.marks.to_string(),
            gender: record.gender,
        }
    }
}
