// Subject (disease) catalog domain model
use super::error::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub description: String,
    pub color: String,
    /// Environmental driver note shown alongside forecast insights
    pub weather_factor: String,
    /// Typical weekly magnitude used by the series generator
    pub base_magnitude: f64,
}

/// Read-only list of subjects, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SubjectCatalog {
    subjects: Vec<Subject>,
}

impl SubjectCatalog {
    pub fn new(subjects: Vec<Subject>) -> anyhow::Result<Self> {
        if subjects.is_empty() {
            anyhow::bail!("subject catalog is empty");
        }
        for (i, subject) in subjects.iter().enumerate() {
            if subjects[..i].iter().any(|s| s.id == subject.id) {
                anyhow::bail!("duplicate subject id in catalog: {}", subject.id);
            }
            if !subject.base_magnitude.is_finite() || subject.base_magnitude < 0.0 {
                anyhow::bail!(
                    "subject {} has invalid base magnitude {}",
                    subject.id,
                    subject.base_magnitude
                );
            }
        }
        Ok(Self { subjects })
    }

    pub fn get(&self, id: &str) -> Result<&Subject, DashboardError> {
        self.subjects
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DashboardError::UnknownSubject(id.to_string()))
    }

    pub fn first(&self) -> &Subject {
        // non-empty by construction
        &self.subjects[0]
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }
}
