//! Profile and master-data models — read-only inputs to the agent core.
//!
//! The core never mutates these; it reads fields to build prompts and returns
//! suggested structured edits for the embedding application to apply.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Contact and headline data shared by every resume variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One position in the master experience library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Self-assessed proficiency, 1–5.
    #[serde(default)]
    pub proficiency: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// The full master-data library a user maintains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(default)]
    pub personal: PersonalInfo,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillItem>,
    #[serde(default)]
    pub education: Vec<Education>,
}

impl DataBundle {
    /// True when the bundle carries no selectable items at all.
    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
            && self.projects.is_empty()
            && self.skills.is_empty()
            && self.education.is_empty()
    }

    /// Compact JSON digest of the bundle for inclusion in prompts.
    pub fn prompt_digest(&self) -> Value {
        serde_json::json!({
            "experiences": self.experiences.iter().map(|e| serde_json::json!({
                "id": e.id,
                "company": e.company,
                "title": e.title,
                "bullets": e.bullets,
                "skills": e.skills,
            })).collect::<Vec<_>>(),
            "projects": self.projects.iter().map(|p| serde_json::json!({
                "id": p.id,
                "name": p.name,
                "description": p.description,
                "technologies": p.technologies,
            })).collect::<Vec<_>>(),
            "skills": self.skills.iter().map(|s| serde_json::json!({
                "id": s.id,
                "name": s.name,
                "category": s.category,
            })).collect::<Vec<_>>(),
            "education": self.education.iter().map(|e| serde_json::json!({
                "id": e.id,
                "institution": e.institution,
                "degree": e.degree,
            })).collect::<Vec<_>>(),
        })
    }
}

/// A resume variant: a named selection over the master data, plus per-item
/// text overrides and optional metadata from a prior AI optimization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub selected_experience_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_project_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_skill_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_education_ids: Vec<Uuid>,
    /// Per-item text overrides keyed by master item id.
    #[serde(default)]
    pub item_overrides: HashMap<Uuid, Value>,
    #[serde(default)]
    pub last_optimized: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Profile {
            id: Uuid::new_v4(),
            name: name.into(),
            selected_experience_ids: Vec::new(),
            selected_project_ids: Vec::new(),
            selected_skill_ids: Vec::new(),
            selected_education_ids: Vec::new(),
            item_overrides: HashMap::new(),
            last_optimized: None,
        }
    }

    /// Resolves this profile's selections against the master data into a
    /// resume-shaped JSON value for prompts. Unknown ids are skipped; an
    /// empty selection falls back to the full bundle digest.
    pub fn resume_view(&self, data: &DataBundle) -> Value {
        if self.total_selected() == 0 {
            return data.prompt_digest();
        }

        let experiences: Vec<&Experience> = data
            .experiences
            .iter()
            .filter(|e| self.selected_experience_ids.contains(&e.id))
            .collect();
        let projects: Vec<&Project> = data
            .projects
            .iter()
            .filter(|p| self.selected_project_ids.contains(&p.id))
            .collect();
        let skills: Vec<&SkillItem> = data
            .skills
            .iter()
            .filter(|s| self.selected_skill_ids.contains(&s.id))
            .collect();
        let education: Vec<&Education> = data
            .education
            .iter()
            .filter(|e| self.selected_education_ids.contains(&e.id))
            .collect();

        serde_json::json!({
            "name": data.personal.name,
            "headline": data.personal.headline,
            "summary": data.personal.summary,
            "experiences": experiences,
            "projects": projects,
            "skills": skills,
            "education": education,
        })
    }

    pub fn total_selected(&self) -> usize {
        self.selected_experience_ids.len()
            + self.selected_project_ids.len()
            + self.selected_skill_ids.len()
            + self.selected_education_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle_is_empty() {
        assert!(DataBundle::default().is_empty());
    }

    #[test]
    fn test_bundle_with_one_skill_is_not_empty() {
        let mut bundle = DataBundle::default();
        bundle.skills.push(SkillItem {
            id: Uuid::new_v4(),
            name: "Rust".to_string(),
            category: Some("languages".to_string()),
            proficiency: Some(4),
        });
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_prompt_digest_carries_item_ids() {
        let mut bundle = DataBundle::default();
        let id = Uuid::new_v4();
        bundle.experiences.push(Experience {
            id,
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            start_date: None,
            end_date: None,
            bullets: vec!["Built things".to_string()],
            skills: vec![],
        });

        let digest = bundle.prompt_digest();
        assert_eq!(digest["experiences"][0]["id"], serde_json::json!(id));
        assert_eq!(digest["experiences"][0]["company"], "Acme");
    }

    #[test]
    fn test_profile_total_selected_counts_all_sections() {
        let mut profile = Profile::new("Backend roles");
        profile.selected_experience_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        profile.selected_skill_ids = vec![Uuid::new_v4()];
        assert_eq!(profile.total_selected(), 3);
    }

    #[test]
    fn test_profile_deserializes_with_missing_optional_fields() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Minimal"
        });
        let profile: Profile = serde_json::from_value(json).unwrap();
        assert!(profile.selected_experience_ids.is_empty());
        assert!(profile.last_optimized.is_none());
    }
}
