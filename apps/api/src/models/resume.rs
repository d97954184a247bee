use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The single input to both export encoders.
///
/// Every field is optional on the wire: a missing key deserializes to its empty default, and
/// an empty value simply drops the corresponding section from the exported document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub profile_summary: Vec<String>,
    pub academic_profile: String,
    pub certifications: Vec<Certification>,
    pub technical_skills: TechnicalSkills,
    pub work_experience: WorkExperience,
    pub professional_experience: Vec<ProjectExperience>,
    pub strengths: Vec<String>,
    pub personal_profile: PersonalProfile,
    pub declaration: Declaration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub objective: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    /// Editing identity only (the form sends numbers or strings). Never rendered.
    pub id: Option<Value>,
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalSkills {
    pub operating_system: String,
    pub cloud_platform: String,
    pub orchestration: String,
    pub ticketing_tools: String,
    pub cicd: String,
    pub iaac: String,
    pub version_control: String,
    pub scripting: String,
}

impl TechnicalSkills {
    /// The eight skill fields in display order, keyed by their wire identifier.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("operatingSystem", self.operating_system.as_str()),
            ("cloudPlatform", self.cloud_platform.as_str()),
            ("orchestration", self.orchestration.as_str()),
            ("ticketingTools", self.ticketing_tools.as_str()),
            ("cicd", self.cicd.as_str()),
            ("iaac", self.iaac.as_str()),
            ("versionControl", self.version_control.as_str()),
            ("scripting", self.scripting.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub position: String,
    pub company: String,
    pub location: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectExperience {
    pub id: Option<Value>,
    pub project_name: String,
    pub client: String,
    pub role: String,
    pub designation: String,
    pub duration: String,
    pub roles_responsibilities: Vec<String>,
}

impl ProjectExperience {
    /// True when any rendered field carries text.
    pub fn has_content(&self) -> bool {
        [
            &self.project_name,
            &self.client,
            &self.role,
            &self.designation,
            &self.duration,
        ]
        .iter()
        .any(|s| !s.is_empty())
            || self.roles_responsibilities.iter().any(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalProfile {
    pub father_name: String,
    pub dob: String,
    pub nationality: String,
    pub languages: String,
    pub marital_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Declaration {
    pub text: String,
    pub date: String,
    pub place: String,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let record: ResumeRecord =
            serde_json::from_str(r#"{"personalInfo": {"name": "Asha Rao"}}"#).unwrap();
        assert_eq!(record.personal_info.name, "Asha Rao");
        assert!(record.personal_info.email.is_empty());
        assert!(record.profile_summary.is_empty());
        assert!(record.declaration.signature.is_empty());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{
            "technicalSkills": {"cloudPlatform": "AWS", "versionControl": "Git"},
            "professionalExperience": [
                {"id": 1717000000000, "projectName": "Billing", "rolesResponsibilities": ["Ops"]}
            ],
            "personalProfile": {"fatherName": "R. Rao", "maritalStatus": "Single"}
        }"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.technical_skills.cloud_platform, "AWS");
        assert_eq!(record.technical_skills.version_control, "Git");
        assert_eq!(record.professional_experience[0].project_name, "Billing");
        assert_eq!(record.professional_experience[0].roles_responsibilities, vec!["Ops"]);
        assert_eq!(record.personal_profile.father_name, "R. Rao");
    }

    #[test]
    fn test_id_accepts_string_or_number() {
        let json = r#"{"certifications": [
            {"id": "c-1", "name": "CKA"},
            {"id": 42, "name": "AZ-900"}
        ]}"#;
        let record: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.certifications.len(), 2);
        assert_eq!(record.certifications[1].name, "AZ-900");
    }

    #[test]
    fn test_skill_fields_are_in_display_order() {
        let skills = TechnicalSkills {
            operating_system: "Linux".to_string(),
            scripting: "Bash".to_string(),
            ..Default::default()
        };
        let fields = skills.fields();
        assert_eq!(fields[0], ("operatingSystem", "Linux"));
        assert_eq!(fields[7], ("scripting", "Bash"));
        assert_eq!(fields[4].0, "cicd");
    }

    #[test]
    fn test_project_has_content() {
        let mut project = ProjectExperience::default();
        assert!(!project.has_content());
        project.roles_responsibilities.push(String::new());
        assert!(!project.has_content());
        project.client = "Acme".to_string();
        assert!(project.has_content());
    }
}
