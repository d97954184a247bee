//! Section plan. The one place where resume business rules live.
//!
//! `plan_sections` turns a `ResumeRecord` into the ordered list of sections an encoder must
//! emit. Both encoders consume the plan and only decide how things look on the page.
//!
//! # Inclusion rule
//! A section is planned iff at least one of its fields or items is a non-empty string.
//! Omitted sections leave no header and no placeholder behind.
//!
//! # Encoder divergences
//! The two export formats disagree on a few rules. They are kept as explicit `PlanPolicy`
//! switches rather than unified:
//! - skill labels: derived from the field identifier (DOCX) vs. a curated table (PDF)
//! - projects: DOCX drops entries without a project name, PDF keeps every non-blank entry
//! - declaration: DOCX omits the signature and empty date/place parts, PDF prints them all

use serde::{Deserialize, Serialize};

use crate::models::resume::{ProjectExperience, ResumeRecord};

// ────────────────────────────────────────────────────────────────────────────
// Section descriptors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Objective,
    ProfileSummary,
    AcademicProfile,
    Certifications,
    TechnicalSkills,
    WorkExperience,
    ProfessionalExperience,
    KeyStrengths,
    PersonalProfile,
    Declaration,
}

impl SectionKind {
    /// Fixed emission order shared by both encoders.
    pub const ORDER: [SectionKind; 10] = [
        SectionKind::Objective,
        SectionKind::ProfileSummary,
        SectionKind::AcademicProfile,
        SectionKind::Certifications,
        SectionKind::TechnicalSkills,
        SectionKind::WorkExperience,
        SectionKind::ProfessionalExperience,
        SectionKind::KeyStrengths,
        SectionKind::PersonalProfile,
        SectionKind::Declaration,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Objective => "Objective",
            SectionKind::ProfileSummary => "Profile Summary",
            SectionKind::AcademicProfile => "Academic Profile",
            SectionKind::Certifications => "Certifications",
            SectionKind::TechnicalSkills => "Technical Skills",
            SectionKind::WorkExperience => "Work Experience",
            SectionKind::ProfessionalExperience => "Professional Experience",
            SectionKind::KeyStrengths => "Key Strengths",
            SectionKind::PersonalProfile => "Personal Profile",
            SectionKind::Declaration => "Declaration",
        }
    }
}

/// A `label value` pair. Labels carry their trailing colon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: impl Into<String>, value: &str) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationItem {
    pub name: String,
    pub issuer: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    /// May be empty under a policy that keeps unnamed projects.
    pub project_name: String,
    /// Client, role, designation and duration, non-empty ones only.
    pub details: Vec<Field>,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationItem {
    pub text: String,
    /// Pre-formatted `Date: … Place: …` line, `None` when the policy drops it.
    pub date_place: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    Bullets(Vec<String>),
    Certifications(Vec<CertificationItem>),
    Fields(Vec<Field>),
    Projects(Vec<ProjectItem>),
    Declaration(DeclarationItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSection {
    pub kind: SectionKind,
    pub title: String,
    pub body: SectionBody,
}

// ────────────────────────────────────────────────────────────────────────────
// Policy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLabelStyle {
    /// Space before each uppercase letter of the identifier: `cloudPlatform` → `cloud Platform:`.
    Derived,
    /// Hand-written labels: `cloudPlatform` → `Cloud Platform:`.
    Curated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPolicy {
    pub skill_labels: SkillLabelStyle,
    /// Drop professional-experience entries whose `projectName` is empty.
    pub require_project_name: bool,
    pub include_signature: bool,
    /// Leave absent date/place parts out of the declaration line instead of printing them empty.
    pub omit_empty_date_place: bool,
}

impl PlanPolicy {
    /// Rules used by the rich-document (DOCX) encoder.
    pub const RICH: PlanPolicy = PlanPolicy {
        skill_labels: SkillLabelStyle::Derived,
        require_project_name: true,
        include_signature: false,
        omit_empty_date_place: true,
    };

    /// Rules used by the portable-page (PDF) encoder.
    pub const PAGED: PlanPolicy = PlanPolicy {
        skill_labels: SkillLabelStyle::Curated,
        require_project_name: false,
        include_signature: true,
        omit_empty_date_place: false,
    };
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

/// Builds the ordered section list for `record` under `policy`.
///
/// Pure: the same record and policy always yield the same plan.
pub fn plan_sections(record: &ResumeRecord, policy: &PlanPolicy) -> Vec<PlannedSection> {
    SectionKind::ORDER
        .iter()
        .filter_map(|&kind| {
            plan_body(kind, record, policy).map(|body| PlannedSection {
                kind,
                title: kind.title().to_string(),
                body,
            })
        })
        .collect()
}

fn plan_body(kind: SectionKind, record: &ResumeRecord, policy: &PlanPolicy) -> Option<SectionBody> {
    match kind {
        SectionKind::Objective => non_empty(&record.personal_info.objective)
            .map(|s| SectionBody::Text(s.to_string())),

        SectionKind::ProfileSummary => {
            non_empty_list(&record.profile_summary).map(SectionBody::Bullets)
        }

        SectionKind::AcademicProfile => {
            non_empty(&record.academic_profile).map(|s| SectionBody::Text(s.to_string()))
        }

        SectionKind::Certifications => {
            let items: Vec<CertificationItem> = record
                .certifications
                .iter()
                .filter(|c| !c.name.is_empty())
                .map(|c| CertificationItem {
                    name: c.name.clone(),
                    issuer: non_empty(&c.issuer).map(str::to_string),
                    year: non_empty(&c.year).map(str::to_string),
                })
                .collect();
            (!items.is_empty()).then_some(SectionBody::Certifications(items))
        }

        SectionKind::TechnicalSkills => {
            let fields: Vec<Field> = record
                .technical_skills
                .fields()
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(id, value)| Field::new(skill_label(id, policy.skill_labels), value))
                .collect();
            (!fields.is_empty()).then_some(SectionBody::Fields(fields))
        }

        SectionKind::WorkExperience => {
            let work = &record.work_experience;
            present_fields(&[
                ("Position:", &work.position),
                ("Company:", &work.company),
                ("Location:", &work.location),
                ("Duration:", &work.duration),
            ])
            .map(SectionBody::Fields)
        }

        SectionKind::ProfessionalExperience => {
            let projects: Vec<ProjectItem> = record
                .professional_experience
                .iter()
                .filter(|p| {
                    if policy.require_project_name {
                        !p.project_name.is_empty()
                    } else {
                        p.has_content()
                    }
                })
                .map(plan_project)
                .collect();
            (!projects.is_empty()).then_some(SectionBody::Projects(projects))
        }

        SectionKind::KeyStrengths => non_empty_list(&record.strengths).map(SectionBody::Bullets),

        SectionKind::PersonalProfile => {
            let profile = &record.personal_profile;
            present_fields(&[
                ("Father's Name:", &profile.father_name),
                ("Date of Birth:", &profile.dob),
                ("Nationality:", &profile.nationality),
                ("Languages Known:", &profile.languages),
                ("Marital Status:", &profile.marital_status),
            ])
            .map(SectionBody::Fields)
        }

        SectionKind::Declaration => {
            let decl = &record.declaration;
            let any = [&decl.text, &decl.date, &decl.place, &decl.signature]
                .iter()
                .any(|s| !s.is_empty());
            if !any {
                return None;
            }

            let date_place = if policy.omit_empty_date_place {
                let parts: Vec<String> = [("Date:", &decl.date), ("Place:", &decl.place)]
                    .iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(label, v)| format!("{label} {v}"))
                    .collect();
                (!parts.is_empty()).then(|| parts.join("    "))
            } else {
                Some(format!("Date: {}    Place: {}", decl.date, decl.place))
            };

            Some(SectionBody::Declaration(DeclarationItem {
                text: decl.text.clone(),
                date_place,
                signature: policy.include_signature.then(|| decl.signature.clone()),
            }))
        }
    }
}

fn plan_project(project: &ProjectExperience) -> ProjectItem {
    let details = present_fields(&[
        ("Client:", &project.client),
        ("Role:", &project.role),
        ("Designation:", &project.designation),
        ("Duration:", &project.duration),
    ])
    .unwrap_or_default();

    ProjectItem {
        project_name: project.project_name.clone(),
        details,
        responsibilities: non_empty_list(&project.roles_responsibilities).unwrap_or_default(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Labels
// ────────────────────────────────────────────────────────────────────────────

pub fn skill_label(identifier: &str, style: SkillLabelStyle) -> String {
    match style {
        SkillLabelStyle::Derived => derive_skill_label(identifier),
        SkillLabelStyle::Curated => curated_skill_label(identifier).to_string(),
    }
}

/// Inserts a space before every uppercase ASCII letter and appends a colon.
/// Lowercase initials are kept as-is, so `cloudPlatform` becomes `cloud Platform:`.
pub fn derive_skill_label(identifier: &str) -> String {
    let mut label = String::with_capacity(identifier.len() + 4);
    for c in identifier.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label.push(':');
    label
}

pub fn curated_skill_label(identifier: &str) -> &'static str {
    match identifier {
        "operatingSystem" => "Operating System:",
        "cloudPlatform" => "Cloud Platform:",
        "orchestration" => "Orchestration:",
        "ticketingTools" => "Ticketing Tools:",
        "cicd" => "CI/CD:",
        "iaac" => "IaaC:",
        "versionControl" => "Version Control:",
        "scripting" => "Scripting:",
        _ => "Other:",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn non_empty_list(items: &[String]) -> Option<Vec<String>> {
    let kept: Vec<String> = items.iter().filter(|s| !s.is_empty()).cloned().collect();
    (!kept.is_empty()).then_some(kept)
}

fn present_fields(pairs: &[(&str, &String)]) -> Option<Vec<Field>> {
    let fields: Vec<Field> = pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| Field::new(*label, value))
        .collect();
    (!fields.is_empty()).then_some(fields)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
