// Resume export pipeline.
// Implements: section plan, rich-document (DOCX) encoder, portable-page (PDF) encoder,
// badge asset fetching, file delivery, and the HTTP handlers that drive them.
// CPU-bound composition runs inside tokio::task::spawn_blocking.

pub mod assets;
pub mod delivery;
pub mod handlers;
pub mod paged;
pub mod pdf;
pub mod plan;
pub mod rich;

use thiserror::Error;

pub use paged::encode_paged;
pub use rich::encode_rich;

/// Failures an encoder can report. Nothing is retried: either kind ends the export call.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The badge image embedded by the DOCX encoder could not be retrieved or decoded.
    #[error("Badge asset unavailable: {0}")]
    AssetFetch(String),

    /// Packing the finished document into bytes failed.
    #[error("Document serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the encoder and router tests.

    use std::io::Cursor;

    use docx_rs::{
        DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
        TableRowChild,
    };

    use crate::models::resume::{
        Certification, Declaration, PersonalInfo, PersonalProfile, ProjectExperience,
        ResumeRecord, TechnicalSkills, WorkExperience,
    };

    /// A record with every field populated with short, wrap-free values.
    pub fn full_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: "Asha Rao".to_string(),
                email: "asha.rao@example.com".to_string(),
                phone: "+91 98765 43210".to_string(),
                location: "Pune, India".to_string(),
                objective: "Seeking a DevOps engineer role".to_string(),
            },
            profile_summary: vec![
                "Three years running production Kubernetes".to_string(),
                "Cut deploy time from hours to minutes".to_string(),
            ],
            academic_profile: "B.E. Computer Engineering, 2020".to_string(),
            certifications: vec![Certification {
                id: Some(serde_json::json!(1)),
                name: "Certified Kubernetes Administrator".to_string(),
                issuer: "CNCF".to_string(),
                year: "2023".to_string(),
            }],
            technical_skills: TechnicalSkills {
                operating_system: "Linux".to_string(),
                cloud_platform: "AWS".to_string(),
                orchestration: "Kubernetes".to_string(),
                ticketing_tools: "Jira".to_string(),
                cicd: "Jenkins".to_string(),
                iaac: "Terraform".to_string(),
                version_control: "Git".to_string(),
                scripting: "Bash".to_string(),
            },
            work_experience: WorkExperience {
                position: "Cloud Engineer".to_string(),
                company: "Globex Systems".to_string(),
                location: "Bengaluru".to_string(),
                duration: "2021 - Present".to_string(),
            },
            professional_experience: vec![ProjectExperience {
                id: Some(serde_json::json!("p-1")),
                project_name: "Payments Platform".to_string(),
                client: "Initech Bank".to_string(),
                role: "Build and Release".to_string(),
                designation: "Senior Associate".to_string(),
                duration: "18 months".to_string(),
                roles_responsibilities: vec![
                    "Owned the release pipeline".to_string(),
                    "Ran weekly failover drills".to_string(),
                ],
            }],
            strengths: vec!["Calm under pressure".to_string(), "Quick learner".to_string()],
            personal_profile: PersonalProfile {
                father_name: "Ravi Rao".to_string(),
                dob: "12-04-1998".to_string(),
                nationality: "Indian".to_string(),
                languages: "English, Marathi".to_string(),
                marital_status: "Single".to_string(),
            },
            declaration: Declaration {
                text: "I hereby declare the above is true".to_string(),
                date: "01-10-2026".to_string(),
                place: "Pune".to_string(),
                signature: "Asha R.".to_string(),
            },
        }
    }

    /// Every literal value of `full_record` except the signature.
    pub fn rendered_values(record: &ResumeRecord) -> Vec<String> {
        let p = &record.personal_info;
        let mut values = vec![
            p.name.clone(),
            p.email.clone(),
            p.phone.clone(),
            p.location.clone(),
            p.objective.clone(),
            record.academic_profile.clone(),
        ];
        values.extend(record.profile_summary.iter().cloned());
        for c in &record.certifications {
            values.extend([c.name.clone(), c.issuer.clone(), c.year.clone()]);
        }
        values.extend(
            record
                .technical_skills
                .fields()
                .iter()
                .map(|(_, v)| v.to_string()),
        );
        let w = &record.work_experience;
        values.extend([
            w.position.clone(),
            w.company.clone(),
            w.location.clone(),
            w.duration.clone(),
        ]);
        for project in &record.professional_experience {
            values.extend([
                project.project_name.clone(),
                project.client.clone(),
                project.role.clone(),
                project.designation.clone(),
                project.duration.clone(),
            ]);
            values.extend(project.roles_responsibilities.iter().cloned());
        }
        values.extend(record.strengths.iter().cloned());
        let pp = &record.personal_profile;
        values.extend([
            pp.father_name.clone(),
            pp.dob.clone(),
            pp.nationality.clone(),
            pp.languages.clone(),
            pp.marital_status.clone(),
        ]);
        let d = &record.declaration;
        values.extend([d.text.clone(), d.date.clone(), d.place.clone()]);
        values
    }

    /// A small valid PNG to stand in for the badge.
    pub fn sample_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([46, 94, 78]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    /// Paragraph texts of a DOCX, in document order (table cells included).
    pub fn docx_paragraphs(bytes: &[u8]) -> Vec<String> {
        let docx = docx_rs::read_docx(bytes).unwrap();
        let mut out = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_paragraph(&mut out, p),
                DocumentChild::Table(t) => push_table(&mut out, t),
                _ => {}
            }
        }
        out
    }

    fn push_table(out: &mut Vec<String>, table: &Table) {
        for TableChild::TableRow(row) in &table.rows {
            for TableRowChild::TableCell(cell) in &row.cells {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(p) => push_paragraph(out, p),
                        TableCellContent::Table(t) => push_table(out, t),
                        _ => {}
                    }
                }
            }
        }
    }

    fn push_paragraph(out: &mut Vec<String>, paragraph: &Paragraph) {
        let mut text = String::new();
        for child in &paragraph.children {
            if let ParagraphChild::Run(run) = child {
                for run_child in &run.children {
                    if let RunChild::Text(t) = run_child {
                        text.push_str(&t.text);
                    }
                }
            }
        }
        if !text.is_empty() {
            out.push(text);
        }
    }
}
