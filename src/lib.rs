mod config;
mod document;
mod error;
mod latex;
pub mod links;
mod model;
mod output;
mod template;

pub use config::{Config, PathsConfig};
pub use document::{ProjectDocument, ResumeDocument};
pub use error::{Error, Result};
pub use latex::{
    entry_education, entry_experience, entry_hobby, entry_honor, entry_languages, entry_project,
    entry_projects, entry_publication, entry_skills, entry_volunteering, section_fragment,
};
pub use model::{
    Degree, EducationRecord, ExperienceRecord, HonorRecord, LanguageRecord, OrderedMap, Personal,
    ProjectRecord, PublicationRecord, Scalar, Section, SectionData, SkillBody, SkillCategory,
    Substitution, Text, VolunteeringRecord,
};
pub use output::atomic_write;
pub use template::{Template, replace_placeholders};

use std::fs;

use tracing::info;

/// Fill every placeholder of `template` from the resume and project data.
pub fn render(resume: &ResumeDocument, projects: &ProjectDocument, template: &str) -> String {
    resume
        .substitutions(projects)
        .fold(template.to_string(), |text, substitution| {
            replace_placeholders(&text, &substitution)
        })
}

/// Read all inputs named by `paths` and render the document.
///
/// Nothing is written; every input is read and rendered before returning.
pub fn generate(paths: &PathsConfig) -> Result<String> {
    let resume = ResumeDocument::load(&paths.data)?;
    let projects = ProjectDocument::load(&paths.projects)?;
    let template = fs::read_to_string(&paths.template).map_err(|source| Error::Read {
        path: paths.template.clone(),
        source,
    })?;
    info!(path = %paths.template.display(), "loaded template");

    Ok(render(&resume, &projects, &template))
}
