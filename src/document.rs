use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::links;
use crate::model::{
    EducationRecord, ExperienceRecord, HonorRecord, LanguageRecord, OrderedMap, Personal,
    ProjectRecord, PublicationRecord, Scalar, Section, SectionData, SkillCategory, Substitution,
    VolunteeringRecord,
};

/// The personal-data document: flat personal fields plus the list sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub personal: Personal,
    pub education: Vec<EducationRecord>,
    pub experience: Vec<ExperienceRecord>,
    pub volunteering: Vec<VolunteeringRecord>,
    pub skills: Vec<SkillCategory>,
    pub languages: Vec<LanguageRecord>,
    pub hobbies: Vec<Scalar>,
    pub publications: Vec<PublicationRecord>,
    pub honors: Vec<HonorRecord>,
}

impl ResumeDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read(path)?;
        let doc = Self::from_yaml(&text).map_err(|e| e.in_file(path))?;
        info!(path = %path.display(), "loaded resume data");
        Ok(doc)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let root = root_mapping(text, "resume")?;
        Ok(Self {
            personal: section(&root, "personal")?,
            education: section(&root, "education")?,
            experience: section(&root, "work")?,
            volunteering: section(&root, "volunteering")?,
            skills: section(&root, "skills")?,
            languages: section(&root, "languages")?,
            hobbies: section(&root, "hobbies")?,
            // Every field of these two sections may carry links.
            publications: linked_section(&root, "publications")?,
            honors: linked_section(&root, "honors")?,
        })
    }

    pub fn section_data<'a>(
        &'a self,
        section: Section,
        projects: &'a ProjectDocument,
    ) -> SectionData<'a> {
        match section {
            Section::Education => SectionData::Education(&self.education),
            Section::Experience => SectionData::Experience(&self.experience),
            Section::Volunteering => SectionData::Volunteering(&self.volunteering),
            Section::Skills => SectionData::Skills(&self.skills),
            Section::Languages => SectionData::Languages(&self.languages),
            Section::Hobbies => SectionData::Hobbies(&self.hobbies),
            Section::Projects => SectionData::Projects(&projects.groups),
            Section::Publications => SectionData::Publications(&self.publications),
            Section::Honors => SectionData::Honors(&self.honors),
        }
    }

    /// All substitutions in fill order, personal fields first.
    pub fn substitutions<'a>(
        &'a self,
        projects: &'a ProjectDocument,
    ) -> impl Iterator<Item = Substitution<'a>> {
        let sections = Section::ALL
            .into_iter()
            .map(move |section| Substitution::Section(self.section_data(section, projects)));
        std::iter::once(Substitution::Personal(&self.personal)).chain(sections)
    }
}

/// Projects grouped under arbitrary keys, holding only resume-visible records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDocument {
    pub groups: OrderedMap<Vec<ProjectRecord>>,
}

impl ProjectDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read(path)?;
        let doc = Self::from_yaml(&text).map_err(|e| e.in_file(path))?;
        info!(path = %path.display(), "loaded project data");
        Ok(doc)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: OrderedMap<Vec<Value>> = serde_yaml::from_str(text)?;
        let groups = raw
            .iter()
            .map(|(group, projects)| {
                let visible = projects
                    .iter()
                    .filter(|project| is_shown(project))
                    .map(|project| {
                        serde_yaml::from_value(project.clone()).map_err(|source| {
                            Error::Section {
                                section: "projects",
                                source,
                            }
                        })
                    })
                    .collect::<Result<Vec<ProjectRecord>>>()?;
                debug!(group, shown = visible.len(), total = projects.len(), "project group");
                Ok::<_, Error>((group, visible))
            })
            .collect::<Result<OrderedMap<_>>>()?;
        Ok(Self { groups })
    }
}

// Hidden projects are skipped before typing, so they need no resume fields.
fn is_shown(project: &Value) -> bool {
    project
        .get("show_on_resume")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn root_mapping(text: &str, document: &'static str) -> Result<Mapping> {
    match serde_yaml::from_str(text)? {
        Value::Mapping(root) => Ok(root),
        _ => Err(Error::NotAMapping(document)),
    }
}

fn raw_section(root: &Mapping, key: &'static str) -> Result<Value> {
    root.get(key).cloned().ok_or(Error::MissingSection(key))
}

fn typed<T: DeserializeOwned>(value: Value, key: &'static str) -> Result<T> {
    serde_yaml::from_value(value).map_err(|source| Error::Section {
        section: key,
        source,
    })
}

fn section<T: DeserializeOwned>(root: &Mapping, key: &'static str) -> Result<T> {
    typed(raw_section(root, key)?, key)
}

fn linked_section<T: DeserializeOwned>(root: &Mapping, key: &'static str) -> Result<T> {
    typed(links::transform(raw_section(root, key)?), key)
}
