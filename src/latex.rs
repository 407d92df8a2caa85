use crate::model::{
    Degree, EducationRecord, ExperienceRecord, HonorRecord, LanguageRecord, OrderedMap,
    ProjectRecord, PublicationRecord, SectionData, SkillBody, SkillCategory, Text,
    VolunteeringRecord,
};

/// Build the fragment that replaces a section's marker.
pub fn section_fragment(data: &SectionData<'_>) -> String {
    match data {
        SectionData::Education(records) => join(records.iter().map(entry_education), "\n\n"),
        SectionData::Experience(records) => join(records.iter().map(entry_experience), "\n\n"),
        SectionData::Volunteering(records) => {
            join(records.iter().map(entry_volunteering), "\n\n")
        }
        SectionData::Skills(categories) => entry_skills(categories),
        SectionData::Languages(languages) => entry_languages(languages),
        SectionData::Hobbies(hobbies) => hobbies.iter().map(|h| entry_hobby(h)).collect(),
        SectionData::Projects(groups) => entry_projects(groups),
        SectionData::Publications(records) => {
            join(records.iter().map(entry_publication), "\n\n")
        }
        SectionData::Honors(records) => join(records.iter().map(entry_honor), "\n"),
    }
}

fn join(fragments: impl Iterator<Item = String>, sep: &str) -> String {
    fragments.collect::<Vec<_>>().join(sep)
}

/// Optional text counts as present only when non-empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_items(out: &mut String, text: &Text) {
    match text {
        Text::One(item) => push_line(out, &format!(r"\item {item}")),
        Text::Many(items) => {
            for item in items {
                push_line(out, &format!(r"\item {item}"));
            }
        }
    }
}

fn push_heading(out: &mut String, title: &str, descriptor: &str, duration: &str, location: &str) {
    push_line(out, r"\sectionsep");
    push_line(out, &format!(r"\runsubsection{{{title}}}"));
    push_line(out, &format!(r"\descript{{| {descriptor}}}"));
    push_line(out, &format!(r"\location{{{duration} | {location}}}"));
}

pub fn entry_experience(record: &ExperienceRecord) -> String {
    let summary = match &record.summary_in_resume {
        Some(text) if !text.is_empty() => text,
        _ => &record.summary,
    }
    .linkify();

    let mut out = String::new();
    push_heading(
        &mut out,
        &record.company,
        &record.position,
        &record.duration,
        &record.location,
    );
    push_line(&mut out, r"\vspace{\topsep}");
    push_line(&mut out, r"\begin{tightemize}");
    push_line(&mut out, r"\sectionsep");
    push_items(&mut out, &summary);
    push_line(&mut out, r"\end{tightemize}");
    out.push_str(r"\sectionsep");
    out
}

pub fn entry_volunteering(record: &VolunteeringRecord) -> String {
    let mut out = String::new();
    push_heading(
        &mut out,
        &record.organization,
        &record.role,
        &record.duration,
        &record.location,
    );
    push_line(&mut out, r"\begin{tightemize}");
    for detail in &record.details {
        push_line(&mut out, &format!(r"\item {detail}"));
    }
    push_line(&mut out, r"\end{tightemize}");
    out.push_str(r"\sectionsep");
    out
}

pub fn entry_education(record: &EducationRecord) -> String {
    let mut out = String::new();
    push_line(&mut out, r"\sectionsep");
    push_line(&mut out, &format!(r"\runsubsection{{{}}}", record.institution));
    match &record.degree {
        Degree::Single(degree) => push_line(&mut out, &format!(r"\descript{{| {degree}}}")),
        Degree::Multi { primary, secondary } => {
            push_line(&mut out, &format!(r"\descript{{| {primary}}}"));
            let secondary: Vec<String> = secondary
                .iter()
                .map(|item| format!(r"\descript{{{item}}}"))
                .collect();
            push_line(&mut out, &secondary.join("\n"));
        }
    }
    push_line(
        &mut out,
        &format!(r"\location{{{} | {}}}", record.duration, record.location),
    );
    push_line(&mut out, r"\begin{tightemize}");
    push_line(
        &mut out,
        &format!(
            r"\item Activities and societies: {}.",
            record.activities.join(", ")
        ),
    );
    match &record.description {
        Some(Text::One(description)) => {
            push_line(&mut out, &format!(r"\item{{| {description}}}"));
        }
        Some(Text::Many(items)) => {
            for item in items {
                push_line(&mut out, &format!(r"\item {item}"));
            }
        }
        None => {}
    }
    push_line(&mut out, r"\end{tightemize}");
    out.push_str(r"\sectionsep");
    out
}

pub fn entry_skills(categories: &[SkillCategory]) -> String {
    let mut out = String::new();
    for category in categories {
        for (name, body) in category.iter() {
            push_line(&mut out, &format!(r"\subsection{{{name}}}"));
            push_line(&mut out, r"\sectionsep");
            match body {
                SkillBody::Grouped(groups) => {
                    for (label, items) in groups.iter() {
                        push_line(&mut out, &format!(r"\location{{{label}:}}"));
                        push_line(&mut out, &format!(r"{} \\", items.join(r" \textbullet{} ")));
                        push_line(&mut out, r"\sectionsep");
                    }
                }
                SkillBody::Flat(items) => {
                    push_line(&mut out, &format!(r"{} \\", items.join(r" \textbullet{} ")));
                }
            }
            push_line(&mut out, r"\sectionsep");
        }
    }
    out
}

pub fn entry_languages(languages: &[LanguageRecord]) -> String {
    let mut out = String::new();
    for record in languages {
        out.push('\n');
        push_line(&mut out, &format!(r"\subsection{{{}}}", record.language));
        push_line(&mut out, r"\sectionsep");
        push_line(&mut out, &record.proficiency);
        push_line(&mut out, r"\sectionsep");
        push_line(&mut out, r"\sectionsep");
    }
    out
}

pub fn entry_hobby(hobby: &str) -> String {
    format!("\\subsection{{{hobby}}}\\sectionsep\n")
}

/// Render one project.
///
/// Returns the fragment (empty for hidden projects) and the updated
/// "first project" flag. The flag is cleared by the first project that
/// prints a location line, which also gets the extra `\vspace`.
pub fn entry_project(project: &ProjectRecord, first_project: bool) -> (String, bool) {
    if !project.show_on_resume {
        return (String::new(), first_project);
    }

    let mut first_project = first_project;
    let mut out = String::new();
    push_line(&mut out, &format!(r"\runsubsection{{{}}}", project.title));

    if let Some(website) = present(project.website.as_deref()) {
        push_line(&mut out, &format!(r"\descript{{| {website}}}"));
    }
    if let Some(designation) = present(project.designation.as_deref()) {
        push_line(&mut out, &format!(r"\descript{{| {designation}}}"));
    }

    let location = present(project.location.as_deref());
    let duration = present(project.duration.as_deref());
    if location.is_some() || duration.is_some() {
        push_line(
            &mut out,
            &format!(
                r"\location{{{} | {}}}",
                duration.unwrap_or_default(),
                location.unwrap_or_default()
            ),
        );
        if first_project {
            push_line(&mut out, r"\vspace{\topsep}");
            first_project = false;
        }
    }

    push_line(&mut out, r"\begin{tightemize}");
    push_line(&mut out, r"\sectionsep");
    // A present `description_resume` key wins even when it is null.
    let description = match &project.description_resume {
        Some(resume_description) => resume_description.as_ref(),
        None => project.description.as_ref(),
    };
    if let Some(description) = description {
        push_items(&mut out, &description.linkify());
    }
    push_line(&mut out, r"\end{tightemize}");
    push_line(&mut out, r"\sectionsep");

    (out, first_project)
}

/// Render every group's projects, in order, as one fragment.
pub fn entry_projects(groups: &OrderedMap<Vec<ProjectRecord>>) -> String {
    let (out, _) = groups.values().flatten().fold(
        (String::new(), true),
        |(mut out, first_project), project| {
            let (fragment, first_project) = entry_project(project, first_project);
            if !fragment.is_empty() {
                out.push_str(&fragment);
                out.push('\n');
            }
            (out, first_project)
        },
    );
    out
}

/// Expects a record whose links were already converted.
pub fn entry_publication(record: &PublicationRecord) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!(r"\runsubsection{{{}}}", record.title));

    if let Some(date) = present(record.date.as_deref()) {
        push_line(&mut out, &format!(r"\descript{{| {date}}}"));
    }

    let journal = present(record.journal.as_deref());
    let impact_factor = present(record.impact_factor.as_deref());
    if journal.is_some() || impact_factor.is_some() {
        push_line(
            &mut out,
            &format!(
                r"\location{{ {} (Impact Factor: {}) }}",
                journal.unwrap_or_default(),
                impact_factor.unwrap_or_default()
            ),
        );
    }

    push_line(&mut out, r"\begin{tightemize}");
    push_line(&mut out, r"\sectionsep");
    for detail in &record.details {
        push_line(&mut out, &format!(r"\item {detail}"));
    }
    push_line(&mut out, r"\end{tightemize}");
    out
}

/// Expects a record whose links were already converted.
pub fn entry_honor(record: &HonorRecord) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!(r"\runsubsection{{{}}}", record.title));

    if let Some(date) = present(record.date.as_deref()) {
        push_line(&mut out, &format!(r"\descript{{| {date}}}"));
    }
    if let Some(issuer) = present(record.issued_by.as_deref()) {
        push_line(&mut out, &format!(r"\location{{ Issued by {issuer} }}"));
    }

    push_line(&mut out, r"\begin{tightemize}");
    push_line(&mut out, r"\sectionsep");
    push_items(&mut out, &record.details);
    push_line(&mut out, r"\sectionsep");
    push_line(&mut out, r"\end{tightemize}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;

    fn experience(summary: Text, summary_in_resume: Option<Text>) -> ExperienceRecord {
        ExperienceRecord {
            company: "Acme".into(),
            position: "Engineer".into(),
            duration: "2020-2022".into(),
            location: "Remote".into(),
            summary,
            summary_in_resume,
        }
    }

    fn education(degree: Degree, description: Option<Text>) -> EducationRecord {
        EducationRecord {
            institution: "MIT".into(),
            degree,
            duration: "2016-2020".into(),
            location: "Cambridge".into(),
            activities: vec!["Chess club".into(), "Rowing".into()],
            description,
        }
    }

    fn project(title: &str, show: bool, location: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            title: title.into(),
            show_on_resume: show,
            description_resume: None,
            description: Some(Text::One(format!("About {title}").into())),
            website: None,
            designation: None,
            location: location.map(Scalar::from),
            duration: None,
        }
    }

    #[test]
    fn experience_with_string_summary() {
        let record = experience(Text::One("Built [things](http://x.com)".into()), None);
        assert_eq!(
            entry_experience(&record),
            "\\sectionsep\n\
             \\runsubsection{Acme}\n\
             \\descript{| Engineer}\n\
             \\location{2020-2022 | Remote}\n\
             \\vspace{\\topsep}\n\
             \\begin{tightemize}\n\
             \\sectionsep\n\
             \\item Built \\href{http://x.com}{things}\n\
             \\end{tightemize}\n\
             \\sectionsep"
        );
    }

    #[test]
    fn experience_prefers_resume_summary() {
        let record = experience(
            Text::One("Long summary".into()),
            Some(Text::Many(vec!["Shipped".into(), "Led".into()])),
        );
        let out = entry_experience(&record);
        assert!(out.contains("\\item Shipped\n\\item Led\n\\end{tightemize}"));
        assert!(!out.contains("Long summary"));
    }

    #[test]
    fn experience_ignores_empty_resume_summary() {
        let record = experience(Text::One("Kept".into()), Some(Text::Many(vec![])));
        assert!(entry_experience(&record).contains("\\item Kept\n"));
    }

    #[test]
    fn volunteering_lists_details() {
        let record = VolunteeringRecord {
            organization: "Red Cross".into(),
            role: "Helper".into(),
            duration: "2019".into(),
            location: "Berlin".into(),
            details: vec!["First aid".into(), "Logistics".into()],
        };
        assert_eq!(
            entry_volunteering(&record),
            "\\sectionsep\n\
             \\runsubsection{Red Cross}\n\
             \\descript{| Helper}\n\
             \\location{2019 | Berlin}\n\
             \\begin{tightemize}\n\
             \\item First aid\n\
             \\item Logistics\n\
             \\end{tightemize}\n\
             \\sectionsep"
        );
    }

    #[test]
    fn education_without_description() {
        let out = entry_education(&education(Degree::Single("BSc".into()), None));
        assert_eq!(
            out,
            "\\sectionsep\n\
             \\runsubsection{MIT}\n\
             \\descript{| BSc}\n\
             \\location{2016-2020 | Cambridge}\n\
             \\begin{tightemize}\n\
             \\item Activities and societies: Chess club, Rowing.\n\
             \\end{tightemize}\n\
             \\sectionsep"
        );
    }

    #[test]
    fn education_with_degree_list() {
        let degree = Degree::Multi {
            primary: "BSc Physics".into(),
            secondary: vec!["Minor in Maths".into(), "Honours".into()],
        };
        let out = entry_education(&education(degree, None));
        assert!(out.contains(
            "\\descript{| BSc Physics}\n\\descript{Minor in Maths}\n\\descript{Honours}\n\\location"
        ));
    }

    #[test]
    fn education_description_shapes() {
        let single = entry_education(&education(
            Degree::Single("BSc".into()),
            Some(Text::One("Thesis on optics".into())),
        ));
        assert!(single.contains("\\item{| Thesis on optics}\n\\end{tightemize}"));

        let list = entry_education(&education(
            Degree::Single("BSc".into()),
            Some(Text::Many(vec!["GPA 4.0".into(), "Dean's list".into()])),
        ));
        assert!(list.contains("\\item GPA 4.0\n\\item Dean's list\n\\end{tightemize}"));
    }

    #[test]
    fn skills_grouped_and_flat() {
        let grouped: SkillCategory = serde_yaml::from_str(
            "Programming:\n  Languages: [Rust, Go]\n  Tools: [Git]\n",
        )
        .unwrap();
        let flat: SkillCategory = serde_yaml::from_str("Soft: [Writing, Mentoring]\n").unwrap();

        assert_eq!(
            entry_skills(&[grouped, flat]),
            "\\subsection{Programming}\n\
             \\sectionsep\n\
             \\location{Languages:}\n\
             Rust \\textbullet{} Go \\\\\n\
             \\sectionsep\n\
             \\location{Tools:}\n\
             Git \\\\\n\
             \\sectionsep\n\
             \\sectionsep\n\
             \\subsection{Soft}\n\
             \\sectionsep\n\
             Writing \\textbullet{} Mentoring \\\\\n\
             \\sectionsep\n"
        );
    }

    #[test]
    fn languages_get_a_subsection_each() {
        let languages = [
            LanguageRecord {
                language: "English".into(),
                proficiency: "Native".into(),
            },
            LanguageRecord {
                language: "German".into(),
                proficiency: "B2".into(),
            },
        ];
        assert_eq!(
            entry_languages(&languages),
            "\n\\subsection{English}\n\\sectionsep\nNative\n\\sectionsep\n\\sectionsep\n\
             \n\\subsection{German}\n\\sectionsep\nB2\n\\sectionsep\n\\sectionsep\n"
        );
    }

    #[test]
    fn hobbies_have_no_body() {
        let hobbies: [Scalar; 2] = ["Chess".into(), "Hiking".into()];
        assert_eq!(
            section_fragment(&SectionData::Hobbies(&hobbies)),
            "\\subsection{Chess}\\sectionsep\n\\subsection{Hiking}\\sectionsep\n"
        );
    }

    #[test]
    fn hidden_project_leaves_flag_alone() {
        let (out, first) = entry_project(&project("Secret", false, Some("Home")), true);
        assert!(out.is_empty());
        assert!(first);
    }

    #[test]
    fn project_full_layout() {
        let record = ProjectRecord {
            title: "Site".into(),
            show_on_resume: true,
            description_resume: Some(Some(Text::Many(vec![
                "Uses [Nuxt](https://nuxt.com)".into(),
                "Static".into(),
            ]))),
            description: Some(Text::One("ignored".into())),
            website: Some("example.com".into()),
            designation: Some("Author".into()),
            location: Some("Online".into()),
            duration: Some(Scalar::from("2023")),
        };
        let (out, first) = entry_project(&record, true);
        assert!(!first);
        assert_eq!(
            out,
            "\\runsubsection{Site}\n\
             \\descript{| example.com}\n\
             \\descript{| Author}\n\
             \\location{2023 | Online}\n\
             \\vspace{\\topsep}\n\
             \\begin{tightemize}\n\
             \\sectionsep\n\
             \\item Uses \\href{https://nuxt.com}{Nuxt}\n\
             \\item Static\n\
             \\end{tightemize}\n\
             \\sectionsep\n"
        );
    }

    #[test]
    fn project_without_location_keeps_flag() {
        let (out, first) = entry_project(&project("Lib", true, None), true);
        assert!(first);
        assert!(!out.contains("\\location"));
        assert!(!out.contains("\\vspace"));
    }

    #[test]
    fn duration_alone_prints_location_line_and_spacing() {
        let record = ProjectRecord {
            duration: Some(Scalar::from("2024")),
            ..project("Timed", true, None)
        };
        let (out, first) = entry_project(&record, true);
        assert!(!first);
        assert!(out.contains("\\location{2024 | }\n\\vspace{\\topsep}\n"));

        let (out, first) = entry_project(&record, false);
        assert!(!first);
        assert!(!out.contains("\\vspace"));
    }

    #[test]
    fn null_resume_description_suppresses_fallback() {
        let record = ProjectRecord {
            description_resume: Some(None),
            ..project("Quiet", true, None)
        };
        let (out, _) = entry_project(&record, true);
        assert!(!out.contains("\\item"));
        assert!(!out.contains("About Quiet"));
    }

    #[test]
    fn numeric_skill_items_are_joined() {
        let skills: SkillCategory = serde_yaml::from_str("Versions: [Python, 3]").unwrap();
        assert_eq!(
            entry_skills(&[skills]),
            "\\subsection{Versions}\n\\sectionsep\nPython \\textbullet{} 3 \\\\\n\\sectionsep\n"
        );
    }

    #[test]
    fn extra_spacing_only_once_across_groups() {
        let groups: OrderedMap<Vec<ProjectRecord>> = [
            (
                "web",
                vec![
                    project("Hidden", false, Some("A")),
                    project("NoPlace", true, None),
                ],
            ),
            (
                "tools",
                vec![project("First", true, Some("B")), project("Second", true, Some("C"))],
            ),
        ]
        .into_iter()
        .collect();

        let out = entry_projects(&groups);
        assert_eq!(out.matches("\\vspace{\\topsep}").count(), 1);
        assert!(out.contains("\\location{ | B}\n\\vspace{\\topsep}\n"));
        assert!(!out.contains("Hidden"));

        let order: Vec<usize> = ["NoPlace", "First", "Second"]
            .iter()
            .map(|title| out.find(title).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn publication_optional_lines() {
        let bare = PublicationRecord {
            title: "Paper".into(),
            date: None,
            journal: None,
            impact_factor: None,
            details: vec!["Co-author".into()],
        };
        assert_eq!(
            entry_publication(&bare),
            "\\runsubsection{Paper}\n\
             \\begin{tightemize}\n\
             \\sectionsep\n\
             \\item Co-author\n\
             \\end{tightemize}\n"
        );

        let full = PublicationRecord {
            date: Some("2021".into()),
            journal: Some("Nature".into()),
            impact_factor: Some("49.9".into()),
            ..bare
        };
        let out = entry_publication(&full);
        assert!(out.contains("\\descript{| 2021}\n\\location{ Nature (Impact Factor: 49.9) }\n"));
    }

    #[test]
    fn honor_layout() {
        let record = HonorRecord {
            title: "Award".into(),
            date: Some("2022".into()),
            issued_by: Some("ACM".into()),
            details: Text::One("For service".into()),
        };
        assert_eq!(
            entry_honor(&record),
            "\\runsubsection{Award}\n\
             \\descript{| 2022}\n\
             \\location{ Issued by ACM }\n\
             \\begin{tightemize}\n\
             \\sectionsep\n\
             \\item For service\n\
             \\sectionsep\n\
             \\end{tightemize}\n"
        );
    }

    #[test]
    fn honors_join_with_single_newline() {
        let honor = |title: &str| HonorRecord {
            title: title.into(),
            date: None,
            issued_by: None,
            details: Text::Many(vec![]),
        };
        let honors = [honor("A"), honor("B")];
        let out = section_fragment(&SectionData::Honors(&honors));
        assert!(out.contains("\\end{tightemize}\n\n\\runsubsection{B}"));
        assert!(!out.ends_with("\n\n"));
    }
}
