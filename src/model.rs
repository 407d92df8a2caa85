use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_yaml::Value;

use crate::links;

/// A plain text value that also accepts YAML numbers and booleans.
///
/// `null` reads as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scalar(pub String);

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Scalar {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Scalar {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar(s.to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Scalar(s)),
            Value::Number(n) => Ok(Scalar(n.to_string())),
            Value::Bool(b) => Ok(Scalar(b.to_string())),
            Value::Null => Ok(Scalar::default()),
            other => Err(de::Error::custom(format!(
                "expected a string, number or boolean, found {}",
                shape_name(&other)
            ))),
        }
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// A mapping that keeps the order its keys appear in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        OrderedMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<Scalar, V>()? {
                    entries.push((key.0, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// A field that may hold one scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl Text {
    /// Rewrite Markdown links in every string of this value.
    pub fn linkify(&self) -> Text {
        match self {
            Text::One(s) => Text::One(links::convert(s).into_owned().into()),
            Text::Many(items) => Text::Many(
                items
                    .iter()
                    .map(|s| links::convert(s).into_owned().into())
                    .collect(),
            ),
        }
    }

    /// True for an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Text::One(s) => s.is_empty(),
            Text::Many(items) => items.is_empty(),
        }
    }
}

/// Degree line(s) of an education record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Text")]
pub enum Degree {
    Single(Scalar),
    Multi {
        primary: Scalar,
        secondary: Vec<Scalar>,
    },
}

impl TryFrom<Text> for Degree {
    type Error = String;

    fn try_from(text: Text) -> Result<Self, Self::Error> {
        match text {
            Text::One(s) => Ok(Degree::Single(s)),
            Text::Many(items) => {
                let mut items = items.into_iter();
                let primary = items
                    .next()
                    .ok_or_else(|| "degree list must not be empty".to_string())?;
                Ok(Degree::Multi {
                    primary,
                    secondary: items.collect(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExperienceRecord {
    pub company: Scalar,
    pub position: Scalar,
    pub duration: Scalar,
    pub location: Scalar,
    pub summary: Text,
    #[serde(default)]
    pub summary_in_resume: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolunteeringRecord {
    pub organization: Scalar,
    pub role: Scalar,
    pub duration: Scalar,
    pub location: Scalar,
    pub details: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EducationRecord {
    pub institution: Scalar,
    pub degree: Degree,
    pub duration: Scalar,
    pub location: Scalar,
    pub activities: Vec<Scalar>,
    #[serde(default)]
    pub description: Option<Text>,
}

/// Items of one skill category: either labeled groups or a single line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillBody {
    Flat(Vec<Scalar>),
    Grouped(OrderedMap<Vec<Scalar>>),
}

/// One entry of the skills list, `{category: body}`.
pub type SkillCategory = OrderedMap<SkillBody>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageRecord {
    pub language: Scalar,
    pub proficiency: Scalar,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectRecord {
    pub title: Scalar,
    #[serde(default)]
    pub show_on_resume: bool,
    /// `Some(None)` when the key is present but null; it still wins over `description`.
    #[serde(default, deserialize_with = "present_key")]
    pub description_resume: Option<Option<Text>>,
    #[serde(default)]
    pub description: Option<Text>,
    #[serde(default)]
    pub website: Option<Scalar>,
    #[serde(default)]
    pub designation: Option<Scalar>,
    #[serde(default)]
    pub location: Option<Scalar>,
    #[serde(default)]
    pub duration: Option<Scalar>,
}

fn present_key<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicationRecord {
    pub title: Scalar,
    #[serde(default)]
    pub date: Option<Scalar>,
    #[serde(default)]
    pub journal: Option<Scalar>,
    #[serde(default)]
    pub impact_factor: Option<Scalar>,
    pub details: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HonorRecord {
    pub title: Scalar,
    #[serde(default)]
    pub date: Option<Scalar>,
    #[serde(default)]
    pub issued_by: Option<Scalar>,
    pub details: Text,
}

/// Flat personal fields, substituted as `\key` tokens.
pub type Personal = OrderedMap<Scalar>;

/// List-based resume sections, each owning one template marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Education,
    Experience,
    Volunteering,
    Skills,
    Languages,
    Hobbies,
    Projects,
    Publications,
    Honors,
}

impl Section {
    /// Fill order used by the driver, after the personal fields.
    pub const ALL: [Section; 9] = [
        Section::Education,
        Section::Experience,
        Section::Volunteering,
        Section::Skills,
        Section::Languages,
        Section::Hobbies,
        Section::Projects,
        Section::Publications,
        Section::Honors,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Education => "Education",
            Section::Experience => "Experience",
            Section::Volunteering => "Volunteering",
            Section::Skills => "Skills",
            Section::Languages => "Languages",
            Section::Hobbies => "Hobbies",
            Section::Projects => "Projects",
            Section::Publications => "Publications",
            Section::Honors => "Honors",
        }
    }

    /// The comment line in the template replaced by this section's fragment.
    pub fn marker(self) -> String {
        format!("% {} goes here", self.title())
    }
}

/// Borrowed data for one list-based section.
#[derive(Debug, Clone, Copy)]
pub enum SectionData<'a> {
    Education(&'a [EducationRecord]),
    Experience(&'a [ExperienceRecord]),
    Volunteering(&'a [VolunteeringRecord]),
    Skills(&'a [SkillCategory]),
    Languages(&'a [LanguageRecord]),
    Hobbies(&'a [Scalar]),
    Projects(&'a OrderedMap<Vec<ProjectRecord>>),
    Publications(&'a [PublicationRecord]),
    Honors(&'a [HonorRecord]),
}

impl SectionData<'_> {
    pub fn section(&self) -> Section {
        match self {
            SectionData::Education(_) => Section::Education,
            SectionData::Experience(_) => Section::Experience,
            SectionData::Volunteering(_) => Section::Volunteering,
            SectionData::Skills(_) => Section::Skills,
            SectionData::Languages(_) => Section::Languages,
            SectionData::Hobbies(_) => Section::Hobbies,
            SectionData::Projects(_) => Section::Projects,
            SectionData::Publications(_) => Section::Publications,
            SectionData::Honors(_) => Section::Honors,
        }
    }
}

/// One substitution pass over the template.
#[derive(Debug, Clone, Copy)]
pub enum Substitution<'a> {
    Personal(&'a Personal),
    Section(SectionData<'a>),
}
