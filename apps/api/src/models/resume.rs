use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profession: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: String,
}

/// Paid work: jobs, internships, freelance roles. Dates are `yyyy-MM`, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub graduation_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gpa: String,
}

/// The user-editable body of a resume. Stored as the `content` JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub professional_summary: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
}

impl ResumeContent {
    /// Top-level keys that make up the content shape.
    pub const FIELDS: &'static [&'static str] = &[
        "professional_summary",
        "skills",
        "personal_info",
        "experience",
        "project",
        "education",
    ];
}

/// A persisted resume, including bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub title: String,
    pub public: bool,
    #[serde(flatten)]
    pub content: ResumeContent,
    #[serde(rename = "__v")]
    pub version: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn new(user_id: Uuid, title: String, content: ResumeContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            public: false,
            content,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read view of a resume: bookkeeping fields stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub title: String,
    pub public: bool,
    #[serde(flatten)]
    pub content: ResumeContent,
}

impl From<Resume> for ResumeView {
    fn from(resume: Resume) -> Self {
        Self {
            id: resume.id,
            user_id: resume.user_id,
            title: resume.title,
            public: resume.public,
            content: resume.content,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub public: bool,
    pub content: Json<ResumeContent>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            public: row.public,
            content: row.content.0,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial update: each supplied top-level field replaces the stored one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub public: Option<bool>,
    pub professional_summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub project: Option<Vec<ProjectEntry>>,
    pub education: Option<Vec<EducationEntry>>,
}

impl ResumePatch {
    /// Keys the server owns. Clients echo them back on save; they are ignored.
    pub const SERVER_OWNED_KEYS: &'static [&'static str] = &[
        "_id",
        "id",
        "userId",
        "user_id",
        "__v",
        "version",
        "createdAt",
        "updatedAt",
    ];

    /// Deserializes a patch from an object, dropping server-owned keys first.
    /// Any other unknown key is an error.
    pub fn from_object(mut value: Value) -> Result<Self, serde_json::Error> {
        let Some(fields) = value.as_object_mut() else {
            return Err(serde_json::Error::custom("resume data must be a JSON object"));
        };
        for key in Self::SERVER_OWNED_KEYS {
            fields.remove(*key);
        }
        serde_json::from_value(value)
    }

    /// Applies the patch and bumps the bookkeeping fields.
    pub fn apply_to(self, resume: &mut Resume, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(public) = self.public {
            resume.public = public;
        }
        let content = &mut resume.content;
        if let Some(summary) = self.professional_summary {
            content.professional_summary = summary;
        }
        if let Some(skills) = self.skills {
            content.skills = skills;
        }
        if let Some(info) = self.personal_info {
            content.personal_info = info;
        }
        if let Some(experience) = self.experience {
            content.experience = experience;
        }
        if let Some(project) = self.project {
            content.project = project;
        }
        if let Some(education) = self.education {
            content.education = education;
        }
        resume.version += 1;
        resume.updated_at = now;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient deserializers. AI output is untrusted: numbers where strings are
// expected and nulls where lists are expected are common.
// ────────────────────────────────────────────────────────────────────────────

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) => Ok(s.trim().eq_ignore_ascii_case("true")),
        Some(other) => Err(D::Error::custom(format!(
            "expected a boolean, found {other}"
        ))),
    }
}

/// Accepts a list of scalars or a single comma-separated string.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(Ok(s)),
                Value::Number(n) => Some(Ok(n.to_string())),
                other => Some(Err(D::Error::custom(format!(
                    "expected a list of strings, found element {other}"
                )))),
            })
            .collect(),
        Some(other) => Err(D::Error::custom(format!(
            "expected a list of strings, found {other}"
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
