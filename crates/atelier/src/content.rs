//! Markdown content store for the studio site.
//!
//! Content lives in one directory per locale, split into sections:
//!
//! ```console
//! content/
//! ├── en/
//! │   ├── portfolio/*.md
//! │   └── news/*.md
//! └── sr/
//!     ├── portfolio/*.md
//!     └── news/*.md
//! ```
//!
//! [`ContentStore::load`] walks the tree once at startup. Frontmatter is parsed
//! leniently: older files use different field names for the same thing
//! (`thumbnail`/`image`, `services`/`tags`, `shortDescription`/`excerpt`) and
//! every field has a fallback, so a half-filled file still becomes a usable
//! entry. A file that cannot be read or whose frontmatter is not valid YAML is
//! skipped and recorded as an issue instead of failing the load.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use glob::glob;
use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use slug::slugify;

pub mod markdown;

pub use markdown::{SplitDocument, excerpt, render_html, split_frontmatter};

use crate::errors::ContentError;
use crate::locale::Locale;

const PORTFOLIO_PLACEHOLDER: &str = "/images/portfolio/placeholder.jpg";
const NEWS_PLACEHOLDER: &str = "/images/news/placeholder.jpg";
const DEFAULT_POST_CATEGORY: &str = "News";

/// Characters kept when deriving a project excerpt from its body.
const PROJECT_EXCERPT_CHARS: usize = 160;
/// Characters kept when deriving a post excerpt from its body.
const POST_EXCERPT_CHARS: usize = 200;
/// Most related projects returned for a single project page.
const RELATED_PROJECTS_LIMIT: usize = 3;

/// A portfolio project, one per markdown file under `{locale}/portfolio/`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub short_description: String,
    /// Body of the file, raw markdown.
    pub long_description: String,
    pub services: Vec<String>,
    pub industries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub thumbnail: String,
    pub gallery: Vec<String>,
    pub videos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_study_link: Option<String>,
    pub featured: bool,
}

/// A news post, one per markdown file under `{locale}/news/`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// `None` when the frontmatter date is missing or unparsable; such posts
    /// sort after every dated one.
    pub date: Option<NaiveDate>,
    pub excerpt: String,
    pub cover_image: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Body of the file, rendered to HTML.
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectFrontmatter {
    title: Option<String>,
    short_description: Option<String>,
    excerpt: Option<String>,
    services: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    category: Option<String>,
    industries: Option<Vec<String>>,
    client: Option<String>,
    year: Option<YearField>,
    location: Option<String>,
    thumbnail: Option<String>,
    image: Option<String>,
    gallery: Option<Vec<String>>,
    videos: Option<Vec<String>>,
    case_study_link: Option<String>,
    featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PostFrontmatter {
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
    cover_image: Option<String>,
    image: Option<String>,
    category: Option<String>,
    author: Option<String>,
}

/// A frontmatter year, however the author wrote it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum YearField {
    Int(i32),
    Float(f64),
    Text(String),
}

impl YearField {
    fn to_year(&self) -> Option<i32> {
        match self {
            YearField::Int(year) => Some(*year),
            YearField::Float(year) => Some(*year as i32),
            // Take the leading digits so "2024-05" or "2024 draft" still
            // count as 2024.
            YearField::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
        }
    }
}

/// All site content, loaded once and shared read-only afterwards.
pub struct ContentStore {
    projects: FxHashMap<Locale, Vec<Project>>,
    posts: FxHashMap<Locale, Vec<Post>>,
    issues: Vec<ContentError>,
}

impl ContentStore {
    /// Load every content file under `root`.
    ///
    /// A missing locale or section directory simply yields no entries. Files
    /// that fail to load are skipped and recorded in [`ContentStore::issues`].
    pub fn load(root: &Path) -> Self {
        let mut issues = Vec::new();
        let mut projects = FxHashMap::default();
        let mut posts = FxHashMap::default();

        for locale in Locale::ALL {
            projects.insert(locale, load_projects(root, locale, &mut issues));
            posts.insert(locale, load_posts(root, locale, &mut issues));
        }

        Self {
            projects,
            posts,
            issues,
        }
    }

    /// Projects for a locale, newest year first.
    pub fn projects(&self, locale: Locale) -> &[Project] {
        self.projects
            .get(&locale)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn project(&self, locale: Locale, slug: &str) -> Option<&Project> {
        self.projects(locale).iter().find(|p| p.slug == slug)
    }

    /// Posts for a locale, newest date first, undated posts last.
    pub fn posts(&self, locale: Locale) -> &[Post] {
        self.posts
            .get(&locale)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn post(&self, locale: Locale, slug: &str) -> Option<&Post> {
        self.posts(locale).iter().find(|p| p.slug == slug)
    }

    /// Every distinct service tag across a locale's projects, sorted.
    pub fn service_tags(&self, locale: Locale) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for project in self.projects(locale) {
            for service in &project.services {
                tags.insert(service.clone());
            }
        }
        tags.into_iter().collect()
    }

    /// Other projects of the same locale sharing at least one service tag,
    /// newest first, at most [`RELATED_PROJECTS_LIMIT`].
    pub fn related_projects(&self, locale: Locale, slug: &str) -> Vec<&Project> {
        let Some(project) = self.project(locale, slug) else {
            return Vec::new();
        };

        self.projects(locale)
            .iter()
            .filter(|candidate| {
                candidate.slug != slug
                    && candidate
                        .services
                        .iter()
                        .any(|service| project.services.contains(service))
            })
            .take(RELATED_PROJECTS_LIMIT)
            .collect()
    }

    /// Problems encountered while loading, in discovery order.
    pub fn issues(&self) -> &[ContentError] {
        &self.issues
    }
}

struct LoadedFile {
    path: PathBuf,
    slug: String,
    frontmatter: String,
    body: String,
}

fn load_projects(root: &Path, locale: Locale, issues: &mut Vec<ContentError>) -> Vec<Project> {
    let mut projects: Vec<Project> = read_section(root, locale, "portfolio", issues)
        .into_iter()
        .filter_map(|file| project_from_file(file, issues))
        .collect();

    // Stable sort, so projects of the same year keep their filename order.
    projects.sort_by(|a, b| b.year.cmp(&a.year));
    projects
}

fn load_posts(root: &Path, locale: Locale, issues: &mut Vec<ContentError>) -> Vec<Post> {
    let mut posts: Vec<Post> = read_section(root, locale, "news", issues)
        .into_iter()
        .filter_map(|file| post_from_file(file, issues))
        .collect();

    // Descending by date; `None < Some` puts undated posts last.
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

fn read_section(
    root: &Path,
    locale: Locale,
    section: &str,
    issues: &mut Vec<ContentError>,
) -> Vec<LoadedFile> {
    let pattern = root
        .join(locale.as_str())
        .join(section)
        .join("*.md")
        .to_string_lossy()
        .into_owned();

    let paths = match glob(&pattern) {
        Ok(paths) => paths,
        Err(source) => {
            issues.push(ContentError::ScanFailed { pattern, source });
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                issues.push(ContentError::ReadFailed {
                    path: err.path().to_path_buf(),
                    source: err.into_error(),
                });
                continue;
            }
        };

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) => {
                warn!("Skipping unreadable content file: {}", path.display());
                issues.push(ContentError::ReadFailed { path, source });
                continue;
            }
        };

        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let slug = slugify(stem);

        let split = split_frontmatter(&raw);
        files.push(LoadedFile {
            path,
            slug,
            frontmatter: split.frontmatter,
            body: split.body,
        });
    }

    files
}

fn parse_frontmatter<T: DeserializeOwned + Default>(
    file: &LoadedFile,
    issues: &mut Vec<ContentError>,
) -> Option<T> {
    if file.frontmatter.trim().is_empty() {
        return Some(T::default());
    }

    match serde_yaml::from_str(&file.frontmatter) {
        Ok(parsed) => Some(parsed),
        Err(source) => {
            warn!("Skipping content file with invalid frontmatter: {}", file.path.display());
            issues.push(ContentError::InvalidFrontmatter {
                path: file.path.clone(),
                source,
            });
            None
        }
    }
}

fn project_from_file(file: LoadedFile, issues: &mut Vec<ContentError>) -> Option<Project> {
    let fm: ProjectFrontmatter = parse_frontmatter(&file, issues)?;
    let body = file.body.trim();

    let services = fm
        .services
        .or(fm.tags)
        .or_else(|| fm.category.map(|category| vec![category]))
        .unwrap_or_default();

    Some(Project {
        slug: file.slug,
        title: fm.title.unwrap_or_default(),
        short_description: non_empty(fm.short_description)
            .or_else(|| non_empty(fm.excerpt))
            .unwrap_or_else(|| excerpt(body, PROJECT_EXCERPT_CHARS)),
        long_description: body.to_string(),
        services,
        industries: fm.industries.unwrap_or_default(),
        client: fm.client,
        year: fm
            .year
            .and_then(|year| year.to_year())
            .unwrap_or_else(|| chrono::Local::now().year()),
        location: fm.location,
        thumbnail: non_empty(fm.thumbnail)
            .or_else(|| non_empty(fm.image))
            .unwrap_or_else(|| PORTFOLIO_PLACEHOLDER.to_string()),
        gallery: fm.gallery.unwrap_or_default(),
        videos: fm.videos.unwrap_or_default(),
        case_study_link: fm.case_study_link,
        featured: fm.featured.unwrap_or(false),
    })
}

fn post_from_file(file: LoadedFile, issues: &mut Vec<ContentError>) -> Option<Post> {
    let fm: PostFrontmatter = parse_frontmatter(&file, issues)?;
    let body = file.body.trim();

    Some(Post {
        slug: file.slug,
        title: fm.title.unwrap_or_default(),
        date: fm.date.as_deref().and_then(parse_date),
        excerpt: non_empty(fm.excerpt).unwrap_or_else(|| excerpt(body, POST_EXCERPT_CHARS)),
        cover_image: non_empty(fm.cover_image)
            .or_else(|| non_empty(fm.image))
            .unwrap_or_else(|| NEWS_PLACEHOLDER.to_string()),
        category: non_empty(fm.category).unwrap_or_else(|| DEFAULT_POST_CATEGORY.to_string()),
        author: fm.author,
        content: render_html(body),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// An empty frontmatter value falls through to the next fallback, same as a
// missing one.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
