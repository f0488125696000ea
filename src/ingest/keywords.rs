// src/ingest/keywords.rs
//! Keyword gate: case-insensitive substring search over a fixed, ordered term list.
//!
//! Deliberately permissive. No stemming and no word boundaries, so "ai" also
//! hits "pairing" and "air". A missed posting costs more than a noisy alert.

/// Resume-derived terms used when no keyword file is configured.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "full stack",
    "full-stack",
    "fullstack",
    "frontend",
    "backend",
    "react",
    "typescript",
    "next.js",
    "nextjs",
    "tailwind",
    "shadcn",
    "c#",
    ".net",
    "dotnet",
    "blazor",
    "asp.net",
    "postgres",
    "postgresql",
    "supabase",
    "aws",
    "python",
    "c++",
    "tRPC",
    "prisma",
    "javascript",
    "node.js",
    "nodejs",
    "vue",
    "angular",
    "svelte",
    "swift",
    "kotlin",
    "docker",
    "kubernetes",
    "microservices",
    "api",
    "rest",
    "graphql",
    "mongodb",
    "redis",
    "elasticsearch",
    "machine learning",
    "ai",
    "data science",
    "devops",
    "git",
    "github",
    "gitlab",
    "ci/cd",
    "jenkins",
    "terraform",
    "cloud",
    "azure",
    "gcp",
    "serverless",
    "lambda",
    "k8s",
    "agile",
    "scrum",
];

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    terms: Vec<String>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl KeywordMatcher {
    /// Terms are lower-cased once; blank terms are dropped (they would match everything).
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// First matching term, in list order.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let s = text.to_lowercase();
        self.terms
            .iter()
            .find(|t| s.contains(t.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn matches_opt(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.matches(t))
    }

    /// Joins the present, non-empty parts with a space and matches the result.
    pub fn matches_any(&self, parts: &[Option<&str>]) -> bool {
        self.matches(&combine(parts))
    }
}

/// Space-joined concatenation of the non-empty parts.
pub fn combine(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
