//! Word lists behind the classifiers and extractors.
//!
//! All entries are lowercase and compared against tokens produced by
//! [`tokens`], which strips surrounding punctuation but keeps internal
//! characters (`c++`, `node.js`, `ci/cd`).

/// Legal-form suffixes. A line carrying one of these is almost always a company.
pub const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "llp",
    "lp",
    "ltd",
    "limited",
    "corp",
    "corporation",
    "co",
    "company",
    "gmbh",
    "plc",
    "pty",
    "pvt",
    "ag",
];

/// Industry words that usually close a company name but also appear in
/// titles ("Software Engineer", "Systems Analyst"), so they only count when
/// the text carries no role noun.
pub const INDUSTRY_WORDS: &[&str] = &[
    "technologies",
    "technology",
    "solutions",
    "systems",
    "software",
    "labs",
    "group",
    "consulting",
    "partners",
    "holdings",
    "enterprises",
    "industries",
    "services",
    "studios",
    "ventures",
    "networks",
    "media",
    "bank",
    "agency",
    "associates",
    "capital",
    "international",
    "global",
];

/// Role nouns that mark a line as a job title.
pub const ROLE_NOUNS: &[&str] = &[
    "engineer",
    "developer",
    "programmer",
    "manager",
    "director",
    "analyst",
    "designer",
    "architect",
    "consultant",
    "specialist",
    "coordinator",
    "administrator",
    "scientist",
    "researcher",
    "intern",
    "officer",
    "president",
    "vp",
    "cto",
    "ceo",
    "cfo",
    "coo",
    "cio",
    "founder",
    "co-founder",
    "cofounder",
    "owner",
    "technician",
    "assistant",
    "representative",
    "executive",
    "strategist",
    "advisor",
    "supervisor",
    "accountant",
    "editor",
    "writer",
    "teacher",
    "instructor",
    "tutor",
    "nurse",
    "recruiter",
    "associate",
    "lead",
    "head",
    "partner",
    "contractor",
    "freelancer",
    "fellow",
    "sre",
    "devops",
    "tester",
];

/// Seniority prefixes. On their own they are a weak title signal.
pub const SENIORITY_PREFIXES: &[&str] = &[
    "senior",
    "sr",
    "junior",
    "jr",
    "lead",
    "principal",
    "staff",
    "chief",
    "head",
    "vice",
    "associate",
    "assistant",
    "graduate",
    "entry-level",
    "mid-level",
];

/// Past-tense verbs that open achievement statements.
pub const ACHIEVEMENT_VERBS: &[&str] = &[
    "developed",
    "improved",
    "led",
    "managed",
    "built",
    "designed",
    "implemented",
    "created",
    "increased",
    "reduced",
    "decreased",
    "launched",
    "delivered",
    "architected",
    "optimized",
    "established",
    "drove",
    "spearheaded",
    "mentored",
    "coordinated",
    "automated",
    "streamlined",
    "collaborated",
    "achieved",
    "maintained",
    "migrated",
    "deployed",
    "analyzed",
    "authored",
    "owned",
    "scaled",
    "shipped",
    "negotiated",
    "trained",
    "supervised",
    "oversaw",
    "generated",
    "resolved",
    "wrote",
    "integrated",
    "refactored",
    "introduced",
    "saved",
    "grew",
    "won",
    "handled",
    "supported",
    "conducted",
    "organized",
    "partnered",
];

/// Nouns that appear in job descriptions but rarely anywhere else.
pub const JOB_TERMS: &[&str] = &[
    "responsible",
    "responsibilities",
    "team",
    "teams",
    "client",
    "clients",
    "customer",
    "customers",
    "stakeholders",
    "project",
    "projects",
    "role",
    "reporting",
    "worked",
    "working",
];

/// Degree tokens after normalization (dots and possessive `'s` removed).
pub const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor",
    "bachelors",
    "master",
    "masters",
    "phd",
    "doctorate",
    "doctoral",
    "associate",
    "associates",
    "certificate",
    "diploma",
    "mba",
    "bs",
    "ba",
    "ms",
    "ma",
    "bsc",
    "msc",
    "beng",
    "meng",
    "btech",
    "mtech",
    "bba",
    "bfa",
    "mfa",
    "jd",
    "md",
    "ged",
];

pub const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
    "conservatory",
    "universidad",
    "université",
    "universität",
];

pub const PROGRAMMING_LANGUAGES: &[&str] = &[
    "rust",
    "python",
    "java",
    "javascript",
    "typescript",
    "go",
    "golang",
    "c",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "sql",
    "html",
    "css",
    "r",
    "perl",
    "haskell",
    "elixir",
    "erlang",
    "clojure",
    "dart",
    "bash",
    "shell",
    "matlab",
    "lua",
    "objective-c",
    "f#",
    "julia",
    "solidity",
    "zig",
];

pub const TOOLS: &[&str] = &[
    "git",
    "github",
    "gitlab",
    "docker",
    "kubernetes",
    "k8s",
    "jenkins",
    "jira",
    "confluence",
    "aws",
    "azure",
    "gcp",
    "terraform",
    "ansible",
    "linux",
    "postgresql",
    "postgres",
    "mysql",
    "mongodb",
    "redis",
    "kafka",
    "rabbitmq",
    "elasticsearch",
    "figma",
    "sketch",
    "excel",
    "tableau",
    "power bi",
    "vscode",
    "vim",
    "webpack",
    "npm",
    "cargo",
    "nginx",
    "grafana",
    "prometheus",
    "datadog",
    "salesforce",
    "photoshop",
    "snowflake",
    "airflow",
    "circleci",
    "github actions",
];

pub const TECHNICAL_TERMS: &[&str] = &[
    "react",
    "angular",
    "vue",
    "svelte",
    "node.js",
    "nodejs",
    "node",
    "next.js",
    "django",
    "flask",
    "fastapi",
    "spring",
    "spring boot",
    "rails",
    "express",
    "graphql",
    "rest",
    "grpc",
    "microservices",
    "machine learning",
    "deep learning",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "ci/cd",
    "agile",
    "scrum",
    "devops",
    "data analysis",
    "distributed systems",
    "api design",
    "cloud computing",
    "nlp",
    "computer vision",
    "tokio",
    "axum",
    ".net",
    "unity",
    "spark",
    "hadoop",
];

/// Phrases that mark a skills token as prose rather than a skill.
pub const FILLER_PHRASES: &[&str] = &[
    "years of experience",
    "year of experience",
    "proficient in",
    "experience with",
    "experience in",
    "knowledge of",
    "familiar with",
    "skilled in",
    "expertise in",
    "ability to",
    "strong understanding",
    "working knowledge",
];

pub const COUNTRIES: &[&str] = &[
    "usa",
    "united states",
    "canada",
    "mexico",
    "brazil",
    "argentina",
    "uk",
    "united kingdom",
    "england",
    "scotland",
    "ireland",
    "germany",
    "france",
    "spain",
    "portugal",
    "italy",
    "netherlands",
    "belgium",
    "switzerland",
    "austria",
    "sweden",
    "norway",
    "denmark",
    "finland",
    "poland",
    "ukraine",
    "romania",
    "greece",
    "turkey",
    "israel",
    "egypt",
    "nigeria",
    "kenya",
    "south africa",
    "india",
    "pakistan",
    "bangladesh",
    "china",
    "japan",
    "korea",
    "south korea",
    "singapore",
    "vietnam",
    "thailand",
    "indonesia",
    "philippines",
    "malaysia",
    "australia",
    "new zealand",
    "uae",
    "united arab emirates",
    "saudi arabia",
];

/// Splits text into lowercase tokens with surrounding punctuation removed.
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '|' | '(' | ')'))
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Lowercases a token and drops dots and possessive `'s`, so `B.S.`,
/// `Master's` and `Ph.D.` become `bs`, `master` and `phd`.
pub fn normalize_degree_token(token: &str) -> String {
    let lower = token.to_lowercase().replace(['’', '`'], "'");
    let lower = lower.strip_suffix("'s").unwrap_or(&lower);
    lower
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Returns the first entry of `list` present among `tokens`.
pub fn first_in<'a>(tokens: &[String], list: &[&'a str]) -> Option<&'a str> {
    tokens
        .iter()
        .find_map(|t| list.iter().find(|&&w| w == t.as_str()).copied())
}

pub fn contains_any(tokens: &[String], list: &[&str]) -> bool {
    first_in(tokens, list).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strip_surrounding_punctuation() {
        assert_eq!(tokens("Google Inc., (Remote)"), vec!["google", "inc", "remote"]);
    }

    #[test]
    fn test_tokens_keep_language_symbols() {
        assert_eq!(tokens("C++ / C#"), vec!["c++", "c#"]);
    }

    #[test]
    fn test_normalize_degree_token() {
        assert_eq!(normalize_degree_token("B.S."), "bs");
        assert_eq!(normalize_degree_token("Master's"), "master");
        assert_eq!(normalize_degree_token("Ph.D."), "phd");
    }

    #[test]
    fn test_first_in_returns_list_entry() {
        let t = tokens("Principal Engineer");
        assert_eq!(first_in(&t, ROLE_NOUNS), Some("engineer"));
        assert_eq!(first_in(&t, LEGAL_SUFFIXES), None);
    }
}
