use super::Snapshot;
use crate::types::report::TechStack;
use serde_json::Value;

enum Category {
    Language,
    Infrastructure,
}

const INDICATORS: [(&str, &str, Category); 17] = [
    ("package.json", "Node.js", Category::Language),
    ("requirements.txt", "Python", Category::Language),
    ("pyproject.toml", "Python", Category::Language),
    ("Cargo.toml", "Rust", Category::Language),
    ("go.mod", "Go", Category::Language),
    ("pom.xml", "Java", Category::Language),
    ("build.gradle", "Java", Category::Language),
    ("Gemfile", "Ruby", Category::Language),
    ("composer.json", "PHP", Category::Language),
    ("Dockerfile", "Docker", Category::Infrastructure),
    ("docker-compose.yml", "Docker Compose", Category::Infrastructure),
    ("docker-compose.yaml", "Docker Compose", Category::Infrastructure),
    ("kubernetes", "Kubernetes", Category::Infrastructure),
    ("k8s", "Kubernetes", Category::Infrastructure),
    ("terraform", "Terraform", Category::Infrastructure),
    (".github/workflows", "GitHub Actions", Category::Infrastructure),
    (".gitlab-ci.yml", "GitLab CI", Category::Infrastructure),
];

const NODE_FRAMEWORKS: [(&str, &str); 7] = [
    ("react", "React"),
    ("vue", "Vue.js"),
    ("@angular/core", "Angular"),
    ("next", "Next.js"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("@nestjs/core", "NestJS"),
];

const PYTHON_FRAMEWORKS: [(&str, &str); 5] = [
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("celery", "Celery"),
    ("sqlalchemy", "SQLAlchemy"),
];

const DATABASE_MARKERS: [(&str, &str); 6] = [
    ("postgres", "PostgreSQL"),
    ("psycopg", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mongo", "MongoDB"),
    ("redis", "Redis"),
    ("sqlite", "SQLite"),
];

const DATABASE_SOURCES: [&str; 7] = [
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Cargo.toml",
    "go.mod",
    "docker-compose.yml",
    "docker-compose.yaml",
];

pub fn detect_stack(snapshot: &Snapshot) -> TechStack {
    let mut stack = TechStack::default();

    for (indicator, tech, category) in &INDICATORS {
        if snapshot.exists(indicator) {
            let list = match category {
                Category::Language => &mut stack.languages,
                Category::Infrastructure => &mut stack.infrastructure,
            };
            TechStack::add(list, tech);
        }
    }

    if stack.languages.iter().any(|lang| lang == "Node.js") {
        detect_node_frameworks(snapshot, &mut stack);
    }
    if stack.languages.iter().any(|lang| lang == "Python") {
        detect_python_frameworks(snapshot, &mut stack);
    }
    detect_databases(snapshot, &mut stack);

    stack
}

fn detect_node_frameworks(snapshot: &Snapshot, stack: &mut TechStack) {
    let Some(package) = snapshot
        .read_text_at("package.json")
        .and_then(|content| serde_json::from_str::<Value>(&content).ok())
    else {
        return;
    };

    let declared = |name: &str| {
        ["dependencies", "devDependencies"].iter().any(|section| {
            package
                .get(section)
                .and_then(Value::as_object)
                .map(|deps| deps.contains_key(name))
                .unwrap_or(false)
        })
    };

    for (dependency, framework) in NODE_FRAMEWORKS {
        if declared(dependency) {
            TechStack::add(&mut stack.frameworks, framework);
        }
    }
}

fn detect_python_frameworks(snapshot: &Snapshot, stack: &mut TechStack) {
    let content = ["requirements.txt", "pyproject.toml"]
        .iter()
        .filter_map(|file| snapshot.read_text_at(file))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    for (dependency, framework) in PYTHON_FRAMEWORKS {
        if content.contains(dependency) {
            TechStack::add(&mut stack.frameworks, framework);
        }
    }
}

fn detect_databases(snapshot: &Snapshot, stack: &mut TechStack) {
    let content = DATABASE_SOURCES
        .iter()
        .filter_map(|file| snapshot.read_text_at(file))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    for (marker, database) in DATABASE_MARKERS {
        if content.contains(marker) {
            TechStack::add(&mut stack.databases, database);
        }
    }
}
