//! Secret, injection, vulnerable dependency and weak crypto checks.

use super::{AnalysisContext, Analyzer, Tally};
use crate::error::{ReadinessError, Result};
use crate::scan::filesystem::display_path;
use crate::scan::{is_test_or_example, Snapshot};
use crate::types::finding::{Check, Dimension, Finding, Severity};
use crate::types::scoring::DimensionScore;
use regex::Regex;
use semver::Version;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const DIMENSION: Dimension = Dimension::Security;

const SECRET_SCAN_SUFFIXES: [&str; 10] = [
    ".py", ".js", ".ts", ".java", ".go", ".env", ".yml", ".yaml", ".json", ".toml",
];
const PATTERN_SCAN_SUFFIXES: [&str; 7] = [".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go"];
const AUTH_SCAN_SUFFIXES: [&str; 3] = [".py", ".js", ".ts"];
const CRYPTO_SCAN_SUFFIXES: [&str; 5] = [".py", ".js", ".ts", ".java", ".go"];

const SECRET_PENALTY: f64 = 15.0;
const SECRET_PATTERNS: [(&str, &str); 11] = [
    (
        r#"(?i)["']?api[_-]?key["']?\s*[:=]\s*["'][A-Za-z0-9+/]{20,}["']"#,
        "API Key",
    ),
    (
        r#"(?i)["']?secret["']?\s*[:=]\s*["'][A-Za-z0-9+/]{20,}["']"#,
        "Secret",
    ),
    (
        r#"(?i)["']?password["']?\s*[:=]\s*["'][^"']{8,}["']"#,
        "Password",
    ),
    (
        r#"(?i)["']?token["']?\s*[:=]\s*["'][A-Za-z0-9+/]{20,}["']"#,
        "Token",
    ),
    (r"(?i)aws_access_key_id\s*=\s*[A-Z0-9]{20}", "AWS Access Key"),
    (r"AKIA[0-9A-Z]{16}", "AWS Access Key ID"),
    (r"(?i)PRIVATE[_-]KEY", "Private Key Reference"),
    (
        r"-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----",
        "Private Key",
    ),
    (r"gh[pos]_[A-Za-z0-9]{36}", "GitHub Token"),
    (r"xox[baprs]-[A-Za-z0-9-]{10,}", "Slack Token"),
    (
        r"(?i)(postgres|postgresql|mysql|mongodb)://[^:\s/]+:[^@\s]+@",
        "Database Connection String",
    ),
];

const SECRET_CHECK: Check = Check {
    title: "Hardcoded secret detected",
    severity: Severity::Critical,
    description: "Potential secret found in source code",
    impact: "Credentials exposure could lead to unauthorized access",
    root_cause: "Secrets committed to version control",
    remediation: "Remove secret, rotate credentials, use secret management",
    validation: "Verify no secrets in git history, rotate affected credentials",
    effort_hours: 2.0,
    penalty: SECRET_PENALTY,
    references: &["OWASP Secrets Management Cheatsheet"],
};

const CODE_PATTERNS: [(&str, Check); 5] = [
    (
        r"(?i)exec\s*\(|eval\s*\(",
        Check {
            title: "Dangerous eval/exec usage",
            severity: Severity::High,
            description: "Use of eval() or exec() can lead to code injection",
            impact: "Remote code execution if user input reaches these functions",
            root_cause: "Dynamic code execution with potentially untrusted input",
            remediation: "Avoid eval/exec, use safe alternatives like ast.literal_eval",
            validation: "Review all dynamic execution points",
            effort_hours: 4.0,
            penalty: 10.0,
            references: &["CWE-95"],
        },
    ),
    (
        r"(?i)subprocess\.call\s*\([^)]*shell\s*=\s*True",
        Check {
            title: "Shell injection vulnerability",
            severity: Severity::High,
            description: "subprocess.call with shell=True is vulnerable to injection",
            impact: "Command injection if user input reaches shell",
            root_cause: "Using shell=True with untrusted input",
            remediation: "Use subprocess with shell=False and argument lists",
            validation: "Verify no user input reaches shell commands",
            effort_hours: 4.0,
            penalty: 10.0,
            references: &["CWE-78"],
        },
    ),
    (
        r"(?i)innerHTML\s*=",
        Check {
            title: "Potential XSS via innerHTML",
            severity: Severity::Medium,
            description: "Direct innerHTML assignment can lead to XSS",
            impact: "Cross-site scripting if user content is assigned",
            root_cause: "Unsafe DOM manipulation",
            remediation: "Use textContent or sanitize HTML before assignment",
            validation: "Verify all innerHTML assignments use sanitized content",
            effort_hours: 4.0,
            penalty: 5.0,
            references: &["CWE-79"],
        },
    ),
    (
        r"(?i)SELECT.*FROM.*WHERE.*\+|SELECT.*FROM.*%s",
        Check {
            title: "Potential SQL injection",
            severity: Severity::Critical,
            description: "String concatenation in SQL query detected",
            impact: "SQL injection allowing data theft or manipulation",
            root_cause: "Dynamic SQL query construction",
            remediation: "Use parameterized queries or ORM",
            validation: "Review all database queries for parameterization",
            effort_hours: 4.0,
            penalty: 20.0,
            references: &["CWE-89"],
        },
    ),
    (
        r#"(?i)DEBUG\s*=\s*True|"debug"\s*:\s*true"#,
        Check {
            title: "Debug mode enabled",
            severity: Severity::Medium,
            description: "Debug mode appears to be enabled",
            impact: "Information disclosure and potential security bypass",
            root_cause: "Debug configuration in production code",
            remediation: "Ensure debug mode is disabled in production",
            validation: "Verify debug flags are environment-controlled",
            effort_hours: 4.0,
            penalty: 5.0,
            references: &[],
        },
    ),
];

/// Bundled advisories: package, first fixed version, advisory id.
const KNOWN_VULNERABLE_PACKAGES: [(&str, &str, &str); 4] = [
    ("lodash", "4.17.21", "CVE-2021-23337"),
    ("axios", "0.21.1", "CVE-2020-28168"),
    ("minimist", "1.2.6", "CVE-2021-44906"),
    ("express", "4.17.3", "CVE-2022-24999"),
];

const VULNERABLE_DEPENDENCY_CHECK: Check = Check {
    title: "Vulnerable dependency",
    severity: Severity::High,
    description: "Known vulnerability in dependency",
    impact: "Could be exploited if vulnerability is in used code paths",
    root_cause: "Outdated dependency with known CVE",
    remediation: "Upgrade to a fixed version",
    validation: "Run dependency scanner after upgrade",
    effort_hours: 1.0,
    penalty: 10.0,
    references: &[],
};

const JWT_CHECK: Check = Check {
    title: "JWT without expiration",
    severity: Severity::High,
    description: "JWT implementation may lack expiration",
    impact: "Tokens remain valid indefinitely if stolen",
    root_cause: "Missing expiration claim in JWT",
    remediation: "Add 'exp' claim to all JWTs",
    validation: "Verify all JWTs include expiration",
    effort_hours: 2.0,
    penalty: 10.0,
    references: &["RFC 7519 section 4.1.4"],
};

const WEAK_CRYPTO: [(&str, &str, &str); 4] = [
    (r"\bMD5\b|\bmd5\b", "MD5", "SHA-256 or SHA-3"),
    (r"\bSHA1\b|\bsha1\b", "SHA-1", "SHA-256 or SHA-3"),
    (r"\bDES\b|\bdes\b", "DES", "AES-256"),
    (r"\bRC4\b|\brc4\b", "RC4", "AES-GCM"),
];

const WEAK_CRYPTO_CHECK: Check = Check {
    title: "Weak cryptographic algorithm",
    severity: Severity::High,
    description: "Cryptographically weak algorithm in use",
    impact: "Data may be vulnerable to cryptographic attacks",
    root_cause: "Use of deprecated cryptographic algorithm",
    remediation: "Replace with a modern algorithm",
    validation: "Verify no weak algorithms remain",
    effort_hours: 4.0,
    penalty: 10.0,
    references: &[],
};

fn compile_all<T: Copy>(
    patterns: &[(&str, T)],
) -> std::result::Result<Vec<(Regex, T)>, regex::Error> {
    patterns
        .iter()
        .map(|(pattern, payload)| Ok((Regex::new(pattern)?, *payload)))
        .collect()
}

fn compiled<T>(
    cell: &'static std::result::Result<Vec<T>, regex::Error>,
) -> Result<&'static [T]> {
    cell.as_deref()
        .map_err(|e| ReadinessError::InvalidPattern(e.to_string()))
}

type CompiledTable<T> = std::result::Result<Vec<(Regex, T)>, regex::Error>;

fn secret_regexes() -> Result<&'static [(Regex, &'static str)]> {
    static CELL: OnceLock<CompiledTable<&'static str>> = OnceLock::new();
    compiled(CELL.get_or_init(|| compile_all(&SECRET_PATTERNS)))
}

fn code_regexes() -> Result<&'static [(Regex, Check)]> {
    static CELL: OnceLock<CompiledTable<Check>> = OnceLock::new();
    compiled(CELL.get_or_init(|| compile_all(&CODE_PATTERNS)))
}

fn crypto_regexes() -> Result<&'static [(Regex, (&'static str, &'static str))]> {
    static CELL: OnceLock<CompiledTable<(&'static str, &'static str)>> = OnceLock::new();
    compiled(CELL.get_or_init(|| {
        let table: Vec<(&str, (&str, &str))> = WEAK_CRYPTO
            .iter()
            .map(|(pattern, algorithm, replacement)| (*pattern, (*algorithm, *replacement)))
            .collect();
        compile_all(&table)
    }))
}

pub struct SecurityAnalyzer;

impl Analyzer for SecurityAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        scan_secrets(snapshot, &mut tally)?;
        scan_code_patterns(snapshot, &mut tally)?;
        scan_dependency_advisories(snapshot, &mut tally);
        scan_jwt_expiry(snapshot, &mut tally);
        scan_weak_crypto(snapshot, &mut tally)?;
        Ok(tally.finish())
    }
}

fn scan_secrets(snapshot: &Snapshot, tally: &mut Tally) -> Result<()> {
    let regexes = secret_regexes()?;
    for path in snapshot.files_with_suffix(&SECRET_SCAN_SUFFIXES) {
        if is_test_or_example(path) {
            continue;
        }
        let Some(content) = snapshot.read_text(path) else {
            continue;
        };
        let location = display_path(path);
        for (regex, kind) in regexes {
            if regex.is_match(&content) {
                let finding = Finding {
                    title: format!("Hardcoded {kind} detected"),
                    description: format!("Potential {kind} found in source code"),
                    ..SECRET_CHECK.finding(DIMENSION, location.clone())
                };
                tally.record_finding(finding, SECRET_CHECK.penalty);
            }
        }
    }
    Ok(())
}

fn scan_code_patterns(snapshot: &Snapshot, tally: &mut Tally) -> Result<()> {
    let regexes = code_regexes()?;
    for (path, content) in snapshot.texts_with_suffix(&PATTERN_SCAN_SUFFIXES) {
        let location = display_path(path);
        for (regex, check) in regexes {
            if regex.is_match(&content) {
                tally.record(check, location.clone());
            }
        }
    }
    Ok(())
}

fn scan_dependency_advisories(snapshot: &Snapshot, tally: &mut Tally) {
    let Some(lock) = snapshot
        .read_text_at("package-lock.json")
        .and_then(|content| serde_json::from_str::<Value>(&content).ok())
    else {
        return;
    };

    for (package, version) in locked_packages(&lock) {
        let Some((_, fixed, advisory)) = KNOWN_VULNERABLE_PACKAGES
            .iter()
            .find(|(name, _, _)| *name == package)
        else {
            continue;
        };
        if !is_older_than(&version, fixed) {
            continue;
        }
        let finding = Finding {
            title: format!("Vulnerable dependency: {package}@{version}"),
            description: format!("Known vulnerability in {package}"),
            remediation: format!("Upgrade to version {fixed}"),
            references: vec![advisory.to_string()],
            ..VULNERABLE_DEPENDENCY_CHECK.finding(DIMENSION, "package-lock.json")
        };
        tally.record_finding(finding, VULNERABLE_DEPENDENCY_CHECK.penalty);
    }
}

/// (name, version) pairs from lockfile v1 `dependencies` and v2/v3 `packages`.
fn locked_packages(lock: &Value) -> BTreeSet<(String, String)> {
    let mut packages = BTreeSet::new();
    let version_of = |info: &Value| {
        info.get("version")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    };

    if let Some(deps) = lock.get("dependencies").and_then(Value::as_object) {
        for (name, info) in deps {
            packages.insert((name.clone(), version_of(info)));
        }
    }
    if let Some(entries) = lock.get("packages").and_then(Value::as_object) {
        for (key, info) in entries {
            if let Some((_, name)) = key.rsplit_once("node_modules/") {
                packages.insert((name.to_string(), version_of(info)));
            }
        }
    }
    packages
}

/// Unparseable versions count as vulnerable.
fn is_older_than(version: &str, fixed: &str) -> bool {
    let cleaned = version.trim().trim_start_matches(['v', '^', '~', '=']);
    match (Version::parse(cleaned), Version::parse(fixed)) {
        (Ok(found), Ok(fixed)) => found < fixed,
        _ => true,
    }
}

fn scan_jwt_expiry(snapshot: &Snapshot, tally: &mut Tally) {
    for (path, content) in snapshot.texts_with_suffix(&AUTH_SCAN_SUFFIXES) {
        let lowered = content.to_lowercase();
        let declares_expiry = lowered.contains("expires")
            || lowered.contains("\"exp\"")
            || lowered.contains("'exp'");
        if lowered.contains("jwt") && !declares_expiry {
            tally.record(&JWT_CHECK, display_path(path));
        }
    }
}

fn scan_weak_crypto(snapshot: &Snapshot, tally: &mut Tally) -> Result<()> {
    let regexes = crypto_regexes()?;
    for (path, content) in snapshot.texts_with_suffix(&CRYPTO_SCAN_SUFFIXES) {
        let location = display_path(path);
        for (regex, (algorithm, replacement)) in regexes {
            if regex.is_match(&content) {
                let finding = Finding {
                    title: format!("Weak cryptographic algorithm: {algorithm}"),
                    description: format!("{algorithm} is cryptographically weak"),
                    remediation: format!("Replace {algorithm} with {replacement}"),
                    ..WEAK_CRYPTO_CHECK.finding(DIMENSION, location.clone())
                };
                tally.record_finding(finding, WEAK_CRYPTO_CHECK.penalty);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::test_support::{snapshot, write};
    use tempfile::TempDir;

    fn run(dir: &TempDir) -> DimensionScore {
        SecurityAnalyzer
            .analyze(&snapshot(dir), &AnalysisContext::default())
            .expect("security analysis should succeed")
    }

    #[test]
    fn all_builtin_patterns_compile() {
        let secrets = secret_regexes().expect("secret patterns should compile");
        let code = code_regexes().expect("code patterns should compile");
        let crypto = crypto_regexes().expect("crypto patterns should compile");
        assert_eq!(secrets.len(), SECRET_PATTERNS.len());
        assert_eq!(code.len(), CODE_PATTERNS.len());
        assert_eq!(crypto.len(), WEAK_CRYPTO.len());
    }

    #[test]
    fn malformed_pattern_is_reported_not_panicked() {
        let err = compile_all(&[(r"(unclosed", ())]).expect_err("pattern should not compile");
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn hardcoded_api_key_yields_one_critical_finding() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(
            dir.path(),
            "config.py",
            "API_KEY = \"abcdefghijklmnopqrstuvwx12345\"\n",
        );

        let score = run(&dir);
        assert_eq!(score.findings.len(), 1);
        let finding = &score.findings[0];
        assert_eq!(finding.title, "Hardcoded API Key detected");
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.location, "config.py");
        assert_eq!(score.score, 100.0 - SECRET_PENALTY);
    }

    #[test]
    fn secrets_under_test_or_example_paths_are_ignored() {
        let dir = TempDir::new().expect("temp dir should be created");
        let line = "API_KEY = \"abcdefghijklmnopqrstuvwx12345\"\n";
        write(dir.path(), "tests/fixtures/config.py", line);
        write(dir.path(), "examples/demo.py", line);
        write(dir.path(), "src/test_settings.py", line);

        let score = run(&dir);
        assert!(score.findings.is_empty());
        assert_eq!(score.score, 100.0);
    }

    #[test]
    fn dotenv_files_are_scanned_for_secrets() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), ".env", "DATABASE_URL=postgres://app:hunter22@db:5432/app\n");

        let score = run(&dir);
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.findings[0].title, "Hardcoded Database Connection String detected");
        assert_eq!(score.findings[0].location, ".env");
    }

    #[test]
    fn sql_concatenation_is_critical_and_costs_twenty() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(
            dir.path(),
            "app/db.py",
            "query = \"SELECT * FROM users WHERE id = \" + user_id\n",
        );

        let score = run(&dir);
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.findings[0].title, "Potential SQL injection");
        assert_eq!(score.findings[0].severity, Severity::Critical);
        assert_eq!(score.score, 80.0);
    }

    #[test]
    fn outdated_lockfile_packages_are_flagged() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(
            dir.path(),
            "package-lock.json",
            r#"{
  "lockfileVersion": 3,
  "packages": {
    "": {"name": "app"},
    "node_modules/lodash": {"version": "4.17.15"},
    "node_modules/express": {"version": "4.18.2"},
    "node_modules/a/node_modules/minimist": {"version": "1.2.5"}
  }
}"#,
        );

        let score = run(&dir);
        let titles: Vec<&str> = score.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Vulnerable dependency: lodash@4.17.15",
                "Vulnerable dependency: minimist@1.2.5"
            ]
        );
        assert_eq!(score.findings[0].references, vec!["CVE-2021-23337"]);
        assert_eq!(score.findings[0].remediation, "Upgrade to version 4.17.21");
    }

    #[test]
    fn jwt_without_expiry_and_weak_hashes_are_high() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(
            dir.path(),
            "auth.js",
            "const token = jwt.sign(payload, key);\nconst digest = md5(body);\n",
        );
        write(
            dir.path(),
            "session.js",
            "jwt.sign(payload, key, { expiresIn: '1h' });\n",
        );

        let score = run(&dir);
        let titles: Vec<&str> = score.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["JWT without expiration", "Weak cryptographic algorithm: MD5"]
        );
        assert!(score
            .findings
            .iter()
            .all(|finding| finding.severity == Severity::High));
        assert_eq!(score.score, 80.0);
    }

    #[test]
    fn non_utf8_files_are_skipped() {
        let dir = TempDir::new().expect("temp dir should be created");
        std::fs::write(dir.path().join("blob.py"), [0xff, 0xfe, 0xfd]).expect("binary write");

        let score = run(&dir);
        assert!(score.findings.is_empty());
    }

    #[test]
    fn version_comparison_handles_prefixes_and_garbage() {
        assert!(is_older_than("^4.17.15", "4.17.21"));
        assert!(!is_older_than("v4.17.21", "4.17.21"));
        assert!(is_older_than("unknown", "4.17.21"));
    }
}
