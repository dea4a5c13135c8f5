/*!
 * JavaScript and TypeScript signature extraction
 */

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{lower_name, SignatureExtractor};
use crate::error::Result;

static IMPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*import\s+.*?["'].*?["'];?\s*$"#).unwrap());

static EXPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*export\s+(?:default\s+)?.*?(?:\{.*?\}|\w+.*?);?\s*$").unwrap()
});

static FUNCTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s+(\w+)\s*\([^)]*\)\s*\{",
    )
    .unwrap()
});

static ARROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+(?:default\s+)?)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?\([^)]*\)\s*=>",
    )
    .unwrap()
});

static CLASS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:\s*|export\s+(?:default\s+)?)class\s+(\w+)(?:\s+extends\s+([^{]+))?\s*\{")
        .unwrap()
});

static METHOD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:public|private|protected|static|async)\s+)*([a-zA-Z_$][\w$]*)\s*\([^)]*\)\s*\{",
    )
    .unwrap()
});

static COMPONENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+(?:default\s+)?)?(?:const|let|var)\s+([A-Z]\w*)(?::\s*React\.?FC[^=]*)?\s*=\s*\([^)]*\)\s*=>\s*(?:\(\s*)?<",
    )
    .unwrap()
});

static INTERFACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?interface\s+(\w+)(?:\s+extends\s+[\w\s,<>]+)?\s*\{").unwrap()
});

const RESERVED: &[&str] = &[
    "if", "for", "while", "switch", "catch", "class", "function", "return",
];

/// Classes are searched for their closing brace within this many bytes
const CLASS_SCAN_LIMIT: usize = 10_000;

/// A class declaration and its method lines
struct ClassSignature {
    name: String,
    declaration: String,
    methods: Vec<String>,
    is_react_component: bool,
}

/// Extracts imports, exports, functions, classes, components and interfaces
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptExtractor;

impl JavaScriptExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    fn matches(regex: &Regex, content: &str) -> Vec<String> {
        regex
            .find_iter(content)
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }

    fn classes(content: &str) -> Vec<ClassSignature> {
        let bytes = content.as_bytes();
        let mut classes = Vec::new();

        for caps in CLASS_REGEX.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let extends = caps.get(2).map(|m| m.as_str().trim().to_string());
            let start = whole.end();

            let mut depth = 1;
            let mut end = start;
            for (offset, byte) in bytes[start..bytes.len().min(start + CLASS_SCAN_LIMIT)]
                .iter()
                .enumerate()
            {
                match byte {
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            end = start + offset;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            let methods = METHOD_REGEX
                .captures_iter(&content[start..end])
                .filter(|m| !RESERVED.contains(&&m[1]))
                .map(|m| m[0].trim().to_string())
                .collect();

            let is_react_component = extends
                .as_deref()
                .map_or(false, |base| base.contains("Component"));

            classes.push(ClassSignature {
                name: name.as_str().to_string(),
                declaration: whole.as_str().trim().to_string(),
                methods,
                is_react_component,
            });
        }

        classes
    }
}

impl SignatureExtractor for JavaScriptExtractor {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn supports(&self, path: &Path) -> bool {
        let name = lower_name(path);
        [".js", ".jsx", ".ts", ".tsx"]
            .iter()
            .any(|ext| name.ends_with(ext))
    }

    fn extract(&self, path: &Path, content: &str) -> Result<String> {
        let name = lower_name(path);
        let is_typescript = name.ends_with(".ts") || name.ends_with(".tsx");
        let has_jsx = name.ends_with(".jsx")
            || name.ends_with(".tsx")
            || (content.contains('<') && content.contains('>'));

        let mut out = Vec::new();
        out.push(format!(
            "# {}{} File",
            if is_typescript { "TypeScript" } else { "JavaScript" },
            if has_jsx { " with JSX" } else { "" }
        ));
        out.push(String::new());

        let mut section = |title: &str, lines: Vec<String>| {
            if !lines.is_empty() {
                out.push(format!("## {}", title));
                out.extend(lines);
                out.push(String::new());
            }
        };

        section("Imports", Self::matches(&IMPORT_REGEX, content));
        section("Exports", Self::matches(&EXPORT_REGEX, content));

        let mut functions = Self::matches(&FUNCTION_REGEX, content);
        functions.extend(Self::matches(&ARROW_REGEX, content));
        section("Functions", functions);

        if has_jsx {
            let components = COMPONENT_REGEX
                .captures_iter(content)
                .flat_map(|caps| {
                    [
                        format!("// {} Component", &caps[1]),
                        caps[0].trim().to_string(),
                    ]
                })
                .collect();
            section("React Components", components);
        }

        let classes = Self::classes(content)
            .into_iter()
            .flat_map(|class| {
                let mut lines = vec![
                    format!(
                        "// {}{}",
                        class.name,
                        if class.is_react_component {
                            " React Component"
                        } else {
                            ""
                        }
                    ),
                    class.declaration,
                ];
                lines.extend(class.methods.into_iter().map(|m| format!("  {}", m)));
                lines.push("}".to_string());
                lines
            })
            .collect();
        section("Classes", classes);

        if is_typescript {
            section("TypeScript Interfaces", Self::matches(&INTERFACE_REGEX, content));
        }

        Ok(out.join("\n"))
    }
}
