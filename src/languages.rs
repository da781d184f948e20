// src/languages.rs
use serde::Serialize;

use crate::errors::{ExecError, Result};

/// Runtime descriptor for one supported language.
///
/// Each entry carries the identifiers both execution backends need: the numeric
/// Judge0 language id and the Piston runtime name/version pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub judge0_id: u32,
    pub piston_runtime: &'static str,
    pub piston_version: &'static str,
    pub extension: &'static str,
}

impl LanguageDescriptor {
    /// File name the source is uploaded under. Java needs the public class name.
    pub fn source_file_name(&self) -> String {
        match self.key {
            "java" => "Main.java".to_string(),
            _ => format!("main.{}", self.extension),
        }
    }
}

/// The entry shown in language pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    pub key: &'static str,
    pub name: &'static str,
    pub extension: &'static str,
}

const LANGUAGES: &[LanguageDescriptor] = &[
    LanguageDescriptor {
        key: "python",
        name: "Python 3.8.1",
        judge0_id: 71,
        piston_runtime: "python",
        piston_version: "3.10.0",
        extension: "py",
    },
    LanguageDescriptor {
        key: "javascript",
        name: "JavaScript (Node.js 12.14.0)",
        judge0_id: 63,
        piston_runtime: "javascript",
        piston_version: "18.15.0",
        extension: "js",
    },
    LanguageDescriptor {
        key: "cpp",
        name: "C++ (GCC 9.2.0)",
        judge0_id: 54,
        piston_runtime: "c++",
        piston_version: "10.2.0",
        extension: "cpp",
    },
    LanguageDescriptor {
        key: "java",
        name: "Java (OpenJDK 13.0.1)",
        judge0_id: 62,
        piston_runtime: "java",
        piston_version: "15.0.2",
        extension: "java",
    },
    LanguageDescriptor {
        key: "c",
        name: "C (GCC 9.2.0)",
        judge0_id: 50,
        piston_runtime: "c",
        piston_version: "10.2.0",
        extension: "c",
    },
    LanguageDescriptor {
        key: "csharp",
        name: "C# (Mono 6.6.0.161)",
        judge0_id: 51,
        piston_runtime: "csharp",
        piston_version: "6.12.0",
        extension: "cs",
    },
    LanguageDescriptor {
        key: "go",
        name: "Go (1.13.5)",
        judge0_id: 60,
        piston_runtime: "go",
        piston_version: "1.16.2",
        extension: "go",
    },
    LanguageDescriptor {
        key: "rust",
        name: "Rust (1.40.0)",
        judge0_id: 73,
        piston_runtime: "rust",
        piston_version: "1.68.2",
        extension: "rs",
    },
];

/// Looks up the runtime descriptor for a language key.
pub fn describe(language: &str) -> Result<&'static LanguageDescriptor> {
    LANGUAGES
        .iter()
        .find(|lang| lang.key == language)
        .ok_or_else(|| ExecError::UnsupportedLanguage(language.to_string()))
}

/// Lists every supported language in registry order.
pub fn list_languages() -> Vec<LanguageSummary> {
    LANGUAGES
        .iter()
        .map(|lang| LanguageSummary {
            key: lang.key,
            name: lang.name,
            extension: lang.extension,
        })
        .collect()
}
