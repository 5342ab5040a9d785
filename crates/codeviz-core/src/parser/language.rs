//! Supported source languages and content-based detection.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Source grammars the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 2] = [Language::Python, Language::Java];

    /// Wire name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
        }
    }

    /// Map a file extension (without dot) to a language.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Guess the language of a snippet from characteristic constructs.
    ///
    /// Each language scores one point per matching pattern; ties go to Python.
    pub fn detect(source: &str) -> Self {
        let (python, java) = detection_patterns();
        let score = |patterns: &[Regex]| patterns.iter().filter(|re| re.is_match(source)).count();

        if score(python) >= score(java) {
            Self::Python
        } else {
            Self::Java
        }
    }
}

fn detection_patterns() -> &'static (Vec<Regex>, Vec<Regex>) {
    static PATTERNS: OnceLock<(Vec<Regex>, Vec<Regex>)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |patterns: &[&str]| -> Vec<Regex> {
            patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
        };
        (
            compile(&[
                r"def\s+\w+\s*\([^)]*\)\s*:",
                r"import\s+[\w\s,]+",
                r"class\s+\w+(\s*\([^)]*\))?\s*:",
                r"print\s*\([^)]*\)",
            ]),
            compile(&[
                r"public\s+class\s+\w+",
                // A bare `private` or `protected` counts on its own.
                r"private|protected|public\s+\w+\s+\w+\s*\([^)]*\)",
                r"import\s+[\w.]+;",
                r"System\.out\.println",
            ]),
        )
    })
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            _ => Err(PipelineError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("JAVA".parse::<Language>().unwrap(), Language::Java);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = "ruby".parse::<Language>().unwrap_err();
        assert_eq!(err, PipelineError::UnsupportedLanguage("ruby".to_string()));
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("PYI"), Some(Language::Python));
        assert_eq!(Language::from_extension("java"), Some(Language::Java));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_detect_python() {
        let src = "import os\n\ndef main():\n    print(os.getcwd())\n";
        assert_eq!(Language::detect(src), Language::Python);
    }

    #[test]
    fn test_detect_java() {
        let src = "import java.util.List;\n\npublic class Main {\n    public static void main(String[] args) {\n        System.out.println(\"hi\");\n    }\n}\n";
        assert_eq!(Language::detect(src), Language::Java);
    }

    #[test]
    fn test_detect_bare_access_modifier() {
        assert_eq!(Language::detect("private int count;\n"), Language::Java);
        assert_eq!(Language::detect("protected int count;\n"), Language::Java);
    }

    #[test]
    fn test_detect_tie_goes_to_python() {
        assert_eq!(Language::detect(""), Language::Python);
    }
}
