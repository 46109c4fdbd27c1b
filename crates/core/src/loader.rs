//! Skill Loader
//!
//! Builds the registry at startup from a directory of skill manifests. Each
//! `<Name>.json` file enables one skill compiled into the service; the
//! handler identifier is derived from the file name (`Ask_Me_Colors.json` →
//! `AskMeColorsSkill`) and looked up in the [`SkillCatalog`].
//!
//! A broken manifest or a failing constructor is logged and skipped. It never
//! prevents the remaining skills from loading.

use crate::{
    error::LoadError,
    registry::SkillRegistry,
    skill::{Skill, SkillCatalog, SkillContext},
};
use serde::Deserialize;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

pub const MANIFEST_EXTENSION: &str = "json";
/// Manifests whose file name starts with this marker are ignored.
pub const PRIVATE_PREFIX: char = '_';
pub const HANDLER_SUFFIX: &str = "Skill";

/// Contents of a skill manifest. An empty file is a valid default manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillManifest {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for SkillManifest {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
        }
    }
}

impl SkillManifest {
    pub fn parse(path: &Path, text: &str) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|e| LoadError::Manifest {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Derives the handler identifier from a manifest file stem:
/// `ask_me_colors` and `Ask_Me_Colors` both become `AskMeColorsSkill`.
pub fn handler_identifier(stem: &str) -> String {
    let mut identifier: String = stem
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    identifier.push_str(HANDLER_SUFFIX);
    identifier
}

#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Result of scanning a skill directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registry: SkillRegistry,
    /// Handler identifiers that were registered.
    pub loaded: Vec<String>,
    /// Private or disabled manifests.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn into_registry(self) -> SkillRegistry {
        self.registry
    }
}

enum Outcome {
    Loaded(String),
    Disabled,
}

pub struct SkillLoader<'a> {
    catalog: &'a SkillCatalog,
    context: &'a SkillContext,
}

impl<'a> SkillLoader<'a> {
    pub fn new(catalog: &'a SkillCatalog, context: &'a SkillContext) -> Self {
        Self { catalog, context }
    }

    /// Loads every manifest in `dir`, creating the directory if it is missing.
    pub fn load_all(&self, dir: &Path) -> LoadReport {
        info!(dir = %dir.display(), "--- Starting Skill Loading Process ---");
        let mut report = LoadReport::default();

        let manifests = match manifest_paths(dir) {
            Ok(paths) => paths,
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Could not read the skills directory.");
                return report;
            }
        };

        for path in manifests {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if file_name.starts_with(PRIVATE_PREFIX) {
                info!(file = %file_name, "Skipping file");
                report.skipped.push(path);
                continue;
            }

            match self.load_one(&path, &mut report.registry) {
                Ok(Outcome::Loaded(identifier)) => report.loaded.push(identifier),
                Ok(Outcome::Disabled) => report.skipped.push(path),
                Err(e) => {
                    error!(file = %file_name, error = %e, "Failed to load skill.");
                    report.failures.push(LoadFailure { path, error: e });
                }
            }
        }

        if report.registry.is_empty() {
            warn!(
                "No skills were loaded. The 'skills' directory might be empty or \
                 there may be errors in the skill manifests."
            );
        }
        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "--- Skill Loading Complete ---"
        );
        report
    }

    fn load_one(&self, path: &Path, registry: &mut SkillRegistry) -> Result<Outcome, LoadError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let identifier = handler_identifier(&stem);

        let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let manifest = SkillManifest::parse(path, &text)?;
        if !manifest.enabled {
            info!(skill = %identifier, "Skill disabled by its manifest");
            return Ok(Outcome::Disabled);
        }

        info!(skill = %identifier, file = %path.display(), "Attempting to load skill");
        let skill = self.construct(&identifier)?;
        let trigger = skill.trigger_intent().to_string();
        let answer = skill.answer_intent().unwrap_or_default().to_string();
        registry.register(skill)?;

        info!(
            skill = %identifier,
            trigger_intent = %trigger,
            answer_intent = %answer,
            "Successfully loaded skill"
        );
        Ok(Outcome::Loaded(identifier))
    }

    fn construct(&self, identifier: &str) -> Result<Box<dyn Skill>, LoadError> {
        let factory = self
            .catalog
            .get(identifier)
            .ok_or_else(|| LoadError::UnknownSkill {
                identifier: identifier.to_string(),
            })?;

        match catch_unwind(AssertUnwindSafe(|| factory(self.context))) {
            Ok(Ok(skill)) => Ok(skill),
            Ok(Err(e)) => Err(LoadError::Construct {
                identifier: identifier.to_string(),
                source: e,
            }),
            Err(panic) => Err(LoadError::Panicked {
                identifier: identifier.to_string(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn manifest_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(MANIFEST_EXTENSION)
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SkillError,
        testing::{EchoSkill, recording_context},
    };
    use anyhow::anyhow;
    use tempfile::TempDir;

    fn colors(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(EchoSkill::new(
            "AskMeColorsSkill",
            "Ask_Me_Colors",
            "Answer_Colors",
            context,
        )))
    }

    fn hello(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(EchoSkill::new("HelloSkill", "Hello", "", context)))
    }

    fn copycat(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(EchoSkill::new("CopycatSkill", "Hello", "", context)))
    }

    fn failing(_: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Err(anyhow!("missing API key").into())
    }

    fn panicking(_: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        panic!("constructor blew up")
    }

    fn catalog() -> SkillCatalog {
        SkillCatalog::new()
            .with("AskMeColorsSkill", colors)
            .with("HelloSkill", hello)
            .with("CopycatSkill", copycat)
            .with("FailingSkill", failing)
            .with("PanickingSkill", panicking)
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_handler_identifier_naming_convention() {
        assert_eq!(handler_identifier("ask_me_colors"), "AskMeColorsSkill");
        assert_eq!(handler_identifier("Ask_Me_Colors"), "AskMeColorsSkill");
        assert_eq!(handler_identifier("TELL_TIME"), "TellTimeSkill");
        assert_eq!(handler_identifier("hello"), "HelloSkill");
    }

    #[test]
    fn test_manifest_parsing() {
        let path = Path::new("Hello.json");
        assert_eq!(SkillManifest::parse(path, "").unwrap(), SkillManifest::default());
        assert!(!SkillManifest::parse(path, r#"{"enabled": false}"#).unwrap().enabled);
        assert!(matches!(
            SkillManifest::parse(path, r#"{"enabled": "#),
            Err(LoadError::Manifest { .. })
        ));
        assert!(matches!(
            SkillManifest::parse(path, r#"{"enabeld": true}"#),
            Err(LoadError::Manifest { .. })
        ));
    }

    #[test]
    fn test_malformed_manifest_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Ask_Me_Colors.json", r#"{"description": "favourite colours"}"#);
        write(&dir, "Hello.json", "");
        write(&dir, "Broken.json", "{ this is not json");
        write(&dir, "_Template.json", "{}");
        write(&dir, "README.md", "not a manifest");

        let (context, _) = recording_context();
        let catalog = catalog();
        let report = SkillLoader::new(&catalog, &context).load_all(dir.path());

        assert_eq!(report.loaded, vec!["AskMeColorsSkill", "HelloSkill"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, LoadError::Manifest { .. }));
        assert_eq!(
            report.registry.intents(),
            vec!["Answer_Colors", "Ask_Me_Colors", "Hello"]
        );
    }

    #[test]
    fn test_unknown_failing_and_panicking_skills_are_isolated() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Hello.json", "{}");
        write(&dir, "Open_Gmail.json", "{}");
        write(&dir, "Failing.json", "{}");
        write(&dir, "Panicking.json", "{}");

        let (context, _) = recording_context();
        let catalog = catalog();
        let report = SkillLoader::new(&catalog, &context).load_all(dir.path());

        assert_eq!(report.loaded, vec!["HelloSkill"]);
        let errors: Vec<&LoadError> = report.failures.iter().map(|f| &f.error).collect();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| matches!(e, LoadError::Construct { identifier, .. } if identifier == "FailingSkill")));
        assert!(errors.iter().any(|e| matches!(e, LoadError::UnknownSkill { identifier } if identifier == "OpenGmailSkill")));
        assert!(errors.iter().any(|e| matches!(e, LoadError::Panicked { message, .. } if message == "constructor blew up")));
    }

    #[test]
    fn test_intent_collision_rejects_later_skill() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Copycat.json", "{}");
        write(&dir, "Hello.json", "{}");

        let (context, _) = recording_context();
        let catalog = catalog();
        let report = SkillLoader::new(&catalog, &context).load_all(dir.path());

        assert_eq!(report.loaded, vec!["CopycatSkill"]);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, LoadError::Registry(_)));
        assert_eq!(report.registry.get("Hello").unwrap().name(), "CopycatSkill");
    }

    #[test]
    fn test_disabled_manifest_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Hello.json", r#"{"enabled": false}"#);

        let (context, _) = recording_context();
        let catalog = catalog();
        let report = SkillLoader::new(&catalog, &context).load_all(dir.path());

        assert!(report.registry.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_created_and_empty() {
        let dir = TempDir::new().unwrap();
        let skills_dir = dir.path().join("skills");

        let (context, _) = recording_context();
        let catalog = catalog();
        let report = SkillLoader::new(&catalog, &context).load_all(&skills_dir);

        assert!(skills_dir.is_dir());
        assert!(report.into_registry().is_empty());
    }
}
