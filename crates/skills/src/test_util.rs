use calico_core::{
    IntentMessage, Outbound, SkillContext, bus::RecordingPublisher, message::Intent,
    settings::SettingsStore,
};
use std::sync::Arc;
use tempfile::TempDir;

pub fn recording_context() -> (SkillContext, Arc<RecordingPublisher>) {
    let recorder = Arc::new(RecordingPublisher::new());
    let context = SkillContext {
        outbound: Outbound::new(recorder.clone()),
        settings: SettingsStore::new("/nonexistent/config.json"),
    };
    (context, recorder)
}

/// Context whose settings store reads `settings_json` from a temp file.
pub fn context_with_settings(settings_json: &str) -> (TempDir, SkillContext, Arc<RecordingPublisher>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, settings_json).unwrap();
    let (mut context, recorder) = recording_context();
    context.settings = SettingsStore::new(path);
    (dir, context, recorder)
}

pub fn intent(name: &str, session_id: &str) -> IntentMessage {
    IntentMessage {
        session_id: session_id.to_string(),
        site_id: "default".to_string(),
        intent: Intent {
            intent_name: name.to_string(),
        },
        ..Default::default()
    }
}
