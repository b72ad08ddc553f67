use std::{fs, path::PathBuf, sync::Arc};

use pomodoro_server::{settings::SETTINGS_RECORD, JsonFileStore, Settings, SettingsStore, TimerEngine};

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pomodoro-persistence-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    dir.join("settings.json")
}

#[test]
fn durations_survive_restart() {
    let path = scratch_file("restart");

    let mut engine = TimerEngine::new(Arc::new(JsonFileStore::new(&path)));
    engine.set_work_duration(40).unwrap();
    engine.set_break_duration(8).unwrap();
    drop(engine);

    let engine = TimerEngine::new(Arc::new(JsonFileStore::new(&path)));
    assert_eq!(engine.settings(), Settings::new(40, 8));
    assert_eq!(engine.state().remaining_seconds, 2400);
    assert_eq!(engine.state().completed_pomodoros, 0);
}

#[test]
fn unparsable_record_falls_back_to_defaults() {
    let path = scratch_file("unparsable");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!(r#"{{"{}": {{"workDurationMinutes": "lots"}}}}"#, SETTINGS_RECORD)).unwrap();

    let engine = TimerEngine::new(Arc::new(JsonFileStore::new(&path)));
    assert_eq!(engine.settings(), Settings::default());
    assert_eq!(engine.state().remaining_seconds, 1500);
}

#[test]
fn rejected_edit_does_not_touch_the_file() {
    let path = scratch_file("rejected");

    let mut engine = TimerEngine::new(Arc::new(JsonFileStore::new(&path)));
    assert!(engine.set_work_duration(-5).is_err());
    assert!(!path.exists());
    assert!(JsonFileStore::new(&path).load().unwrap().is_none());
}
