#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::{Path, PathBuf},
        process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use keycode::{Chord, Key};

    use crate::*;

    const SAMPLE: &str = r#"{
      "version": "1.1.0",
      "activator": { "hotkey": "<ctrl>+<alt>+a", "mode": "press", "timeout_ms": 1500 },
      "shortcuts": [
        { "hotkey": "<ctrl>+<alt>+1", "sound": "sounds/airhorn.wav",
          "overlay": { "file": "/abs/boom.gif", "x": 960, "y": 540, "duration": 2000,
                       "width": 320, "height": 240 } },
        { "suffix": ["g", "h"], "overlay": { "file": "gh.png" } },
        { "suffix": "b", "sound": "b.wav" }
      ]
    }"#;

    fn unique_tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let mut dir = env::temp_dir();
        dir.push(format!("hotcue-{name}-{}-{nanos}", process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn model(src: &str) -> Result<Model, Error> {
        parse_str(src, None)?.into_model(None)
    }

    fn validation_message(src: &str) -> String {
        match model(src) {
            Err(Error::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sample_parses_into_model() {
        let m = parse_str(SAMPLE, None)
            .expect("parse")
            .into_model(Some(Path::new("/cfg")))
            .expect("model");

        let act = m.activator.expect("activator");
        assert_eq!(act.chord, Chord::parse("ctrl+alt+a").expect("chord"));
        assert_eq!(act.mode, ActivatorMode::Press);
        assert_eq!(act.timeout_ms, 1500);

        assert_eq!(m.shortcuts.len(), 3);
        let first = &m.shortcuts[0];
        assert_eq!(first.id, ShortcutId(0));
        assert_eq!(
            first.trigger,
            TriggerSpec::Direct(Chord::parse("<ctrl>+<alt>+1").expect("chord"))
        );
        assert_eq!(
            first.action.sound.as_deref(),
            Some(Path::new("/cfg/sounds/airhorn.wav"))
        );
        let overlay = first.action.overlay.as_ref().expect("overlay");
        assert_eq!(overlay.file, PathBuf::from("/abs/boom.gif"));
        assert_eq!(overlay.size(), Some((320, 240)));
        assert_eq!(overlay.duration_ms, 2000);

        assert_eq!(m.shortcuts[1].trigger, TriggerSpec::Suffix(vec![Key::G, Key::H]));
        assert_eq!(m.shortcuts[1].label(), "activator > g h");
        let gh = m.shortcuts[1].action.overlay.as_ref().expect("overlay");
        assert_eq!(gh.duration_ms, 1500);
        assert_eq!((gh.x, gh.y), (0, 0));
        assert_eq!(gh.size(), None);
        assert_eq!(m.shortcuts[2].trigger, TriggerSpec::Suffix(vec![Key::B]));
    }

    #[test]
    fn hold_mode_is_accepted() {
        let m = model(
            r#"{"version": "1.1.0",
                "activator": {"hotkey": "<ctrl>+<alt>+a", "mode": "hold"},
                "shortcuts": []}"#,
        )
        .expect("hold parses");
        let act = m.activator.expect("activator");
        assert_eq!(act.mode, ActivatorMode::Hold);
        assert_eq!(act.timeout_ms, 1500);
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = parse_str(
            r#"{"activator": {"hotkey": "<ctrl>+a", "mode": "toggle"}}"#,
            None,
        )
        .expect_err("mode rejected");
        assert!(matches!(err, Error::Parse { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn invalid_hotkey_reports_location() {
        let src = "{\n  \"shortcuts\": [\n    {\"hotkey\": \"<ctrl>+<bogus>\", \"sound\": \"a.wav\"}\n  ]\n}";
        match parse_str(src, Some(Path::new("s.json"))) {
            Err(Error::Parse {
                line,
                message,
                excerpt,
                path,
                ..
            }) => {
                assert_eq!(line, 3);
                assert!(message.contains("<ctrl>+<bogus>"), "{message}");
                assert!(excerpt.contains('^'));
                assert_eq!(path.as_deref(), Some(Path::new("s.json")));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_str(r#"{"shortcuts": [{"hotkey": "a", "sfx": "x"}]}"#, None).is_err());
        assert!(parse_str(r#"{"colour": "red"}"#, None).is_err());
    }

    #[test]
    fn trigger_must_be_exactly_one() {
        let both = validation_message(
            r#"{"shortcuts": [{"hotkey": "<ctrl>+1", "suffix": "g", "sound": "a.wav"}]}"#,
        );
        assert!(both.contains("exactly one"), "{both}");
        let neither = validation_message(r#"{"shortcuts": [{"sound": "a.wav"}]}"#);
        assert!(neither.contains("index 0"), "{neither}");
    }

    #[test]
    fn suffix_errors() {
        let empty = validation_message(r#"{"shortcuts": [{"suffix": [], "sound": "a.wav"}]}"#);
        assert!(empty.contains("empty suffix"), "{empty}");
        let bad = validation_message(
            r#"{"shortcuts": [{"suffix": ["g", "nope"], "sound": "a.wav"}]}"#,
        );
        assert!(bad.contains("'nope'"), "{bad}");
    }

    #[test]
    fn suffix_tokens_are_normalized() {
        let m = model(r#"{"shortcuts": [{"suffix": [" G ", "F5", "space"], "sound": "a.wav"}]}"#)
            .expect("model");
        assert_eq!(
            m.shortcuts[0].trigger,
            TriggerSpec::Suffix(vec![Key::G, Key::F5, Key::Space])
        );
    }

    #[test]
    fn blank_sound_is_dropped() {
        let m = model(r#"{"shortcuts": [{"hotkey": "<ctrl>+1", "sound": "  "}]}"#).expect("model");
        assert!(m.shortcuts[0].action.is_empty());
    }

    #[test]
    fn bootstrap_copies_sample() {
        let dir = unique_tmp_dir("bootstrap");
        let cfg_path = dir.join("nested").join("shortcuts.json");
        let sample = sample_path_for(&dir.join("shortcuts.json"));
        fs::write(&sample, SAMPLE).expect("write sample");

        let cfg = load_or_bootstrap(&cfg_path, Some(&sample)).expect("bootstrap");
        assert_eq!(cfg.shortcuts.len(), 3);
        assert!(cfg_path.is_file());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn bootstrap_without_sample_writes_empty() {
        let dir = unique_tmp_dir("bootstrap-empty");
        let cfg_path = dir.join("shortcuts.json");
        let cfg = load_or_bootstrap(&cfg_path, Some(&dir.join("missing.json"))).expect("bootstrap");
        assert_eq!(cfg, ConfigFile::default());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn save_then_load_preserves_entries() {
        let dir = unique_tmp_dir("save");
        let path = dir.join("out.json");
        let mut cfg = parse_str(SAMPLE, None).expect("parse");
        cfg.shortcuts[2].suffix = Some(RawSuffix::Many(vec!["b".into()]));
        save_config(&path, &cfg).expect("save");

        let text = fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"suffix\": \"b\""), "{text}");
        assert!(text.contains("\"version\": \"1.1.0\""));
        assert!(text.contains("\"hotkey\": \"<ctrl>+<alt>+1\""));

        let back = load_config(&path).expect("load");
        assert_eq!(back.shortcuts.len(), 3);
        assert_eq!(back.shortcuts[2].suffix, Some(RawSuffix::One("b".into())));
        assert_eq!(back.activator, cfg.activator);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_model_attaches_path_to_validation_errors() {
        let dir = unique_tmp_dir("model-path");
        let path = dir.join("bad.json");
        fs::write(&path, r#"{"shortcuts": [{"sound": "a.wav"}]}"#).expect("write");
        let err = load_model(&path).expect_err("invalid");
        assert_eq!(err.path(), Some(path.as_path()));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config(Path::new("/definitely/not/here.json")).expect_err("missing");
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.pretty().starts_with("Read error at /definitely/not/here.json"));
    }

    #[test]
    fn sample_path_sits_next_to_config() {
        assert_eq!(
            sample_path_for(Path::new("/x/shortcuts.json")),
            PathBuf::from("/x/shortcuts.sample.json")
        );
    }
}
