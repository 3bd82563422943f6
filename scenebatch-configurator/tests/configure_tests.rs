//! End-to-end configurator behaviour: driver argv in, settings and script out.

use std::path::Path;

use rstest::rstest;
use scenebatch_configurator::{
    configure, script_argv, ConfigureError, Outcome, RecordingSettings, ScriptGenerator,
    SettingValue, SEPARATOR,
};
use scenebatch_core::{Engine, FileFormat, RenderOptions};

fn host_argv(script_args: Vec<String>) -> Vec<String> {
    let mut argv: Vec<String> = ["blender", "-b", "scene1.blend", "-E", "RPR", "-P", "configure.py"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    argv.push(SEPARATOR.to_string());
    argv.extend(script_args);
    argv
}

fn engine_defaults() -> RecordingSettings {
    RecordingSettings::with_values([
        ("render.filepath", SettingValue::Text("/tmp/".into())),
        ("render.resolution_x", SettingValue::Int(1920)),
        ("render.resolution_y", SettingValue::Int(1080)),
        ("rpr.limits.min_samples", SettingValue::Int(16)),
        ("rpr.limits.max_samples", SettingValue::Int(128)),
        ("rpr.limits.noise_threshold", SettingValue::Float(0.05)),
        ("rpr.limits.seconds", SettingValue::Int(0)),
    ])
}

// ---------------------------------------------------------------------------
// 1. Driver argv feeds the configurator
// ---------------------------------------------------------------------------

#[test]
fn driver_argv_is_applied_to_settings() {
    let opts = RenderOptions {
        width: Some(800),
        height: Some(600),
        file_format: Some(FileFormat::Png),
        ..Default::default()
    };
    let argv = host_argv(script_argv(Path::new("/renders/scene1"), &opts));

    let mut settings = engine_defaults();
    let outcome = configure(&argv, Engine::Rpr, &mut settings).expect("configure");

    assert!(matches!(outcome, Outcome::Rendered { .. }));
    assert_eq!(settings.renders(), 1);
    assert_eq!(settings.get("render.resolution_x"), Some(&SettingValue::Int(800)));
    assert_eq!(settings.get("render.resolution_y"), Some(&SettingValue::Int(600)));
    assert_eq!(
        settings.get("render.image_settings.file_format"),
        Some(&SettingValue::Text("PNG".into()))
    );
    assert_eq!(
        settings.get("render.use_file_extension"),
        Some(&SettingValue::Bool(true))
    );
    assert_eq!(
        settings.get("render.filepath"),
        Some(&SettingValue::Text("/renders/scene1".into()))
    );
}

#[test]
fn omitted_fields_keep_engine_defaults() {
    let opts = RenderOptions {
        width: Some(640),
        ..Default::default()
    };
    let argv = host_argv(script_argv(Path::new("/r/s"), &opts));
    let mut settings = engine_defaults();
    configure(&argv, Engine::Rpr, &mut settings).expect("configure");

    assert_eq!(settings.get("render.resolution_x"), Some(&SettingValue::Int(640)));
    assert_eq!(settings.get("render.resolution_y"), Some(&SettingValue::Int(1080)));
    assert_eq!(settings.get("rpr.limits.min_samples"), Some(&SettingValue::Int(16)));
    assert_eq!(settings.get("rpr.limits.max_samples"), Some(&SettingValue::Int(128)));
    assert_eq!(
        settings.get("rpr.limits.noise_threshold"),
        Some(&SettingValue::Float(0.05))
    );
    assert!(settings.get("render.use_file_extension").is_none());
}

#[test]
fn zero_sample_count_overrides_default() {
    let opts = RenderOptions {
        min_samples: Some(0),
        ..Default::default()
    };
    let argv = host_argv(script_argv(Path::new("/r/s"), &opts));
    let mut settings = engine_defaults();
    configure(&argv, Engine::Rpr, &mut settings).expect("configure");
    assert_eq!(settings.get("rpr.limits.min_samples"), Some(&SettingValue::Int(0)));
}

#[test]
fn cycles_engine_targets_cycles_properties() {
    let opts = RenderOptions {
        max_samples: Some(512),
        noise_threshold: Some(0.01),
        time_limit: Some(90),
        ..Default::default()
    };
    let argv = host_argv(script_argv(Path::new("/r/s"), &opts));
    let mut settings = RecordingSettings::new();
    configure(&argv, Engine::Cycles, &mut settings).expect("configure");

    assert_eq!(settings.get("cycles.samples"), Some(&SettingValue::Int(512)));
    assert_eq!(
        settings.get("cycles.adaptive_threshold"),
        Some(&SettingValue::Float(0.01))
    );
    assert_eq!(settings.get("cycles.time_limit"), Some(&SettingValue::Int(90)));
    assert_eq!(
        settings.get("cycles.use_adaptive_sampling"),
        Some(&SettingValue::Bool(true))
    );
    assert!(settings.get("rpr.limits.max_samples").is_none());
}

#[test]
fn cycles_max_samples_alone_leaves_adaptive_sampling_untouched() {
    let opts = RenderOptions {
        max_samples: Some(128),
        ..Default::default()
    };
    let argv = host_argv(script_argv(Path::new("/r/s"), &opts));
    let mut settings = RecordingSettings::new();
    configure(&argv, Engine::Cycles, &mut settings).expect("configure");
    assert!(settings.get("cycles.use_adaptive_sampling").is_none());
}

#[test]
fn inverted_sample_range_is_rejected_before_render() {
    let argv = host_argv(vec![
        "--min-samples".into(),
        "64".into(),
        "--max-samples".into(),
        "8".into(),
    ]);
    let mut settings = RecordingSettings::new();
    let err = configure(&argv, Engine::Rpr, &mut settings).unwrap_err();
    assert!(matches!(err, ConfigureError::Request(_)), "got: {err}");
    assert_eq!(settings.renders(), 0);
}

#[rstest]
#[case("-0.1")]
#[case("1.01")]
#[case("abc")]
fn bad_noise_threshold_never_renders(#[case] raw: &str) {
    let argv = host_argv(vec!["--noise-threshold".into(), raw.into()]);
    let mut settings = RecordingSettings::new();
    assert!(configure(&argv, Engine::Rpr, &mut settings).is_err());
    assert_eq!(settings.renders(), 0);
}

// ---------------------------------------------------------------------------
// 2. Generated script
// ---------------------------------------------------------------------------

#[rstest]
#[case(Engine::Rpr, "scene.rpr.limits.max_samples = args.max_samples")]
#[case(Engine::Cycles, "scene.cycles.samples = args.max_samples")]
fn script_assigns_engine_properties(#[case] engine: Engine, #[case] line: &str) {
    let script = ScriptGenerator::new().unwrap().render(engine, "blender").unwrap();
    assert!(script.contains(line), "missing `{line}` in:\n{script}");
}

#[test]
fn script_parses_every_driver_flag() {
    let script = ScriptGenerator::new().unwrap().render(Engine::Rpr, "blender").unwrap();
    for flag in [
        "--out-path",
        "--width",
        "--height",
        "--file-format",
        "--min-samples",
        "--max-samples",
        "--noise-threshold",
        "--time-limit",
    ] {
        assert!(
            script.contains(&format!("parser.add_argument(\"{flag}\"")),
            "script does not parse {flag}"
        );
    }
    assert!(script.contains("dest=\"render_width\", type=positive_int"));
    assert!(script.contains("dest=\"min_samples\", type=int"));
    assert!(script.contains("type=unit_interval"));
    assert!(script.contains("choices=FILE_FORMATS"));
}

#[test]
fn script_uses_presence_checks_and_renders_once() {
    let script = ScriptGenerator::new().unwrap().render(Engine::Rpr, "blender").unwrap();
    assert!(script.contains("if args.min_samples is not None:"));
    assert!(script.contains("scene.render.use_file_extension = True"));
    assert_eq!(script.matches("bpy.ops.render.render(write_still=True)").count(), 1);
    assert!(script.contains("parser.print_help()"));
    assert!(script.contains("Batch job finished, exiting"));
}

#[test]
fn script_repeats_the_range_checks() {
    let script = ScriptGenerator::new().unwrap().render(Engine::Rpr, "blender").unwrap();
    assert!(script.contains("def positive_int(value):"));
    assert!(script.contains("args.min_samples > args.max_samples"));
    assert!(script.contains("parser.error("));
}

#[test]
fn cycles_script_enables_adaptive_sampling_with_its_controls() {
    let script = ScriptGenerator::new().unwrap().render(Engine::Cycles, "blender").unwrap();
    assert!(script.contains("scene.cycles.use_adaptive_sampling = True"));
    let rpr = ScriptGenerator::new().unwrap().render(Engine::Rpr, "blender").unwrap();
    assert!(!rpr.contains("use_adaptive_sampling"));
}

#[test]
fn script_lists_all_formats() {
    let script = ScriptGenerator::new().unwrap().render(Engine::Rpr, "blender").unwrap();
    for fmt in FileFormat::all() {
        assert!(script.contains(&format!("\"{}\"", fmt.as_str())), "missing {fmt}");
    }
}
